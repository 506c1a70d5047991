use shopfront_app::domain::catalog::{CatalogReader, PgCatalogService};

pub(crate) async fn run(service: &PgCatalogService) -> Result<(), String> {
    let items = service
        .list_items()
        .await
        .map_err(|error| format!("failed to list items: {error}"))?;

    if items.is_empty() {
        println!("no items in catalog");
        return Ok(());
    }

    for item in items {
        println!("item_uuid: {}", item.uuid);
        println!("item_name: {}", item.name);
        println!("price: {}", item.price);
        println!("available: {}", item.available);
        println!();
    }

    Ok(())
}
