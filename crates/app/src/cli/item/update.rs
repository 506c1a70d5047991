use clap::Args;
use shopfront_app::domain::catalog::{CatalogService, PgCatalogService, data::ItemUpdate};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct UpdateItemArgs {
    /// Item to update
    #[arg(long)]
    item_uuid: Uuid,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// Unit price in minor currency units
    #[arg(long)]
    price: Option<u64>,

    /// Units in stock
    #[arg(long)]
    available: Option<u32>,
}

pub(crate) async fn run(service: &PgCatalogService, args: UpdateItemArgs) -> Result<(), String> {
    let item = service
        .update_item(
            args.item_uuid.into(),
            ItemUpdate {
                name: args.name,
                description: args.description,
                price: args.price,
                available: args.available,
            },
        )
        .await
        .map_err(|error| format!("failed to update item: {error}"))?;

    println!("item_uuid: {}", item.uuid);
    println!("item_name: {}", item.name);
    println!("price: {}", item.price);
    println!("available: {}", item.available);

    Ok(())
}
