use clap::Args;
use shopfront_app::domain::catalog::{CatalogService, PgCatalogService};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct DeleteItemArgs {
    /// Item to remove from the catalog
    #[arg(long)]
    item_uuid: Uuid,
}

pub(crate) async fn run(service: &PgCatalogService, args: DeleteItemArgs) -> Result<(), String> {
    service
        .delete_item(args.item_uuid.into())
        .await
        .map_err(|error| format!("failed to delete item: {error}"))?;

    println!("deleted item {}", args.item_uuid);

    Ok(())
}
