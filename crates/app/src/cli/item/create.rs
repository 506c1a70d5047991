use clap::Args;
use shopfront_app::domain::catalog::{
    CatalogService, PgCatalogService,
    data::NewItem,
    records::ItemUuid,
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateItemArgs {
    /// Item name
    #[arg(long)]
    name: String,

    /// Item description
    #[arg(long, default_value = "")]
    description: String,

    /// Unit price in minor currency units
    #[arg(long)]
    price: u64,

    /// Units in stock
    #[arg(long, default_value_t = 0)]
    available: u32,

    /// Optional item UUID; generated when omitted
    #[arg(long)]
    item_uuid: Option<Uuid>,
}

pub(crate) async fn run(service: &PgCatalogService, args: CreateItemArgs) -> Result<(), String> {
    let item = service
        .create_item(NewItem {
            uuid: args.item_uuid.map_or_else(ItemUuid::new, ItemUuid::from),
            name: args.name,
            description: args.description,
            price: args.price,
            available: args.available,
        })
        .await
        .map_err(|error| format!("failed to create item: {error}"))?;

    println!("item_uuid: {}", item.uuid);
    println!("item_name: {}", item.name);
    println!("price: {}", item.price);
    println!("available: {}", item.available);

    Ok(())
}
