use clap::{Args, Subcommand};
use shopfront_app::{database::Db, domain::catalog::PgCatalogService};

use super::connect;

mod create;
mod delete;
mod list;
mod update;

#[derive(Debug, Args)]
pub(crate) struct ItemCommand {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: ItemSubcommand,
}

#[derive(Debug, Subcommand)]
enum ItemSubcommand {
    Create(create::CreateItemArgs),
    Update(update::UpdateItemArgs),
    Delete(delete::DeleteItemArgs),
    List,
}

pub(crate) async fn run(command: ItemCommand) -> Result<(), String> {
    let service = PgCatalogService::new(Db::new(connect(command.database_url).await?));

    match command.command {
        ItemSubcommand::Create(args) => create::run(&service, args).await,
        ItemSubcommand::Update(args) => update::run(&service, args).await,
        ItemSubcommand::Delete(args) => delete::run(&service, args).await,
        ItemSubcommand::List => list::run(&service).await,
    }
}
