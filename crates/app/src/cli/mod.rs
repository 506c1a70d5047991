use clap::{Parser, Subcommand};
use shopfront_app::database;
use sqlx::PgPool;

mod db;
mod item;
mod token;
mod user;

#[derive(Debug, Parser)]
#[command(name = "shopfront-app", about = "Shopfront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Token(token::TokenCommand),
    Item(item::ItemCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::Item(command) => item::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

/// Connect using a `--database-url` that subcommand groups declare as global.
async fn connect(database_url: Option<String>) -> Result<PgPool, String> {
    let database_url =
        database_url.ok_or_else(|| "--database-url or DATABASE_URL is required".to_string())?;

    database::connect(&database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))
}
