use clap::{Args, Subcommand};
use shopfront_app::auth::PgAuthService;

use super::connect;

mod create;
mod list;
mod revoke;

/// Issue, inspect and revoke API bearer tokens.
#[derive(Debug, Args)]
pub(crate) struct TokenCommand {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: TokenSubcommand,
}

#[derive(Debug, Subcommand)]
enum TokenSubcommand {
    Create(create::CreateTokenArgs),
    List(list::ListTokensArgs),
    Revoke(revoke::RevokeTokenArgs),
}

pub(crate) async fn run(command: TokenCommand) -> Result<(), String> {
    let service = PgAuthService::new(connect(command.database_url).await?);

    match command.command {
        TokenSubcommand::Create(args) => create::run(&service, args).await,
        TokenSubcommand::List(args) => list::run(&service, args).await,
        TokenSubcommand::Revoke(args) => revoke::run(&service, args).await,
    }
}
