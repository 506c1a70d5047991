use clap::{Args, Subcommand};
use shopfront_app::domain::users::PgUsersService;

use super::connect;

mod create;

/// Manage shoppers.
#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    Create(create::CreateUserArgs),
}

pub(crate) async fn run(command: UserCommand) -> Result<(), String> {
    let service = PgUsersService::new(connect(command.database_url).await?);

    match command.command {
        UserSubcommand::Create(args) => create::run(&service, args).await,
    }
}
