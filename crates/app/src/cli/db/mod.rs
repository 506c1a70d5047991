use clap::{Args, Subcommand};

use super::connect;

mod ensure_app_role;
mod migrate;

/// Schema and role administration. Needs an administrative connection, not the
/// runtime app role.
#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    /// Administrative PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply pending schema migrations
    Migrate,

    /// Create or update the restricted role the API server connects as
    EnsureAppRole(ensure_app_role::EnsureAppRoleArgs),
}

pub(crate) async fn run(command: DbCommand) -> Result<(), String> {
    let pool = connect(command.database_url).await?;

    match command.command {
        DbSubcommand::Migrate => migrate::run(&pool).await,
        DbSubcommand::EnsureAppRole(args) => ensure_app_role::run(&pool, args).await,
    }
}
