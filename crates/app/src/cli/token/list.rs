use std::fmt::Display;

use clap::Args;
use jiff::Timestamp;
use shopfront_app::auth::PgAuthService;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct ListTokensArgs {
    /// Shopper whose tokens should be listed
    #[arg(long)]
    user_uuid: Uuid,
}

fn or<T: Display>(value: Option<T>, missing: &str) -> String {
    value.map_or_else(|| missing.to_string(), |value| value.to_string())
}

pub(crate) async fn run(service: &PgAuthService, args: ListTokensArgs) -> Result<(), String> {
    let tokens = service
        .list_api_tokens(args.user_uuid.into())
        .await
        .map_err(|error| format!("failed to list tokens: {error}"))?;

    if tokens.is_empty() {
        println!("no tokens found for user {}", args.user_uuid);
        return Ok(());
    }

    println!("{:<36}  {:<8}  {:<27}  {:<27}", "token_uuid", "state", "last_used_at", "expires_at");

    let now = Timestamp::now();

    for token in tokens {
        println!(
            "{:<36}  {:<8}  {:<27}  {:<27}",
            token.uuid,
            token.state_at(now).as_str(),
            or(token.last_used_at, "never"),
            or(token.expires_at, "never"),
        );
    }

    Ok(())
}
