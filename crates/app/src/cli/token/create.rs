use clap::Args;
use jiff::{SignedDuration, Timestamp};
use shopfront_app::auth::PgAuthService;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    /// Shopper the token authenticates as
    #[arg(long)]
    user_uuid: Uuid,

    /// Absolute expiry (RFC 3339)
    #[arg(long, conflicts_with = "ttl_days")]
    expires_at: Option<Timestamp>,

    /// Expire the token this many days from now
    #[arg(long)]
    ttl_days: Option<u16>,
}

pub(crate) async fn run(service: &PgAuthService, args: CreateTokenArgs) -> Result<(), String> {
    let expires_at = expiry(Timestamp::now(), args.expires_at, args.ttl_days)?;

    let issued = service
        .issue_api_token(args.user_uuid.into(), expires_at)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    let metadata = &issued.metadata;

    println!("token_uuid: {}", metadata.uuid);
    println!("user_uuid: {}", metadata.user_uuid);
    println!(
        "expires_at: {}",
        metadata
            .expires_at
            .map_or_else(|| "never".to_string(), |at| at.to_string())
    );
    println!("api_token: {}", issued.token);
    println!("the token is not stored and cannot be shown again");

    Ok(())
}

fn expiry(
    now: Timestamp,
    expires_at: Option<Timestamp>,
    ttl_days: Option<u16>,
) -> Result<Option<Timestamp>, String> {
    let expires_at = match (expires_at, ttl_days) {
        (Some(at), _) => Some(at),
        (None, Some(days)) => {
            let ttl = SignedDuration::from_hours(i64::from(days) * 24);

            Some(
                now.checked_add(ttl)
                    .map_err(|error| format!("invalid ttl-days: {error}"))?,
            )
        }
        (None, None) => None,
    };

    match expires_at {
        Some(at) if at <= now => Err("token expiry must be in the future".to_string()),
        other => Ok(other),
    }
}
