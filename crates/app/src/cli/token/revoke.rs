use clap::Args;
use shopfront_app::auth::PgAuthService;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct RevokeTokenArgs {
    /// Token to revoke; the shopper's other tokens keep working
    #[arg(long)]
    token_uuid: Uuid,
}

pub(crate) async fn run(service: &PgAuthService, args: RevokeTokenArgs) -> Result<(), String> {
    let revoked = service
        .revoke_api_token(args.token_uuid)
        .await
        .map_err(|error| format!("failed to revoke token: {error}"))?;

    let outcome = if revoked { "revoked" } else { "already inactive" };

    println!("{}: {outcome}", args.token_uuid);

    Ok(())
}
