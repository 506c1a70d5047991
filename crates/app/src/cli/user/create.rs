use clap::Args;
use shopfront_app::domain::users::{
    PgUsersService, UsersService, data::NewUser, records::UserUuid,
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Use this UUID instead of generating one, e.g. to mirror an upstream identity
    #[arg(long)]
    user_uuid: Option<Uuid>,
}

pub(crate) async fn run(service: &PgUsersService, args: CreateUserArgs) -> Result<(), String> {
    let name = args.name.trim();

    if name.is_empty() {
        return Err("name cannot be empty".to_string());
    }

    let user = service
        .create_user(NewUser {
            uuid: args.user_uuid.map_or_else(UserUuid::new, UserUuid::from),
            name: name.to_string(),
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("name: {}", user.name);

    Ok(())
}
