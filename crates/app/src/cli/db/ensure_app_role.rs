use clap::Args;
use sqlx::{PgPool, Postgres, Transaction, query, query_scalar};

#[derive(Debug, Args)]
pub(crate) struct EnsureAppRoleArgs {
    /// Application runtime role name
    #[arg(long, default_value = "shopfront_app")]
    role_name: String,

    /// Application role password
    #[arg(long, env = "APP_DB_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(pool: &PgPool, args: EnsureAppRoleArgs) -> Result<(), String> {
    if args.role_name.trim().is_empty() {
        return Err("role_name cannot be empty".to_string());
    }

    if args.password.trim().is_empty() {
        return Err("password cannot be empty".to_string());
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|error| format!("failed to start transaction: {error}"))?;

    let role_ident = quote(&mut tx, "quote_ident", &args.role_name).await?;
    let password_lit = quote(&mut tx, "quote_literal", &args.password).await?;

    upsert_role(&mut tx, &args.role_name, &role_ident, &password_lit).await?;
    grant_table_privileges(&mut tx, &role_ident).await?;

    let bypasses_rls: bool =
        query_scalar("SELECT rolsuper OR rolbypassrls FROM pg_roles WHERE rolname = $1")
            .bind(&args.role_name)
            .fetch_one(&mut *tx)
            .await
            .map_err(|error| format!("failed to verify role flags: {error}"))?;

    if bypasses_rls {
        return Err(format!(
            "role {} still bypasses row level security",
            args.role_name
        ));
    }

    tx.commit()
        .await
        .map_err(|error| format!("failed to commit changes: {error}"))?;

    println!("ensured app role: {}", args.role_name);
    println!("applied grants for current database and public schema");

    Ok(())
}

/// Quote a value server-side for statements that cannot take bind parameters.
async fn quote(
    tx: &mut Transaction<'_, Postgres>,
    function: &str,
    value: &str,
) -> Result<String, String> {
    query_scalar(&format!("SELECT {function}($1)"))
        .bind(value)
        .fetch_one(&mut **tx)
        .await
        .map_err(|error| format!("failed to {function} value: {error}"))
}

async fn upsert_role(
    tx: &mut Transaction<'_, Postgres>,
    role_name: &str,
    role_ident: &str,
    password_lit: &str,
) -> Result<(), String> {
    let role_exists: bool =
        query_scalar("SELECT EXISTS (SELECT 1 FROM pg_roles WHERE rolname = $1)")
            .bind(role_name)
            .fetch_one(&mut **tx)
            .await
            .map_err(|error| format!("failed to check role existence: {error}"))?;

    let verb = if role_exists { "ALTER" } else { "CREATE" };

    // Runtime connections must never bypass RLS, whatever the role had before.
    query(&format!(
        "{verb} ROLE {role_ident} LOGIN PASSWORD {password_lit} \
         NOSUPERUSER NOCREATEDB NOCREATEROLE NOREPLICATION NOBYPASSRLS"
    ))
    .execute(&mut **tx)
    .await
    .map_err(|error| format!("failed to {} role: {error}", verb.to_lowercase()))?;

    Ok(())
}

async fn grant_table_privileges(
    tx: &mut Transaction<'_, Postgres>,
    role_ident: &str,
) -> Result<(), String> {
    let database_ident: String = query_scalar("SELECT quote_ident(current_database())")
        .fetch_one(&mut **tx)
        .await
        .map_err(|error| format!("failed to resolve database name: {error}"))?;

    let grant_sql = [
        format!("GRANT CONNECT ON DATABASE {database_ident} TO {role_ident}"),
        format!("GRANT USAGE ON SCHEMA public TO {role_ident}"),
        format!(
            "GRANT SELECT, INSERT, UPDATE, DELETE ON ALL TABLES IN SCHEMA public TO {role_ident}"
        ),
        format!(
            "ALTER DEFAULT PRIVILEGES IN SCHEMA public GRANT SELECT, INSERT, UPDATE, DELETE ON TABLES TO {role_ident}"
        ),
    ];

    for sql in grant_sql {
        query(&sql)
            .execute(&mut **tx)
            .await
            .map_err(|error| format!("failed to apply `{sql}`: {error}"))?;
    }

    Ok(())
}
