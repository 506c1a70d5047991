use sqlx::PgPool;

pub(crate) async fn run(pool: &PgPool) -> Result<(), String> {
    let migrator = sqlx::migrate!("../../migrations");

    migrator
        .run(pool)
        .await
        .map_err(|error| format!("failed to apply migrations: {error}"))?;

    println!("schema is at migration {}", latest_version(&migrator));

    Ok(())
}

fn latest_version(migrator: &sqlx::migrate::Migrator) -> i64 {
    migrator
        .iter()
        .map(|migration| migration.version)
        .max()
        .unwrap_or_default()
}
