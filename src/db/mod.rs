pub mod carpools;
pub mod chats;
pub mod events;
pub mod friends;

use std::{str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

use crate::Config;

/// Opens the pool and brings the schema up to date.
///
/// An in-memory database only lives as long as its connection, so those pools
/// are pinned to a single connection that is never recycled.
pub async fn connect(config: &Config) -> anyhow::Result<SqlitePool> {
    let in_memory = config.database_url.contains(":memory:");
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
    if in_memory {
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>);
    }
    let db_pool = pool_options.connect_with(options).await?;

    migrate(&db_pool).await?;
    Ok(db_pool)
}

pub async fn migrate(db_pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("running database migrations");
    sqlx::migrate!().run(db_pool).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    connect(&Config::default()).await.unwrap()
}
