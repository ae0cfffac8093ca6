pub mod lookup;

use crate::DbPool;
use actix_web::web;
use anyhow::Context;
use diesel::{connection::SimpleConnection, r2d2::ConnectionManager, SqliteConnection};
use r2d2::{CustomizeConnection, PooledConnection};

pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

const INIT_SQL: &str = include_str!("../../migrations/2024-11-02-000000_create_tables/up.sql");
const MEMORY_URL: &str = ":memory:";

pub fn get_db_conn(pool: &web::Data<DbPool>) -> anyhow::Result<DbConn> {
    pool.get().context("DB connection")
}

#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Opens the pool and creates any missing tables.
///
/// An in-memory database lives and dies with its connection, so it gets a
/// single connection that is never recycled.
pub fn build_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let mut builder = DbPool::builder().connection_customizer(Box::new(SqlitePragmas));
    if database_url == MEMORY_URL {
        builder = builder.max_size(1).idle_timeout(None).max_lifetime(None);
    }
    let pool = builder
        .build(manager)
        .with_context(|| format!("Failed to create pool for {}", database_url))?;

    let mut conn = pool.get().context("DB connection")?;
    conn.batch_execute(INIT_SQL)
        .context("Failed to initialize schema")?;

    Ok(pool)
}

#[cfg(test)]
pub fn memory_pool() -> DbPool {
    build_pool(MEMORY_URL).expect("in-memory pool")
}
