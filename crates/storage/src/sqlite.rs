use std::{fmt::Display, str::FromStr};

use async_trait::async_trait;
use mealcal_db::{Migrate, Plan, table::LocalEntry};
use mealcal_shared::{Error, KeyValueStore, Result, StorageError};
use sea_query::{Expr, ExprTrait, OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

fn unavailable(err: impl Display) -> Error {
    StorageError::Unavailable(err.to_string()).into()
}

/// Key-value store persisted in a SQLite `local_entry` table.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `url` and applies
    /// pending migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(unavailable)?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(unavailable)?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::info!(url, "local store ready");

        Ok(store)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await.map_err(unavailable)?;
        mealcal_db::migrator::<sqlx::Sqlite>()
            .map_err(unavailable)?
            .run(&mut conn, &Plan::apply_all())
            .await
            .map_err(unavailable)?;

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let statement = Query::select()
            .column(LocalEntry::Value)
            .from(LocalEntry::Table)
            .and_where(Expr::col(LocalEntry::Key).eq(key))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let statement = Query::insert()
            .into_table(LocalEntry::Table)
            .columns([LocalEntry::Key, LocalEntry::Value, LocalEntry::UpdatedAt])
            .values_panic([
                key.to_owned().into(),
                value.to_owned().into(),
                Expr::current_timestamp().into(),
            ])
            .on_conflict(
                OnConflict::column(LocalEntry::Key)
                    .update_columns([LocalEntry::Value, LocalEntry::UpdatedAt])
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let statement = Query::delete()
            .from_table(LocalEntry::Table)
            .and_where(Expr::col(LocalEntry::Key).eq(key))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

        Ok(())
    }
}
