use sea_query::{ColumnDef, Expr, Table, TableCreateStatement, TableDropStatement};

use crate::table::LocalEntry;

pub struct Operation;

fn create_local_entry_table_statement() -> TableCreateStatement {
    Table::create()
        .table(LocalEntry::Table)
        .col(
            ColumnDef::new(LocalEntry::Key)
                .string()
                .not_null()
                .string_len(200)
                .primary_key(),
        )
        .col(ColumnDef::new(LocalEntry::Value).text().not_null())
        .col(
            ColumnDef::new(LocalEntry::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

fn drop_local_entry_table_statement() -> TableDropStatement {
    Table::drop().table(LocalEntry::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Operation {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement =
            create_local_entry_table_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_local_entry_table_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
