use crate::adapter::database_error::DatabaseError;
use sqlx::{MySql, Pool};

/// スキーママイグレーション
/// 各ファイルはCREATE TABLE IF NOT EXISTSのみを含むため、繰り返し実行しても安全
const MIGRATIONS: [(&str, &str); 4] = [
    (
        "001_create_customers_table",
        include_str!("../../migrations/001_create_customers_table.sql"),
    ),
    (
        "002_create_products_table",
        include_str!("../../migrations/002_create_products_table.sql"),
    ),
    (
        "003_create_orders_table",
        include_str!("../../migrations/003_create_orders_table.sql"),
    ),
    (
        "004_create_order_items_table",
        include_str!("../../migrations/004_create_order_items_table.sql"),
    ),
];

/// データベースマイグレーションを管理する構造体
pub struct DatabaseMigration {
    pool: Pool<MySql>,
}

impl DatabaseMigration {
    /// 新しいDatabaseMigrationインスタンスを作成
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// すべてのマイグレーションを順番に実行
    pub async fn run(&self) -> Result<(), DatabaseError> {
        for (name, sql) in MIGRATIONS {
            println!("Running migration {}...", name);
            sqlx::query(sql).execute(&self.pool).await.map_err(|e| {
                DatabaseError::MigrationError(format!("Migration {} failed: {}", name, e))
            })?;
        }

        println!("All migrations completed successfully");
        Ok(())
    }
}
