use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{Customer, CustomerId, Email};
use crate::domain::port::{CustomerRepository, RepositoryError};
use async_trait::async_trait;

// MySQL関連のインポート
use sqlx::{MySql, Pool, Row};

/// MySQL顧客リポジトリ
/// MySQLデータベースを使用して顧客を永続化する
/// emailカラムのUNIQUE制約と utf8mb4_bin 照合順序により
/// メールアドレスの一意性（大文字小文字を区別）をストレージ側でも保証する
#[derive(Clone)]
pub struct MySqlCustomerRepository {
    pool: Pool<MySql>,
}

impl MySqlCustomerRepository {
    /// 新しいMySQL顧客リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行から顧客を再構築する
    fn build_customer_from_row(row: &sqlx::mysql::MySqlRow) -> Result<Customer, RepositoryError> {
        let customer_id = CustomerId::from_string(row.get("id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("顧客IDの解析に失敗しました: {}", e))
        })?;

        let email = Email::new(row.get("email")).map_err(|e| {
            RepositoryError::FetchFailed(format!("メールアドレスの構築に失敗しました: {}", e))
        })?;

        Customer::new(customer_id, row.get("name"), email).map_err(|e| {
            RepositoryError::FetchFailed(format!("顧客エンティティの再構築に失敗しました: {}", e))
        })
    }
}

#[async_trait]
impl CustomerRepository for MySqlCustomerRepository {
    async fn save(&self, customer: &Customer) -> Result<(), RepositoryError> {
        // 顧客データをcustomersテーブルにUPSERT
        sqlx::query(
            r#"
            INSERT INTO customers (id, name, email)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE
                name = VALUES(name),
                email = VALUES(email)
            "#,
        )
        .bind(customer.id().to_string())
        .bind(customer.name())
        .bind(customer.email().as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("顧客の保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, email FROM customers WHERE id = ?")
            .bind(customer_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("顧客の取得に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        match row {
            Some(row) => Ok(Some(Self::build_customer_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        // utf8mb4_bin照合のため完全一致（大文字小文字を区別）
        let row = sqlx::query("SELECT id, name, email FROM customers WHERE email = ?")
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!(
                    "メールアドレスでの顧客検索に失敗しました: {}",
                    e
                ))
            })
            .map_err(RepositoryError::from)?;

        match row {
            Some(row) => Ok(Some(Self::build_customer_from_row(&row)?)),
            None => Ok(None),
        }
    }

    fn next_identity(&self) -> CustomerId {
        CustomerId::new()
    }
}
