use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{Money, Product, ProductId};
use crate::domain::port::{ProductRepository, RepositoryError, StockDecrement, StockUpdateError};
use async_trait::async_trait;

// MySQL関連のインポート
use sqlx::{MySql, Pool, Row};

/// MySQL商品リポジトリ
/// MySQLデータベースを使用して商品カタログと在庫数を永続化する
///
/// 在庫のバッチ減算は単一トランザクション内の条件付きUPDATEで行う。
/// `available_quantity >= ?` を満たさない行は更新されないため、
/// 事前チェックから減算までの間に他の注文が在庫を消費していても
/// 負の在庫には決してならない
#[derive(Clone)]
pub struct MySqlProductRepository {
    pool: Pool<MySql>,
}

impl MySqlProductRepository {
    /// 新しいMySQL商品リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行から商品を再構築する
    fn build_product_from_row(row: &sqlx::mysql::MySqlRow) -> Result<Product, RepositoryError> {
        let product_id = ProductId::from_string(row.get("id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("商品IDの解析に失敗しました: {}", e))
        })?;

        let unit_price = Money::new(
            row.get::<i64, _>("unit_price_amount"),
            row.get::<String, _>("unit_price_currency"),
        )
        .map_err(|e| RepositoryError::FetchFailed(format!("単価の構築に失敗しました: {}", e)))?;

        Product::new(
            product_id,
            row.get("name"),
            unit_price,
            row.get::<u32, _>("available_quantity"),
        )
        .map_err(|e| {
            RepositoryError::FetchFailed(format!("商品エンティティの再構築に失敗しました: {}", e))
        })
    }

    /// 複数行から商品リストを構築する
    fn build_products_from_rows(
        rows: &[sqlx::mysql::MySqlRow],
    ) -> Result<Vec<Product>, RepositoryError> {
        rows.iter().map(Self::build_product_from_row).collect()
    }
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn save(&self, product: &Product) -> Result<(), RepositoryError> {
        // 商品データをproductsテーブルにUPSERT
        sqlx::query(
            r#"
            INSERT INTO products (id, name, unit_price_amount, unit_price_currency, available_quantity)
            VALUES (?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                name = VALUES(name),
                unit_price_amount = VALUES(unit_price_amount),
                unit_price_currency = VALUES(unit_price_currency),
                available_quantity = VALUES(available_quantity)
            "#,
        )
        .bind(product.id().to_string())
        .bind(product.name())
        .bind(product.unit_price().amount())
        .bind(product.unit_price().currency())
        .bind(product.available_quantity())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("商品の保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_by_id(&self, product_id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, unit_price_amount, unit_price_currency, available_quantity FROM products WHERE id = ?",
        )
        .bind(product_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("商品の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        match row {
            Some(row) => Ok(Some(Self::build_product_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_all_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        // IN句のプレースホルダを要求件数分組み立てる
        let placeholders = vec!["?"; ids.len()].join(", ");
        let query = format!(
            "SELECT id, name, unit_price_amount, unit_price_currency, available_quantity FROM products WHERE id IN ({})",
            placeholders
        );

        let mut query_builder = sqlx::query(&query);
        for id in ids {
            query_builder = query_builder.bind(id.to_string());
        }

        let rows = query_builder
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("商品の一括取得に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        // 見つからなかったIDの検出は呼び出し側の責務
        Self::build_products_from_rows(&rows)
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, unit_price_amount, unit_price_currency, available_quantity FROM products ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("商品一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Self::build_products_from_rows(&rows)
    }

    async fn find_by_max_quantity(
        &self,
        max_quantity: u32,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, unit_price_amount, unit_price_currency, available_quantity FROM products WHERE available_quantity <= ? ORDER BY name ASC",
        )
        .bind(max_quantity)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::QueryError(format!("在庫僅少商品の取得に失敗しました: {}", e))
        })
        .map_err(RepositoryError::from)?;

        Self::build_products_from_rows(&rows)
    }

    async fn decrement_quantities(
        &self,
        decrements: &[StockDecrement],
    ) -> Result<Vec<Product>, StockUpdateError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!(
                    "トランザクションの開始に失敗しました: {}",
                    e
                ))
            })
            .map_err(RepositoryError::from)?;

        for decrement in decrements {
            // 条件付きUPDATE: 在庫が要求数量以上の場合のみ減算される
            let result = sqlx::query(
                r#"
                UPDATE products
                SET available_quantity = available_quantity - ?
                WHERE id = ? AND available_quantity >= ?
                "#,
            )
            .bind(decrement.quantity)
            .bind(decrement.product_id.to_string())
            .bind(decrement.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("在庫の減算に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

            if result.rows_affected() == 0 {
                // 更新されなかった原因を切り分ける（在庫不足か、商品が存在しないか）
                let exists = sqlx::query("SELECT id FROM products WHERE id = ?")
                    .bind(decrement.product_id.to_string())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| {
                        DatabaseError::QueryError(format!("商品の確認に失敗しました: {}", e))
                    })
                    .map_err(RepositoryError::from)?
                    .is_some();

                // txがドロップされるとロールバックされ、先行する減算も取り消される
                if exists {
                    return Err(StockUpdateError::InsufficientStock {
                        product_id: decrement.product_id,
                    });
                }
                return Err(StockUpdateError::Repository(
                    RepositoryError::OperationFailed(format!(
                        "減算対象の商品が存在しません: {}",
                        decrement.product_id
                    )),
                ));
            }
        }

        // 減算後の商品をバッチと同順で読み戻す
        let mut updated = Vec::with_capacity(decrements.len());
        for decrement in decrements {
            let row = sqlx::query(
                "SELECT id, name, unit_price_amount, unit_price_currency, available_quantity FROM products WHERE id = ?",
            )
            .bind(decrement.product_id.to_string())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("減算後の商品の取得に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

            updated.push(Self::build_product_from_row(&row).map_err(StockUpdateError::from)?);
        }

        tx.commit()
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!(
                    "トランザクションのコミットに失敗しました: {}",
                    e
                ))
            })
            .map_err(RepositoryError::from)?;

        Ok(updated)
    }

    async fn increment_quantities(
        &self,
        increments: &[StockDecrement],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            RepositoryError::from(DatabaseError::ConnectionError(format!(
                "トランザクションの開始に失敗しました: {}",
                e
            )))
        })?;

        for increment in increments {
            sqlx::query(
                "UPDATE products SET available_quantity = available_quantity + ? WHERE id = ?",
            )
            .bind(increment.quantity)
            .bind(increment.product_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                RepositoryError::from(DatabaseError::QueryError(format!(
                    "在庫の復元に失敗しました: {}",
                    e
                )))
            })?;
        }

        tx.commit().await.map_err(|e| {
            RepositoryError::from(DatabaseError::QueryError(format!(
                "トランザクションのコミットに失敗しました: {}",
                e
            )))
        })?;

        Ok(())
    }

    fn next_identity(&self) -> ProductId {
        ProductId::new()
    }
}
