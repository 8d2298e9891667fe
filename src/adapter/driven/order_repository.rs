use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{CustomerId, LineItem, Money, Order, OrderId, ProductId};
use crate::domain::port::{OrderRepository, RepositoryError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

// MySQL関連のインポート
use sqlx::{MySql, Pool, Row};

/// MySQL注文リポジトリ
/// MySQLデータベースを使用して注文台帳を永続化する
/// 注文ヘッダと明細を単一トランザクションで書き込む
#[derive(Clone)]
pub struct MySqlOrderRepository {
    pool: Pool<MySql>,
}

impl MySqlOrderRepository {
    /// 新しいMySQL注文リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// JOINした行から明細を構築する
    fn build_line_item_from_row(row: &sqlx::mysql::MySqlRow) -> Result<LineItem, RepositoryError> {
        let product_id = ProductId::from_string(row.get("product_id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("商品IDの解析に失敗しました: {}", e))
        })?;

        let unit_price = Money::new(
            row.get::<i64, _>("unit_price_amount"),
            row.get::<String, _>("unit_price_currency"),
        )
        .map_err(|e| RepositoryError::FetchFailed(format!("単価の構築に失敗しました: {}", e)))?;

        LineItem::new(product_id, row.get::<u32, _>("quantity"), unit_price).map_err(|e| {
            RepositoryError::FetchFailed(format!("注文明細の再構築に失敗しました: {}", e))
        })
    }

    /// JOINした行の集合から注文リストを再構築する
    /// 行は (注文, line_no) の順で並んでいる前提
    fn build_orders_from_rows(
        rows: &[sqlx::mysql::MySqlRow],
    ) -> Result<Vec<Order>, RepositoryError> {
        let mut orders: Vec<Order> = Vec::new();
        let mut current: Option<(OrderId, CustomerId, DateTime<Utc>, Vec<LineItem>)> = None;

        for row in rows {
            let order_id = OrderId::from_string(row.get("order_id")).map_err(|e| {
                RepositoryError::FetchFailed(format!("注文IDの解析に失敗しました: {}", e))
            })?;

            let same_order = matches!(&current, Some((id, _, _, _)) if *id == order_id);
            if !same_order {
                if let Some((id, customer_id, created_at, items)) = current.take() {
                    orders.push(Self::reconstruct_order(id, customer_id, created_at, items)?);
                }

                let customer_id = CustomerId::from_string(row.get("customer_id")).map_err(|e| {
                    RepositoryError::FetchFailed(format!("顧客IDの解析に失敗しました: {}", e))
                })?;
                let created_at = row.get::<DateTime<Utc>, _>("created_at");
                current = Some((order_id, customer_id, created_at, Vec::new()));
            }

            if let Some((_, _, _, items)) = current.as_mut() {
                items.push(Self::build_line_item_from_row(row)?);
            }
        }

        if let Some((id, customer_id, created_at, items)) = current {
            orders.push(Self::reconstruct_order(id, customer_id, created_at, items)?);
        }

        Ok(orders)
    }

    fn reconstruct_order(
        id: OrderId,
        customer_id: CustomerId,
        created_at: DateTime<Utc>,
        items: Vec<LineItem>,
    ) -> Result<Order, RepositoryError> {
        Order::reconstruct(id, customer_id, items, created_at).map_err(|e| {
            RepositoryError::FetchFailed(format!("注文の再構築に失敗しました: {}", e))
        })
    }
}

#[async_trait]
impl OrderRepository for MySqlOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            RepositoryError::from(DatabaseError::ConnectionError(format!(
                "トランザクションの開始に失敗しました: {}",
                e
            )))
        })?;

        // 注文ヘッダをordersテーブルに挿入
        sqlx::query("INSERT INTO orders (id, customer_id, created_at) VALUES (?, ?, ?)")
            .bind(order.id().to_string())
            .bind(order.customer_id().to_string())
            .bind(order.created_at())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                RepositoryError::from(DatabaseError::QueryError(format!(
                    "注文の保存に失敗しました: {}",
                    e
                )))
            })?;

        // 明細をリクエスト順の行番号付きで挿入
        for (line_no, item) in order.line_items().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, line_no, product_id, quantity, unit_price_amount, unit_price_currency)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(order.id().to_string())
            .bind(line_no as u32)
            .bind(item.product_id().to_string())
            .bind(item.quantity())
            .bind(item.unit_price().amount())
            .bind(item.unit_price().currency())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                RepositoryError::from(DatabaseError::QueryError(format!(
                    "注文明細の保存に失敗しました: {}",
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

    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                o.id AS order_id,
                o.customer_id,
                o.created_at,
                i.product_id,
                i.quantity,
                i.unit_price_amount,
                i.unit_price_currency
            FROM orders o
            INNER JOIN order_items i ON i.order_id = o.id
            WHERE o.id = ?
            ORDER BY i.line_no ASC
            "#,
        )
        .bind(order_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from(DatabaseError::QueryError(format!(
                "注文の取得に失敗しました: {}",
                e
            )))
        })?;

        let mut orders = Self::build_orders_from_rows(&rows)?;
        Ok(orders.pop())
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                o.id AS order_id,
                o.customer_id,
                o.created_at,
                i.product_id,
                i.quantity,
                i.unit_price_amount,
                i.unit_price_currency
            FROM orders o
            INNER JOIN order_items i ON i.order_id = o.id
            ORDER BY o.created_at DESC, o.id ASC, i.line_no ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from(DatabaseError::QueryError(format!(
                "注文一覧の取得に失敗しました: {}",
                e
            )))
        })?;

        Self::build_orders_from_rows(&rows)
    }

    fn next_identity(&self) -> OrderId {
        OrderId::new()
    }
}
