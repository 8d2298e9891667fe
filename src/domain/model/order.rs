use crate::domain::error::DomainError;
use crate::domain::model::{CustomerId, LineItem, Money, OrderId};
use chrono::{DateTime, Utc};

/// Order集約
/// 確定済み注文の不変レコード
/// 作成後は一切変更されない（明細・価格スナップショットも固定）
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    line_items: Vec<LineItem>,
    created_at: DateTime<Utc>,
}

impl Order {
    /// 新しい注文を作成
    /// 事前条件: 注文明細が1つ以上
    pub fn new(
        id: OrderId,
        customer_id: CustomerId,
        line_items: Vec<LineItem>,
    ) -> Result<Self, DomainError> {
        if line_items.is_empty() {
            return Err(DomainError::EmptyOrder);
        }
        Ok(Self {
            id,
            customer_id,
            line_items,
            created_at: Utc::now(),
        })
    }

    /// データベースから取得したデータで注文を再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(
        id: OrderId,
        customer_id: CustomerId,
        line_items: Vec<LineItem>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if line_items.is_empty() {
            return Err(DomainError::EmptyOrder);
        }
        Ok(Self {
            id,
            customer_id,
            line_items,
            created_at,
        })
    }

    /// 注文IDを取得
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// 顧客IDを取得
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// 注文明細のリストを取得（リクエスト順）
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// 作成日時を取得
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 合計金額を計算（全明細の小計の合算）
    pub fn total(&self) -> Money {
        self.line_items
            .iter()
            .map(|item| item.subtotal())
            .fold(Money::usd(0), |acc, amount| acc.add(&amount).unwrap_or(acc))
    }
}
