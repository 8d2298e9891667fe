use crate::domain::error::DomainError;
use crate::domain::model::{Money, ProductId};

/// 商品集約
/// 単価と現在の在庫数を管理する
/// 在庫数は注文作成時の減算と、カタログ管理操作でのみ変化する
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: String,
    unit_price: Money,
    available_quantity: u32,
}

impl Product {
    /// 新しい商品を作成
    /// 名前は空にできない
    pub fn new(
        id: ProductId,
        name: String,
        unit_price: Money,
        available_quantity: u32,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "商品名は空にできません".to_string(),
            ));
        }
        Ok(Self {
            id,
            name,
            unit_price,
            available_quantity,
        })
    }

    /// 商品IDを取得
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// 商品名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 単価を取得
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// 在庫数を取得
    pub fn available_quantity(&self) -> u32 {
        self.available_quantity
    }

    /// 在庫を減算する
    ///
    /// # Returns
    /// * `Ok(())` - 減算成功
    /// * `Err(DomainError::InsufficientStock)` - 在庫不足
    pub fn decrement_quantity(&mut self, quantity: u32) -> Result<(), DomainError> {
        if !self.has_available_stock(quantity) {
            return Err(DomainError::InsufficientStock {
                product_id: self.id,
                name: self.name.clone(),
                requested: quantity,
                available: self.available_quantity,
            });
        }
        self.available_quantity -= quantity;
        Ok(())
    }

    /// 在庫を戻す（注文永続化失敗時の補償など）
    pub fn increment_quantity(&mut self, quantity: u32) {
        self.available_quantity += quantity;
    }

    /// 指定された数量の在庫が利用可能かチェック
    pub fn has_available_stock(&self, quantity: u32) -> bool {
        self.available_quantity >= quantity
    }
}
