use crate::domain::model::{CustomerId, ProductId};

/// ドメイン層のエラー型
/// ビジネスルール違反を表現する
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 顧客が存在しない
    CustomerNotFound(CustomerId),
    /// 商品が存在しない
    ProductNotFound(ProductId),
    /// 在庫不足（該当商品を特定できる情報を保持する）
    InsufficientStock {
        product_id: ProductId,
        name: String,
        requested: u32,
        available: u32,
    },
    /// メールアドレスが既に使用されている（顧客作成時のみ）
    EmailInUse(String),
    /// 無効な数量（例: 0の数量）
    InvalidQuantity,
    /// 注文明細が空
    EmptyOrder,
    /// 通貨の不一致
    CurrencyMismatch,
    /// 無効な値
    InvalidValue(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::CustomerNotFound(id) => write!(f, "Customer not found: {}", id),
            DomainError::ProductNotFound(id) => write!(f, "Product not found: {}", id),
            DomainError::InsufficientStock {
                name,
                requested,
                available,
                ..
            } => write!(
                f,
                "Insufficient stock for {}: requested {}, available {}",
                name, requested, available
            ),
            DomainError::EmailInUse(email) => write!(f, "Email already in use: {}", email),
            DomainError::InvalidQuantity => write!(f, "Invalid quantity"),
            DomainError::EmptyOrder => write!(f, "Order must contain at least one line item"),
            DomainError::CurrencyMismatch => write!(f, "Currency mismatch"),
            DomainError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
