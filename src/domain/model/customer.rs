use crate::domain::error::DomainError;
use crate::domain::model::{CustomerId, Email};

/// 顧客エンティティ
/// 作成後はこのコアの範囲では不変として扱う
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    id: CustomerId,
    name: String,
    email: Email,
}

impl Customer {
    /// 新しい顧客を作成
    /// 名前は空にできない
    pub fn new(id: CustomerId, name: String, email: Email) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "顧客名は空にできません".to_string(),
            ));
        }
        Ok(Self { id, name, email })
    }

    /// 顧客IDを取得
    pub fn id(&self) -> CustomerId {
        self.id
    }

    /// 顧客名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// メールアドレスを取得
    pub fn email(&self) -> &Email {
        &self.email
    }
}
