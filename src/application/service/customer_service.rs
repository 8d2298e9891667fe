use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::{Customer, CustomerId, Email};
use crate::domain::port::CustomerRepository;
use std::sync::Arc;

/// 顧客アプリケーションサービス
/// 顧客の作成と参照を提供する
pub struct CustomerApplicationService {
    customer_repository: Arc<dyn CustomerRepository>,
}

impl CustomerApplicationService {
    /// 新しい顧客アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `customer_repository` - 顧客リポジトリ
    pub fn new(customer_repository: Arc<dyn CustomerRepository>) -> Self {
        Self {
            customer_repository,
        }
    }

    /// 新しい顧客を作成
    /// メールアドレスが既に使用されている場合は失敗する
    ///
    /// # Arguments
    /// * `name` - 顧客名
    /// * `email` - メールアドレス
    ///
    /// # Returns
    /// * `Ok(Customer)` - 作成された顧客
    /// * `Err(ApplicationError)` - メールアドレス重複、検証失敗、保存失敗
    pub async fn create_customer(
        &self,
        name: String,
        email: String,
    ) -> Result<Customer, ApplicationError> {
        let email = Email::new(email)?;

        // メールアドレスの一意性チェック（完全一致）
        if self
            .customer_repository
            .find_by_email(&email)
            .await?
            .is_some()
        {
            return Err(DomainError::EmailInUse(email.to_string()).into());
        }

        let customer_id = self.customer_repository.next_identity();
        let customer = Customer::new(customer_id, name, email)?;
        self.customer_repository.save(&customer).await?;

        Ok(customer)
    }

    /// 顧客IDで顧客を取得
    ///
    /// # Returns
    /// * `Ok(Some(Customer))` - 顧客が見つかった
    /// * `Ok(None)` - 顧客が見つからなかった
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_customer_by_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<Customer>, ApplicationError> {
        self.customer_repository
            .find_by_id(customer_id)
            .await
            .map_err(ApplicationError::from)
    }
}
