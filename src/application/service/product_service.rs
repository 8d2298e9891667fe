use crate::application::ApplicationError;
use crate::domain::model::{Money, Product, ProductId};
use crate::domain::port::ProductRepository;
use std::sync::Arc;

/// 商品アプリケーションサービス
/// カタログ管理操作（作成・参照）を提供する
/// 在庫の減算は注文作成サービス経由でのみ行われる
pub struct ProductApplicationService {
    product_repository: Arc<dyn ProductRepository>,
}

impl ProductApplicationService {
    /// 新しい商品アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `product_repository` - 商品リポジトリ
    pub fn new(product_repository: Arc<dyn ProductRepository>) -> Self {
        Self { product_repository }
    }

    /// 新しい商品を作成
    ///
    /// # Arguments
    /// * `name` - 商品名
    /// * `unit_price` - 単価
    /// * `quantity` - 初期在庫数
    ///
    /// # Returns
    /// * `Ok(Product)` - 作成された商品
    /// * `Err(ApplicationError)` - 検証失敗または保存失敗
    pub async fn create_product(
        &self,
        name: String,
        unit_price: Money,
        quantity: u32,
    ) -> Result<Product, ApplicationError> {
        let product_id = self.product_repository.next_identity();
        let product = Product::new(product_id, name, unit_price, quantity)?;
        self.product_repository.save(&product).await?;
        Ok(product)
    }

    /// 商品IDで商品を取得
    ///
    /// # Returns
    /// * `Ok(Some(Product))` - 商品が見つかった
    /// * `Ok(None)` - 商品が見つからなかった
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_product_by_id(
        &self,
        product_id: ProductId,
    ) -> Result<Option<Product>, ApplicationError> {
        self.product_repository
            .find_by_id(product_id)
            .await
            .map_err(ApplicationError::from)
    }

    /// すべての商品を取得
    /// 商品名の昇順で並べて返す
    pub async fn get_all_products(&self) -> Result<Vec<Product>, ApplicationError> {
        self.product_repository
            .find_all()
            .await
            .map_err(ApplicationError::from)
    }

    /// 指定された最大在庫数以下の商品を取得（在庫僅少ビュー）
    /// 商品名の昇順で並べて返す
    ///
    /// # Arguments
    /// * `max_quantity` - 最大在庫数（この数以下の商品を取得）
    pub async fn get_low_stock_products(
        &self,
        max_quantity: u32,
    ) -> Result<Vec<Product>, ApplicationError> {
        self.product_repository
            .find_by_max_quantity(max_quantity)
            .await
            .map_err(ApplicationError::from)
    }
}
