use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::{CustomerId, LineItem, Order, OrderId, Product, ProductId};
use crate::domain::port::{
    CustomerRepository, Logger, OrderRepository, ProductRepository, StockUpdateError,
};
use crate::domain::service::StockDemand;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 注文作成リクエストの1明細
/// 同一商品IDの重複は許容され、明細としては別々に記録される
/// （在庫検証は商品ごとに合算して行う）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// 注文アプリケーションサービス
/// 顧客検証・在庫検証・価格スナップショット・在庫減算・注文永続化を
/// 1つの論理的な作業単位として編成する
pub struct OrderApplicationService {
    customer_repository: Arc<dyn CustomerRepository>,
    product_repository: Arc<dyn ProductRepository>,
    order_repository: Arc<dyn OrderRepository>,
    logger: Arc<dyn Logger>,
}

impl OrderApplicationService {
    /// 新しい注文アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `customer_repository` - 顧客リポジトリ
    /// * `product_repository` - 商品リポジトリ
    /// * `order_repository` - 注文リポジトリ
    /// * `logger` - ロガー
    pub fn new(
        customer_repository: Arc<dyn CustomerRepository>,
        product_repository: Arc<dyn ProductRepository>,
        order_repository: Arc<dyn OrderRepository>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            customer_repository,
            product_repository,
            order_repository,
            logger,
        }
    }

    /// 新しい注文を作成する
    ///
    /// 手順:
    /// 1. 顧客の存在確認
    /// 2. リクエスト明細の検証と商品別の需要合算
    /// 3. 商品の一括取得と欠落検出
    /// 4. 在庫の楽観的事前チェック
    /// 5. 価格スナップショット付きの明細構築
    /// 6. 在庫のバッチ減算（減算時点で再検証される）
    /// 7. 注文の永続化（失敗時は減算を補償で戻す）
    ///
    /// ステップ6より前の失敗では一切の副作用が残らない
    ///
    /// # Returns
    /// * `Ok(Order)` - 永続化された注文
    /// * `Err(ApplicationError)` - 検証失敗またはストレージ障害
    pub async fn create_order(
        &self,
        customer_id: CustomerId,
        items: Vec<OrderItemRequest>,
    ) -> Result<Order, ApplicationError> {
        let correlation_id = Uuid::new_v4();

        // 顧客の存在確認
        self.customer_repository
            .find_by_id(customer_id)
            .await?
            .ok_or(DomainError::CustomerNotFound(customer_id))?;

        // 商品別の需要を合算（数量・空リストの検証を含む）
        let requests: Vec<(ProductId, u32)> = items
            .iter()
            .map(|item| (item.product_id, item.quantity))
            .collect();
        let demand = StockDemand::from_requests(&requests)?;

        // 商品を一括取得し、欠落を検出
        let products = self
            .product_repository
            .find_all_by_ids(&demand.product_ids())
            .await?;
        let products_by_id: HashMap<ProductId, Product> =
            products.into_iter().map(|p| (p.id(), p)).collect();

        for product_id in demand.product_ids() {
            if !products_by_id.contains_key(&product_id) {
                return Err(DomainError::ProductNotFound(product_id).into());
            }
        }

        // 在庫の楽観的事前チェック
        // 最終的な検証は減算時にストレージ側で行われる
        for entry in demand.entries() {
            let product = &products_by_id[&entry.product_id];
            if !product.has_available_stock(entry.quantity) {
                self.log_insufficient_stock(correlation_id, product, entry.quantity);
                return Err(DomainError::InsufficientStock {
                    product_id: product.id(),
                    name: product.name().to_string(),
                    requested: entry.quantity,
                    available: product.available_quantity(),
                }
                .into());
            }
        }

        // リクエスト明細ごとに価格スナップショット付きの注文明細を構築
        let mut line_items = Vec::with_capacity(items.len());
        for item in &items {
            let product = &products_by_id[&item.product_id];
            line_items.push(LineItem::new(
                item.product_id,
                item.quantity,
                product.unit_price(),
            )?);
        }

        let order_id = self.order_repository.next_identity();
        let order = Order::new(order_id, customer_id, line_items)?;

        // 在庫をバッチ減算
        // 減算時点の正規の在庫数に対して再検証され、全件適用か全件不適用
        self.product_repository
            .decrement_quantities(demand.entries())
            .await
            .map_err(|err| self.map_stock_update_error(err, &products_by_id, &demand))?;

        // 注文を永続化
        // 失敗した場合は適用済みの減算を補償で戻す
        if let Err(err) = self.order_repository.create(&order).await {
            self.compensate_decrements(correlation_id, &demand).await;
            return Err(err.into());
        }

        self.logger.info(
            "OrderApplicationService",
            "Order created",
            Some(correlation_id),
            Some(HashMap::from([
                ("order_id".to_string(), order.id().to_string()),
                ("customer_id".to_string(), customer_id.to_string()),
                ("line_items".to_string(), order.line_items().len().to_string()),
                ("total".to_string(), order.total().amount().to_string()),
            ])),
        );

        Ok(order)
    }

    /// 注文IDで注文を取得
    ///
    /// # Returns
    /// * `Ok(Some(Order))` - 注文が見つかった
    /// * `Ok(None)` - 注文が見つからなかった
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_order_by_id(&self, id: OrderId) -> Result<Option<Order>, ApplicationError> {
        self.order_repository
            .find_by_id(id)
            .await
            .map_err(ApplicationError::from)
    }

    /// すべての注文を取得
    /// 作成日時の降順で並べて返す
    pub async fn get_all_orders(&self) -> Result<Vec<Order>, ApplicationError> {
        self.order_repository
            .find_all()
            .await
            .map_err(ApplicationError::from)
    }

    /// 減算時エラーをドメインエラーに変換する
    /// 在庫不足の場合は事前取得した商品情報で該当商品を特定する
    fn map_stock_update_error(
        &self,
        err: StockUpdateError,
        products_by_id: &HashMap<ProductId, Product>,
        demand: &StockDemand,
    ) -> ApplicationError {
        match err {
            StockUpdateError::InsufficientStock { product_id } => {
                let requested = demand
                    .entries()
                    .iter()
                    .find(|e| e.product_id == product_id)
                    .map(|e| e.quantity)
                    .unwrap_or(0);
                match products_by_id.get(&product_id) {
                    Some(product) => DomainError::InsufficientStock {
                        product_id,
                        name: product.name().to_string(),
                        requested,
                        // 事前取得時点のスナップショット値。減算時点の実数は
                        // これより小さかったことだけが確定している
                        available: product.available_quantity(),
                    }
                    .into(),
                    None => DomainError::ProductNotFound(product_id).into(),
                }
            }
            StockUpdateError::Repository(repo_err) => repo_err.into(),
        }
    }

    /// 注文永続化失敗後に在庫減算を戻す
    /// 補償自体の失敗は手動対応が必要なためエラーログに残す
    async fn compensate_decrements(&self, correlation_id: Uuid, demand: &StockDemand) {
        if let Err(err) = self
            .product_repository
            .increment_quantities(demand.entries())
            .await
        {
            self.logger.error(
                "OrderApplicationService",
                &format!(
                    "Failed to restore stock after order persistence failure: {}",
                    err
                ),
                Some(correlation_id),
                None,
            );
        } else {
            self.logger.warn(
                "OrderApplicationService",
                "Order persistence failed; stock decrements restored",
                Some(correlation_id),
                None,
            );
        }
    }

    fn log_insufficient_stock(&self, correlation_id: Uuid, product: &Product, requested: u32) {
        self.logger.warn(
            "OrderApplicationService",
            "Order rejected: insufficient stock",
            Some(correlation_id),
            Some(HashMap::from([
                ("product_id".to_string(), product.id().to_string()),
                ("requested".to_string(), requested.to_string()),
                (
                    "available".to_string(),
                    product.available_quantity().to_string(),
                ),
            ])),
        );
    }
}
