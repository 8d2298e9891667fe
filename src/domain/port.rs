// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::model::{Customer, CustomerId, Email, Order, OrderId, Product, ProductId};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// ロガートレイト
/// ログ出力を抽象化するポート
pub trait Logger: Send + Sync {
    /// デバッグレベルのログを出力
    fn debug(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 情報レベルのログを出力
    fn info(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 警告レベルのログを出力
    fn warn(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// エラーレベルのログを出力
    fn error(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );
}

/// リポジトリエラー型
/// ストレージ層の障害を表現する
/// 呼び出し側にとっては常に致命的・非リトライで、部分的な状態を残さない
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::enum_variant_names)]
pub enum RepositoryError {
    /// データベース接続に失敗
    ConnectionFailed(String),
    /// 操作に失敗
    OperationFailed(String),
    /// データの取得に失敗
    FetchFailed(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            RepositoryError::OperationFailed(msg) => write!(f, "Operation failed: {}", msg),
            RepositoryError::FetchFailed(msg) => write!(f, "Fetch failed: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// 在庫減算の1エントリ（商品IDと減算数量）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDecrement {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// 在庫更新エラー型
/// バッチ減算は全件適用か全件不適用のどちらかで、部分適用は起きない
#[derive(Debug, Clone, PartialEq)]
pub enum StockUpdateError {
    /// 減算時点の在庫が要求数量に満たない
    InsufficientStock { product_id: ProductId },
    /// ストレージ障害
    Repository(RepositoryError),
}

impl std::fmt::Display for StockUpdateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockUpdateError::InsufficientStock { product_id } => {
                write!(f, "Insufficient stock for product {}", product_id)
            }
            StockUpdateError::Repository(err) => write!(f, "Repository error: {}", err),
        }
    }
}

impl std::error::Error for StockUpdateError {}

impl From<RepositoryError> for StockUpdateError {
    fn from(err: RepositoryError) -> Self {
        StockUpdateError::Repository(err)
    }
}

/// 顧客リポジトリトレイト
/// 顧客ディレクトリの永続化を抽象化する
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// 顧客を保存する
    async fn save(&self, customer: &Customer) -> Result<(), RepositoryError>;

    /// 顧客IDで顧客を検索する
    ///
    /// # Returns
    /// * `Ok(Some(Customer))` - 顧客が見つかった
    /// * `Ok(None)` - 顧客が見つからなかった
    /// * `Err(RepositoryError)` - 検索失敗
    async fn find_by_id(&self, customer_id: CustomerId)
        -> Result<Option<Customer>, RepositoryError>;

    /// メールアドレスで顧客を検索する
    /// 保存された表記との完全一致（大文字小文字を区別）
    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError>;

    /// 新しい一意の顧客IDを生成する
    fn next_identity(&self) -> CustomerId;
}

/// 商品リポジトリトレイト
/// 商品カタログの永続化と在庫の整合性契約を抽象化する
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 商品を保存する
    async fn save(&self, product: &Product) -> Result<(), RepositoryError>;

    /// 商品IDで商品を検索する
    async fn find_by_id(&self, product_id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// 複数の商品IDで商品を一括検索する
    /// 存在する商品のみを返す（呼び出し側が要求IDと突き合わせて欠落を検出する）
    async fn find_all_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;

    /// すべての商品を取得する
    /// 商品名の昇順で並べて返す
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;

    /// 指定された最大在庫数以下の商品を取得する
    /// 商品名の昇順で並べて返す
    async fn find_by_max_quantity(
        &self,
        max_quantity: u32,
    ) -> Result<Vec<Product>, RepositoryError>;

    /// 在庫をバッチで減算する
    /// 減算時点の在庫数に対して再検証し、1件でも不足があれば
    /// 何も適用せずに `InsufficientStock` で失敗する
    ///
    /// # Returns
    /// * `Ok(Vec<Product>)` - 減算後の商品（バッチと同順）
    /// * `Err(StockUpdateError)` - 在庫不足またはストレージ障害
    async fn decrement_quantities(
        &self,
        decrements: &[StockDecrement],
    ) -> Result<Vec<Product>, StockUpdateError>;

    /// 在庫をバッチで戻す（注文永続化失敗時の補償）
    async fn increment_quantities(
        &self,
        increments: &[StockDecrement],
    ) -> Result<(), RepositoryError>;

    /// 新しい一意の商品IDを生成する
    fn next_identity(&self) -> ProductId;
}

/// 注文リポジトリトレイト
/// 注文台帳の永続化を抽象化する
/// 注文は不変レコードなので挿入のみを提供する
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 注文を永続化する
    /// 失敗はストレージ障害のみで、常に致命的
    async fn create(&self, order: &Order) -> Result<(), RepositoryError>;

    /// 注文IDで注文を検索する
    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// すべての注文を取得する
    /// 作成日時の降順で並べて返す
    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError>;

    /// 新しい一意の注文IDを生成する
    fn next_identity(&self) -> OrderId;
}
