// アプリケーションサービス
// ユースケースごとにポートを編成する

mod customer_service;
mod order_service;
mod product_service;

pub use customer_service::CustomerApplicationService;
pub use order_service::{OrderApplicationService, OrderItemRequest};
pub use product_service::ProductApplicationService;
