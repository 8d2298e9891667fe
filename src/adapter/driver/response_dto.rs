use crate::domain::model::{Customer, Order, Product};
use serde::Serialize;

/// 顧客用のレスポンスDTO
#[derive(Serialize)]
pub struct CustomerResponse {
    pub customer_id: String,
    pub name: String,
    pub email: String,
}

/// 商品用のレスポンスDTO
#[derive(Serialize)]
pub struct ProductResponse {
    pub product_id: String,
    pub name: String,
    pub unit_price_amount: i64,
    pub unit_price_currency: String,
    pub available_quantity: u32,
}

/// 注文一覧用のレスポンスDTO
#[derive(Serialize)]
pub struct OrderSummaryResponse {
    pub order_id: String,
    pub customer_id: String,
    pub line_item_count: usize,
    pub total_amount: i64,
    pub total_currency: String,
    pub created_at: String,
}

/// 注文詳細用のレスポンスDTO
#[derive(Serialize)]
pub struct OrderDetailResponse {
    pub order_id: String,
    pub customer_id: String,
    pub line_items: Vec<LineItemResponse>,
    pub total_amount: i64,
    pub total_currency: String,
    pub created_at: String,
}

/// 注文明細用のレスポンスDTO
/// 単価は注文時点のスナップショット
#[derive(Serialize)]
pub struct LineItemResponse {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price_amount: i64,
    pub unit_price_currency: String,
    pub subtotal_amount: i64,
    pub subtotal_currency: String,
}

impl CustomerResponse {
    /// ドメインオブジェクトからCustomerResponseを作成
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            customer_id: customer.id().to_string(),
            name: customer.name().to_string(),
            email: customer.email().to_string(),
        }
    }
}

impl ProductResponse {
    /// ドメインオブジェクトからProductResponseを作成
    pub fn from_product(product: &Product) -> Self {
        let unit_price = product.unit_price();
        Self {
            product_id: product.id().to_string(),
            name: product.name().to_string(),
            unit_price_amount: unit_price.amount(),
            unit_price_currency: unit_price.currency(),
            available_quantity: product.available_quantity(),
        }
    }
}

impl OrderSummaryResponse {
    /// ドメインオブジェクトからOrderSummaryResponseを作成
    pub fn from_order(order: &Order) -> Self {
        let total = order.total();
        Self {
            order_id: order.id().to_string(),
            customer_id: order.customer_id().to_string(),
            line_item_count: order.line_items().len(),
            total_amount: total.amount(),
            total_currency: total.currency(),
            created_at: order.created_at().to_rfc3339(),
        }
    }
}

impl OrderDetailResponse {
    /// ドメインオブジェクトからOrderDetailResponseを作成
    pub fn from_order(order: &Order) -> Self {
        let line_items: Vec<LineItemResponse> = order
            .line_items()
            .iter()
            .map(LineItemResponse::from_line_item)
            .collect();

        let total = order.total();

        Self {
            order_id: order.id().to_string(),
            customer_id: order.customer_id().to_string(),
            line_items,
            total_amount: total.amount(),
            total_currency: total.currency(),
            created_at: order.created_at().to_rfc3339(),
        }
    }
}

impl LineItemResponse {
    /// ドメインオブジェクトからLineItemResponseを作成
    pub fn from_line_item(item: &crate::domain::model::LineItem) -> Self {
        let unit_price = item.unit_price();
        let subtotal = item.subtotal();

        Self {
            product_id: item.product_id().to_string(),
            quantity: item.quantity(),
            unit_price_amount: unit_price.amount(),
            unit_price_currency: unit_price.currency(),
            subtotal_amount: subtotal.amount(),
            subtotal_currency: subtotal.currency(),
        }
    }
}
