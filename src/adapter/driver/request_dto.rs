use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 顧客作成用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
}

/// 商品作成用のリクエストDTO
/// 単価は最小通貨単位（セント）の整数
#[derive(Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub unit_price: i64,
    pub currency: Option<String>,
    pub quantity: u32,
}

/// 注文作成用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub items: Vec<OrderItemDto>,
}

/// 注文明細用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct OrderItemDto {
    pub product_id: Uuid,
    pub quantity: u32,
}

/// 商品一覧取得用のクエリパラメータ
#[derive(Deserialize)]
pub struct ProductsQueryParams {
    pub max_quantity: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_customer_request_serialization() {
        let request = CreateCustomerRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        };

        let json = serde_json::to_string(&request).unwrap();
        let _deserialized: CreateCustomerRequest = serde_json::from_str(&json).unwrap();

        // シリアライゼーション/デシリアライゼーションが成功することを確認
        assert!(json.contains("name"));
        assert!(json.contains("email"));
    }

    #[test]
    fn test_create_product_request_without_currency() {
        let json = r#"{"name": "Keyboard", "unit_price": 4500, "quantity": 10}"#;
        let request: CreateProductRequest = serde_json::from_str(json).unwrap();

        // currency省略時はNoneになる
        assert_eq!(request.name, "Keyboard");
        assert_eq!(request.unit_price, 4500);
        assert_eq!(request.currency, None);
        assert_eq!(request.quantity, 10);
    }

    #[test]
    fn test_create_order_request_serialization() {
        let request = CreateOrderRequest {
            customer_id: Uuid::new_v4(),
            items: vec![
                OrderItemDto {
                    product_id: Uuid::new_v4(),
                    quantity: 2,
                },
                OrderItemDto {
                    product_id: Uuid::new_v4(),
                    quantity: 1,
                },
            ],
        };

        let json = serde_json::to_string(&request).unwrap();
        let deserialized: CreateOrderRequest = serde_json::from_str(&json).unwrap();

        assert!(json.contains("customer_id"));
        assert!(json.contains("items"));
        assert_eq!(deserialized.items.len(), 2);
    }

    #[test]
    fn test_create_order_request_with_empty_items() {
        let json = format!(r#"{{"customer_id": "{}", "items": []}}"#, Uuid::new_v4());
        let request: CreateOrderRequest = serde_json::from_str(&json).unwrap();

        // 空の明細リストはDTOレベルでは受理される（検証はドメイン層）
        assert!(request.items.is_empty());
    }

    #[test]
    fn test_products_query_params() {
        let params = ProductsQueryParams {
            max_quantity: Some(10),
        };
        assert_eq!(params.max_quantity, Some(10));

        let params = ProductsQueryParams { max_quantity: None };
        assert_eq!(params.max_quantity, None);
    }
}
