use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use uuid::Uuid;

use crate::adapter::driver::request_dto::{
    CreateCustomerRequest, CreateOrderRequest, CreateProductRequest, ProductsQueryParams,
};
use crate::adapter::driver::response_dto::{
    CustomerResponse, OrderDetailResponse, OrderSummaryResponse, ProductResponse,
};
use crate::application::service::{
    CustomerApplicationService, OrderApplicationService, OrderItemRequest,
    ProductApplicationService,
};
use crate::application::ApplicationError;
use crate::domain::model::{CustomerId, Money, OrderId, ProductId};

// REST API用のエラーDTO
#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

// アプリケーションサービスを含む状態
pub type AppState = AppStateInner;

#[derive(Clone)]
pub struct AppStateInner {
    pub customer_service: Arc<CustomerApplicationService>,
    pub product_service: Arc<ProductApplicationService>,
    pub order_service: Arc<OrderApplicationService>,
}

// REST APIルーターを作成
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/customers", post(create_customer))
        .route("/customers/:customer_id", get(get_customer_by_id))
        .route("/products", post(create_product))
        .route("/products", get(get_products))
        .route("/products/:product_id", get(get_product_by_id))
        .route("/orders", post(create_order))
        .route("/orders", get(get_orders))
        .route("/orders/:order_id", get(get_order_by_id))
}

// ヘルスチェックエンドポイント
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "commerce-order-management",
        "version": "0.1.0"
    }))
}

// 顧客作成エンドポイント
async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), (StatusCode, Json<ApiError>)> {
    match state
        .customer_service
        .create_customer(request.name, request.email)
        .await
    {
        Ok(customer) => Ok((
            StatusCode::CREATED,
            Json(CustomerResponse::from_customer(&customer)),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 顧客詳細取得エンドポイント
async fn get_customer_by_id(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<CustomerResponse>, (StatusCode, Json<ApiError>)> {
    let customer_id = CustomerId::from_uuid(customer_id);

    match state.customer_service.get_customer_by_id(customer_id).await {
        Ok(Some(customer)) => Ok(Json(CustomerResponse::from_customer(&customer))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: "指定された顧客が見つかりません".to_string(),
                code: "CUSTOMER_NOT_FOUND".to_string(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 商品作成エンドポイント
async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), (StatusCode, Json<ApiError>)> {
    let currency = request.currency.unwrap_or_else(|| "USD".to_string());
    let unit_price = match Money::new(request.unit_price, currency) {
        Ok(price) => price,
        Err(err) => return Err(map_domain_error(err)),
    };

    match state
        .product_service
        .create_product(request.name, unit_price, request.quantity)
        .await
    {
        Ok(product) => Ok((
            StatusCode::CREATED,
            Json(ProductResponse::from_product(&product)),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 商品一覧取得エンドポイント
// max_quantityクエリパラメータで在庫僅少商品に絞り込める
async fn get_products(
    State(state): State<AppState>,
    query: Result<Query<ProductsQueryParams>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<Vec<ProductResponse>>, (StatusCode, Json<ApiError>)> {
    let Query(params) = query.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "無効なクエリパラメータです".to_string(),
                code: "INVALID_PARAMETER".to_string(),
            }),
        )
    })?;

    let products = if let Some(max_quantity) = params.max_quantity {
        match state.product_service.get_low_stock_products(max_quantity).await {
            Ok(products) => products,
            Err(err) => return Err(map_application_error(err)),
        }
    } else {
        match state.product_service.get_all_products().await {
            Ok(products) => products,
            Err(err) => return Err(map_application_error(err)),
        }
    };

    let response: Vec<ProductResponse> =
        products.iter().map(ProductResponse::from_product).collect();

    Ok(Json(response))
}

// 商品詳細取得エンドポイント
async fn get_product_by_id(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ProductResponse>, (StatusCode, Json<ApiError>)> {
    let product_id = ProductId::from_uuid(product_id);

    match state.product_service.get_product_by_id(product_id).await {
        Ok(Some(product)) => Ok(Json(ProductResponse::from_product(&product))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: "指定された商品が見つかりません".to_string(),
                code: "PRODUCT_NOT_FOUND".to_string(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 注文作成エンドポイント
async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderDetailResponse>), (StatusCode, Json<ApiError>)> {
    let customer_id = CustomerId::from_uuid(request.customer_id);
    let items: Vec<OrderItemRequest> = request
        .items
        .iter()
        .map(|item| OrderItemRequest {
            product_id: ProductId::from_uuid(item.product_id),
            quantity: item.quantity,
        })
        .collect();

    match state.order_service.create_order(customer_id, items).await {
        Ok(order) => Ok((
            StatusCode::CREATED,
            Json(OrderDetailResponse::from_order(&order)),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 注文一覧取得エンドポイント
async fn get_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderSummaryResponse>>, (StatusCode, Json<ApiError>)> {
    match state.order_service.get_all_orders().await {
        Ok(orders) => {
            let response: Vec<OrderSummaryResponse> = orders
                .iter()
                .map(OrderSummaryResponse::from_order)
                .collect();
            Ok(Json(response))
        }
        Err(err) => Err(map_application_error(err)),
    }
}

// 注文詳細取得エンドポイント
async fn get_order_by_id(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderDetailResponse>, (StatusCode, Json<ApiError>)> {
    let order_id = OrderId::from_uuid(order_id);

    match state.order_service.get_order_by_id(order_id).await {
        Ok(Some(order)) => Ok(Json(OrderDetailResponse::from_order(&order))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: "指定された注文が見つかりません".to_string(),
                code: "ORDER_NOT_FOUND".to_string(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// アプリケーションエラーをHTTPエラーにマッピング
fn map_application_error(err: ApplicationError) -> (StatusCode, Json<ApiError>) {
    match err {
        ApplicationError::DomainError(domain_err) => map_domain_error(domain_err),
        ApplicationError::RepositoryError(repo_err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError {
                error: format!("{}", repo_err),
                code: "REPOSITORY_ERROR".to_string(),
            }),
        ),
        ApplicationError::NotFound(msg) => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: msg,
                code: "NOT_FOUND".to_string(),
            }),
        ),
    }
}

// ドメインエラーを適切なHTTPステータスコードとエラーコードにマッピング
fn map_domain_error(domain_err: crate::domain::error::DomainError) -> (StatusCode, Json<ApiError>) {
    use crate::domain::error::DomainError;

    match domain_err {
        DomainError::CustomerNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: format!("指定された顧客が見つかりません: {}", id),
                code: "CUSTOMER_NOT_FOUND".to_string(),
            }),
        ),
        DomainError::ProductNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: format!("指定された商品が見つかりません: {}", id),
                code: "PRODUCT_NOT_FOUND".to_string(),
            }),
        ),
        // 在庫不足はリクエスト自体は整形式なので409で返す
        DomainError::InsufficientStock {
            name,
            requested,
            available,
            ..
        } => (
            StatusCode::CONFLICT,
            Json(ApiError {
                error: format!(
                    "在庫不足です: {} (要求: {}, 在庫: {})",
                    name, requested, available
                ),
                code: "INSUFFICIENT_STOCK".to_string(),
            }),
        ),
        DomainError::EmailInUse(email) => (
            StatusCode::CONFLICT,
            Json(ApiError {
                error: format!("メールアドレスは既に使用されています: {}", email),
                code: "EMAIL_IN_USE".to_string(),
            }),
        ),
        DomainError::InvalidQuantity => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "無効な数量です".to_string(),
                code: "INVALID_QUANTITY".to_string(),
            }),
        ),
        DomainError::EmptyOrder => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "注文には1つ以上の明細が必要です".to_string(),
                code: "EMPTY_ORDER".to_string(),
            }),
        ),
        DomainError::CurrencyMismatch => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "通貨が一致しません".to_string(),
                code: "CURRENCY_MISMATCH".to_string(),
            }),
        ),
        DomainError::InvalidValue(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: msg,
                code: "INVALID_VALUE".to_string(),
            }),
        ),
    }
}
