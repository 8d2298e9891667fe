use commerce_order_management::application::service::{
    OrderApplicationService, OrderItemRequest,
};
use commerce_order_management::application::ApplicationError;
use commerce_order_management::domain::error::DomainError;
use commerce_order_management::domain::model::{
    Customer, CustomerId, Email, Money, Order, OrderId, Product, ProductId,
};
use commerce_order_management::domain::port::{
    CustomerRepository, Logger, OrderRepository, ProductRepository, RepositoryError,
    StockDecrement, StockUpdateError,
};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

// テスト用のインメモリ顧客リポジトリ
struct InMemoryCustomerRepository {
    customers: Arc<Mutex<HashMap<CustomerId, Customer>>>,
}

impl InMemoryCustomerRepository {
    fn new() -> Self {
        Self {
            customers: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn save(&self, customer: &Customer) -> Result<(), RepositoryError> {
        let mut customers = self.customers.lock().await;
        customers.insert(customer.id(), customer.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<Customer>, RepositoryError> {
        let customers = self.customers.lock().await;
        Ok(customers.get(&customer_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        let customers = self.customers.lock().await;
        Ok(customers.values().find(|c| c.email() == email).cloned())
    }

    fn next_identity(&self) -> CustomerId {
        CustomerId::new()
    }
}

// テスト用のインメモリ商品リポジトリ
// バッチ減算は単一ロック内で全件検証してから全件適用する
struct InMemoryProductRepository {
    products: Arc<Mutex<HashMap<ProductId, Product>>>,
}

impl InMemoryProductRepository {
    fn new() -> Self {
        Self {
            products: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn quantity_of(&self, product_id: ProductId) -> u32 {
        let products = self.products.lock().await;
        products
            .get(&product_id)
            .map(|p| p.available_quantity())
            .unwrap_or(0)
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn save(&self, product: &Product) -> Result<(), RepositoryError> {
        let mut products = self.products.lock().await;
        products.insert(product.id(), product.clone());
        Ok(())
    }

    async fn find_by_id(&self, product_id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.lock().await;
        Ok(products.get(&product_id).cloned())
    }

    async fn find_all_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| products.get(id).cloned())
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.lock().await;
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(all)
    }

    async fn find_by_max_quantity(
        &self,
        max_quantity: u32,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.lock().await;
        let mut matched: Vec<Product> = products
            .values()
            .filter(|p| p.available_quantity() <= max_quantity)
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(matched)
    }

    async fn decrement_quantities(
        &self,
        decrements: &[StockDecrement],
    ) -> Result<Vec<Product>, StockUpdateError> {
        let mut products = self.products.lock().await;

        // 全件検証してから全件適用（部分適用を防ぐ）
        for decrement in decrements {
            let product = products.get(&decrement.product_id).ok_or_else(|| {
                StockUpdateError::Repository(RepositoryError::OperationFailed(format!(
                    "product not found: {}",
                    decrement.product_id
                )))
            })?;
            if !product.has_available_stock(decrement.quantity) {
                return Err(StockUpdateError::InsufficientStock {
                    product_id: decrement.product_id,
                });
            }
        }

        let mut updated = Vec::with_capacity(decrements.len());
        for decrement in decrements {
            let product = products.get_mut(&decrement.product_id).unwrap();
            product.decrement_quantity(decrement.quantity).unwrap();
            updated.push(product.clone());
        }

        Ok(updated)
    }

    async fn increment_quantities(
        &self,
        increments: &[StockDecrement],
    ) -> Result<(), RepositoryError> {
        let mut products = self.products.lock().await;
        for increment in increments {
            if let Some(product) = products.get_mut(&increment.product_id) {
                product.increment_quantity(increment.quantity);
            }
        }
        Ok(())
    }

    fn next_identity(&self) -> ProductId {
        ProductId::new()
    }
}

// テスト用のインメモリ注文リポジトリ
struct InMemoryOrderRepository {
    orders: Arc<Mutex<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderRepository {
    fn new() -> Self {
        Self {
            orders: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn count(&self) -> usize {
        self.orders.lock().await.len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), RepositoryError> {
        let mut orders = self.orders.lock().await;
        orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let orders = self.orders.lock().await;
        Ok(orders.get(&order_id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = self.orders.lock().await;
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(all)
    }

    fn next_identity(&self) -> OrderId {
        OrderId::new()
    }
}

// 注文永続化が常に失敗する注文リポジトリ（補償のテスト用）
struct FailingOrderRepository;

#[async_trait]
impl OrderRepository for FailingOrderRepository {
    async fn create(&self, _order: &Order) -> Result<(), RepositoryError> {
        Err(RepositoryError::OperationFailed(
            "simulated storage failure".to_string(),
        ))
    }

    async fn find_by_id(&self, _order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(None)
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(Vec::new())
    }

    fn next_identity(&self) -> OrderId {
        OrderId::new()
    }
}

// 何も出力しないロガー
struct NullLogger;

impl Logger for NullLogger {
    fn debug(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn info(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn warn(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn error(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
}

// テスト用のフィクスチャ
struct Fixture {
    customer_repository: Arc<InMemoryCustomerRepository>,
    product_repository: Arc<InMemoryProductRepository>,
    order_repository: Arc<InMemoryOrderRepository>,
    service: OrderApplicationService,
}

impl Fixture {
    fn new() -> Self {
        let customer_repository = Arc::new(InMemoryCustomerRepository::new());
        let product_repository = Arc::new(InMemoryProductRepository::new());
        let order_repository = Arc::new(InMemoryOrderRepository::new());
        let service = OrderApplicationService::new(
            customer_repository.clone(),
            product_repository.clone(),
            order_repository.clone(),
            Arc::new(NullLogger),
        );
        Self {
            customer_repository,
            product_repository,
            order_repository,
            service,
        }
    }

    async fn add_customer(&self) -> CustomerId {
        let customer_id = CustomerId::new();
        let customer = Customer::new(
            customer_id,
            "Alice".to_string(),
            Email::new(format!("{}@example.com", customer_id)).unwrap(),
        )
        .unwrap();
        self.customer_repository.save(&customer).await.unwrap();
        customer_id
    }

    async fn add_product(&self, name: &str, unit_price: i64, quantity: u32) -> ProductId {
        let product_id = ProductId::new();
        let product = Product::new(
            product_id,
            name.to_string(),
            Money::usd(unit_price),
            quantity,
        )
        .unwrap();
        self.product_repository.save(&product).await.unwrap();
        product_id
    }
}

fn item(product_id: ProductId, quantity: u32) -> OrderItemRequest {
    OrderItemRequest {
        product_id,
        quantity,
    }
}

#[tokio::test]
async fn test_successful_order_decrements_stock_and_persists() {
    let fixture = Fixture::new();
    let customer_id = fixture.add_customer().await;
    let keyboard = fixture.add_product("Keyboard", 1000, 5).await;
    let mouse = fixture.add_product("Mouse", 500, 10).await;

    let order = fixture
        .service
        .create_order(customer_id, vec![item(keyboard, 3), item(mouse, 2)])
        .await
        .unwrap();

    assert_eq!(order.customer_id(), customer_id);
    assert_eq!(order.line_items().len(), 2);
    assert_eq!(order.total().amount(), 3 * 1000 + 2 * 500);

    // 在庫が減算されている
    assert_eq!(fixture.product_repository.quantity_of(keyboard).await, 2);
    assert_eq!(fixture.product_repository.quantity_of(mouse).await, 8);

    // 注文が永続化されている
    let stored = fixture
        .order_repository
        .find_by_id(order.id())
        .await
        .unwrap();
    assert_eq!(stored, Some(order));
}

#[tokio::test]
async fn test_order_snapshots_price_at_placement() {
    let fixture = Fixture::new();
    let customer_id = fixture.add_customer().await;
    let keyboard = fixture.add_product("Keyboard", 1000, 5).await;

    let order = fixture
        .service
        .create_order(customer_id, vec![item(keyboard, 3)])
        .await
        .unwrap();

    // 注文後に単価が変わっても注文の明細は変わらない
    let repriced = Product::new(
        keyboard,
        "Keyboard".to_string(),
        Money::usd(9999),
        2,
    )
    .unwrap();
    fixture.product_repository.save(&repriced).await.unwrap();

    let stored = fixture
        .order_repository
        .find_by_id(order.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.line_items()[0].unit_price().amount(), 1000);
    assert_eq!(stored.total().amount(), 3000);
}

#[tokio::test]
async fn test_unknown_customer_is_rejected_without_side_effects() {
    let fixture = Fixture::new();
    let keyboard = fixture.add_product("Keyboard", 1000, 5).await;

    let result = fixture
        .service
        .create_order(CustomerId::new(), vec![item(keyboard, 1)])
        .await;

    match result.unwrap_err() {
        ApplicationError::DomainError(DomainError::CustomerNotFound(_)) => {}
        other => panic!("Expected CustomerNotFound, got {:?}", other),
    }

    assert_eq!(fixture.product_repository.quantity_of(keyboard).await, 5);
    assert_eq!(fixture.order_repository.count().await, 0);
}

#[tokio::test]
async fn test_unknown_product_is_rejected_without_side_effects() {
    let fixture = Fixture::new();
    let customer_id = fixture.add_customer().await;
    let keyboard = fixture.add_product("Keyboard", 1000, 5).await;
    let missing = ProductId::new();

    let result = fixture
        .service
        .create_order(customer_id, vec![item(keyboard, 1), item(missing, 1)])
        .await;

    match result.unwrap_err() {
        ApplicationError::DomainError(DomainError::ProductNotFound(id)) => {
            assert_eq!(id, missing);
        }
        other => panic!("Expected ProductNotFound, got {:?}", other),
    }

    assert_eq!(fixture.product_repository.quantity_of(keyboard).await, 5);
    assert_eq!(fixture.order_repository.count().await, 0);
}

#[tokio::test]
async fn test_insufficient_stock_rejects_entire_order() {
    let fixture = Fixture::new();
    let customer_id = fixture.add_customer().await;
    let keyboard = fixture.add_product("Keyboard", 1000, 5).await;
    let mouse = fixture.add_product("Mouse", 500, 1).await;

    // キーボードは足りているがマウスが不足している
    let result = fixture
        .service
        .create_order(customer_id, vec![item(keyboard, 2), item(mouse, 3)])
        .await;

    match result.unwrap_err() {
        ApplicationError::DomainError(DomainError::InsufficientStock {
            product_id,
            requested,
            available,
            ..
        }) => {
            assert_eq!(product_id, mouse);
            assert_eq!(requested, 3);
            assert_eq!(available, 1);
        }
        other => panic!("Expected InsufficientStock, got {:?}", other),
    }

    // どちらの商品の在庫も変わっていない
    assert_eq!(fixture.product_repository.quantity_of(keyboard).await, 5);
    assert_eq!(fixture.product_repository.quantity_of(mouse).await, 1);
    assert_eq!(fixture.order_repository.count().await, 0);
}

#[tokio::test]
async fn test_zero_quantity_is_rejected() {
    let fixture = Fixture::new();
    let customer_id = fixture.add_customer().await;
    let keyboard = fixture.add_product("Keyboard", 1000, 5).await;

    let result = fixture
        .service
        .create_order(customer_id, vec![item(keyboard, 0)])
        .await;

    match result.unwrap_err() {
        ApplicationError::DomainError(DomainError::InvalidQuantity) => {}
        other => panic!("Expected InvalidQuantity, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_items_are_rejected() {
    let fixture = Fixture::new();
    let customer_id = fixture.add_customer().await;

    let result = fixture.service.create_order(customer_id, vec![]).await;

    match result.unwrap_err() {
        ApplicationError::DomainError(DomainError::EmptyOrder) => {}
        other => panic!("Expected EmptyOrder, got {:?}", other),
    }
}

#[tokio::test]
async fn test_duplicate_product_ids_are_validated_as_aggregate() {
    let fixture = Fixture::new();
    let customer_id = fixture.add_customer().await;
    let keyboard = fixture.add_product("Keyboard", 1000, 4).await;

    // 個別には足りるが、合算すると在庫4に対して5を要求している
    let result = fixture
        .service
        .create_order(customer_id, vec![item(keyboard, 2), item(keyboard, 3)])
        .await;

    match result.unwrap_err() {
        ApplicationError::DomainError(DomainError::InsufficientStock {
            requested,
            available,
            ..
        }) => {
            assert_eq!(requested, 5);
            assert_eq!(available, 4);
        }
        other => panic!("Expected InsufficientStock, got {:?}", other),
    }

    assert_eq!(fixture.product_repository.quantity_of(keyboard).await, 4);
}

#[tokio::test]
async fn test_duplicate_product_ids_keep_separate_line_items() {
    let fixture = Fixture::new();
    let customer_id = fixture.add_customer().await;
    let keyboard = fixture.add_product("Keyboard", 1000, 5).await;

    let order = fixture
        .service
        .create_order(customer_id, vec![item(keyboard, 2), item(keyboard, 3)])
        .await
        .unwrap();

    // 明細はリクエスト通り2件のまま、在庫は合算の5だけ減る
    assert_eq!(order.line_items().len(), 2);
    assert_eq!(order.line_items()[0].quantity(), 2);
    assert_eq!(order.line_items()[1].quantity(), 3);
    assert_eq!(fixture.product_repository.quantity_of(keyboard).await, 0);
}

#[tokio::test]
async fn test_concurrent_orders_for_last_unit_allow_exactly_one_success() {
    let fixture = Fixture::new();
    let customer_id = fixture.add_customer().await;
    let keyboard = fixture.add_product("Keyboard", 1000, 1).await;

    let service = Arc::new(fixture.service);
    let first = {
        let service = service.clone();
        tokio::spawn(async move { service.create_order(customer_id, vec![item(keyboard, 1)]).await })
    };
    let second = {
        let service = service.clone();
        tokio::spawn(async move { service.create_order(customer_id, vec![item(keyboard, 1)]).await })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();

    // 最後の1個を取り合った場合、成功するのはちょうど1件
    assert_eq!(successes, 1);
    assert_eq!(fixture.product_repository.quantity_of(keyboard).await, 0);
    assert_eq!(fixture.order_repository.count().await, 1);
}

#[tokio::test]
async fn test_order_persistence_failure_restores_stock() {
    let customer_repository = Arc::new(InMemoryCustomerRepository::new());
    let product_repository = Arc::new(InMemoryProductRepository::new());
    let service = OrderApplicationService::new(
        customer_repository.clone(),
        product_repository.clone(),
        Arc::new(FailingOrderRepository),
        Arc::new(NullLogger),
    );

    let customer_id = CustomerId::new();
    let customer = Customer::new(
        customer_id,
        "Alice".to_string(),
        Email::new("alice@example.com".to_string()).unwrap(),
    )
    .unwrap();
    customer_repository.save(&customer).await.unwrap();

    let keyboard = ProductId::new();
    let product = Product::new(keyboard, "Keyboard".to_string(), Money::usd(1000), 5).unwrap();
    product_repository.save(&product).await.unwrap();

    let result = service
        .create_order(customer_id, vec![item(keyboard, 3)])
        .await;

    match result.unwrap_err() {
        ApplicationError::RepositoryError(RepositoryError::OperationFailed(_)) => {}
        other => panic!("Expected OperationFailed, got {:?}", other),
    }

    // 減算された在庫が補償で戻っている
    assert_eq!(product_repository.quantity_of(keyboard).await, 5);
}

#[tokio::test]
async fn test_get_all_orders_returns_newest_first() {
    let fixture = Fixture::new();
    let customer_id = fixture.add_customer().await;
    let keyboard = fixture.add_product("Keyboard", 1000, 10).await;

    let first = fixture
        .service
        .create_order(customer_id, vec![item(keyboard, 1)])
        .await
        .unwrap();
    let second = fixture
        .service
        .create_order(customer_id, vec![item(keyboard, 2)])
        .await
        .unwrap();

    let orders = fixture.service.get_all_orders().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id(), second.id());
    assert_eq!(orders[1].id(), first.id());
}
