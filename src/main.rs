use commerce_order_management::adapter::driven::{
    ConsoleLogger, MySqlCustomerRepository, MySqlOrderRepository, MySqlProductRepository,
};
use commerce_order_management::adapter::driver::rest_api::{create_router, AppStateInner};
use commerce_order_management::adapter::{DatabaseConfig, DatabaseMigration};
use commerce_order_management::application::service::{
    CustomerApplicationService, OrderApplicationService, ProductApplicationService,
};

use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== コマース注文管理システム REST API ===");
    println!();

    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    // データベース設定を読み込む
    let config = DatabaseConfig::from_env()?;
    println!(
        "データベース設定を読み込みました: {}:{}",
        config.host, config.port
    );

    // 接続プールを作成
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await?;
    println!("データベース接続プールを作成しました");

    // マイグレーションを実行
    let migration = DatabaseMigration::new(pool.clone());
    migration.run().await?;
    println!("データベースマイグレーションを実行しました");

    // MySQLリポジトリとロガーを作成
    let customer_repository = Arc::new(MySqlCustomerRepository::new(pool.clone()));
    let product_repository = Arc::new(MySqlProductRepository::new(pool.clone()));
    let order_repository = Arc::new(MySqlOrderRepository::new(pool.clone()));
    let logger = Arc::new(ConsoleLogger::new());

    // アプリケーションサービスを作成
    let customer_service = CustomerApplicationService::new(customer_repository.clone());
    let product_service = ProductApplicationService::new(product_repository.clone());
    let order_service = OrderApplicationService::new(
        customer_repository,
        product_repository,
        order_repository,
        logger,
    );

    // アプリケーション状態を作成
    let app_state = AppStateInner {
        customer_service: Arc::new(customer_service),
        product_service: Arc::new(product_service),
        order_service: Arc::new(order_service),
    };

    // REST APIルーターを作成
    let app = create_router()
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // サーバーを起動
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("REST APIサーバーが起動しました: http://localhost:3000");
    println!("ヘルスチェック: GET http://localhost:3000/health");
    println!("API仕様:");
    println!("  POST /customers - 顧客作成");
    println!("  GET  /customers/:id - 顧客詳細取得");
    println!("  POST /products - 商品作成");
    println!("  GET  /products - 商品一覧取得（?max_quantity=で在庫僅少に絞り込み）");
    println!("  GET  /products/:id - 商品詳細取得");
    println!("  POST /orders - 注文作成");
    println!("  GET  /orders - 注文一覧取得");
    println!("  GET  /orders/:id - 注文詳細取得");
    println!();

    axum::serve(listener, app).await?;

    Ok(())
}
