// ドリブンアダプター
// ドメイン層の出力ポートを実装する

pub mod console_logger;
pub mod customer_repository;
pub mod order_repository;
pub mod product_repository;

pub use console_logger::ConsoleLogger;
pub use customer_repository::MySqlCustomerRepository;
pub use order_repository::MySqlOrderRepository;
pub use product_repository::MySqlProductRepository;
