// ドメインモデル（エンティティと値オブジェクト）

mod value_objects;
mod customer;
mod product;
mod order;

pub use value_objects::{
    CustomerId, OrderId, ProductId,
    Email,
    Money,
    LineItem,
};

pub use customer::Customer;
pub use product::Product;
pub use order::Order;
