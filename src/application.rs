// アプリケーション層
// ドメインのポートを使ってユースケースを実現する

pub mod error;
pub mod service;

pub use error::ApplicationError;
