// ドライバーアダプター
// REST API経由でアプリケーションサービスを駆動する

pub mod request_dto;
pub mod response_dto;
pub mod rest_api;
