//! # taskapp-shared
//!
//! API 層とインフラ層の両方から参照される横断的な型を提供する。
//!
//! ## モジュール構成
//!
//! - [`error_body`] - ワイヤレベルのエラーエンベロープ `{"error": ...}`
//! - [`request_id`] - リクエスト追跡用の識別子
//!
//! ## 設計方針
//!
//! このクレートは axum や sqlx に依存しない純粋なデータ型のみを持つ。
//! HTTP レスポンスへの変換やデータベースアクセスは各レイヤーの責務とする。

pub mod error_body;
pub mod request_id;

pub use error_body::ErrorBody;
pub use request_id::RequestId;
