//! # API 層エラー定義
//!
//! リクエストの検証失敗を表すエラーと、HTTP ステータスへのマッピングを行う。
//!
//! ## エラーの階層
//!
//! ```text
//! ドメイン層エラー (DomainError)
//!        ↓ From 変換
//! API エラー (ApiError) ── dispatch が 400 + 空ボディに変換
//! ```
//!
//! ストア層の失敗（接続不能、ドライバ障害）はこの型には含めない。
//! それらは `{"error": ...}` ボディとして 200 で返すワイヤ契約があり、
//! ハンドラが直接整形する。`ApiError` になるのは、ストアに触れる前に
//! リクエスト自体を拒否するバリデーション失敗だけである。

use axum::http::StatusCode;
use taskapp_domain::DomainError;
use thiserror::Error;

/// リクエスト検証エラー
///
/// いずれのバリアントも 400 Bad Request（空ボディ）になる。
/// ハンドラはこのエラーを返した時点でストアには一切触れていない。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
   /// 必須パラメータが存在しない
   #[error("必須パラメータがありません: {0}")]
   MissingField(String),

   /// パラメータの値が不正（空、長すぎる、ID として解釈できない）
   #[error("不正なパラメータ: {0}")]
   InvalidParam(String),
}

impl ApiError {
   /// 対応する HTTP ステータスコード
   pub fn status_code(&self) -> StatusCode {
      match self {
         Self::MissingField(_) | Self::InvalidParam(_) => StatusCode::BAD_REQUEST,
      }
   }
}

impl From<DomainError> for ApiError {
   fn from(e: DomainError) -> Self {
      match e {
         DomainError::EmptyField(field) => Self::MissingField(field.to_string()),
         other => Self::InvalidParam(other.to_string()),
      }
   }
}
