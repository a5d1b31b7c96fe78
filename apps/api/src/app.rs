//! # axum アプリケーションの組み立て
//!
//! トランスポート層（axum）とルーティング層（[`ApiRouter`]）を接続する。
//!
//! ## 責務の分担
//!
//! - axum: TCP、リクエストのパース、静的ファイル配信、TraceLayer
//! - `ApiRouter`: パターンマッチ、パラメータ抽出、ステータス決定
//!
//! axum 側には固定ルート（`/health`、静的ファイル）だけを置き、
//! タスク API はすべて fallback からディスパッチャに流す。
//! この関数をテストから呼び出せば、ネットワークなしで
//! `tower::ServiceExt::oneshot` によるリクエスト往復を検証できる。

use std::sync::Arc;

use axum::{
   Router,
   body::Body,
   extract::Request,
   http::{StatusCode, header},
   response::{IntoResponse, Response},
   routing::get,
};
use taskapp_infra::TaskStore;
use taskapp_shared::RequestId;
use tower_http::{
   services::{ServeDir, ServeFile},
   trace::TraceLayer,
};

use crate::{handler, router::ApiRouter};

/// リクエストボディの上限
///
/// フォームエンコードされた短いペイロードのみを想定している。
const BODY_LIMIT: usize = 64 * 1024;

/// アプリケーション全体の axum ルーターを構築する
///
/// # 引数
///
/// * `store` - 合成ルートで構築済みのタスクストア
/// * `static_dir` - ブラウザクライアントのディレクトリ
pub fn build_app<S: TaskStore + 'static>(store: Arc<S>, static_dir: &str) -> Router {
   let mut api = ApiRouter::new();
   handler::tasks::register_routes(&mut api, store);
   let api = Arc::new(api);

   Router::new()
      .route("/health", get(handler::health_check))
      .route_service("/", ServeFile::new(format!("{static_dir}/index.html")))
      .nest_service("/static", ServeDir::new(static_dir))
      .fallback(move |request: Request| {
         let api = Arc::clone(&api);
         async move { dispatch(api, request).await }
      })
      .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
}

/// axum のリクエストをディスパッチャの入力に変換し、結果をレスポンスにする
async fn dispatch(api: Arc<ApiRouter>, request: Request) -> Response {
   let (parts, body) = request.into_parts();

   let bytes = match axum::body::to_bytes(body, BODY_LIMIT).await {
      Ok(bytes) => bytes,
      Err(e) => {
         tracing::debug!(error = %e, "リクエストボディの読み取りに失敗しました");
         return StatusCode::BAD_REQUEST.into_response();
      }
   };
   let raw_body = String::from_utf8_lossy(&bytes);

   let (status, body) = api
      .dispatch(&parts.method, parts.uri.path(), parts.uri.query(), &raw_body)
      .await;

   if body.is_empty() {
      status.into_response()
   } else {
      (
         status,
         [(header::CONTENT_TYPE, "application/json")],
         body,
      )
         .into_response()
   }
}

/// リクエストごとのスパンを作成する
///
/// Request ID を払い出してスパンに記録し、1 リクエストに紐づくログを
/// 横断検索できるようにする。
fn make_request_span(request: &axum::http::Request<Body>) -> tracing::Span {
   let request_id = RequestId::new();
   tracing::info_span!(
      "request",
      id = %request_id,
      method = %request.method(),
      path = %request.uri().path(),
   )
}
