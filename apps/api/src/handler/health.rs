//! # ヘルスチェックハンドラ
//!
//! アプリケーションの稼働状態を確認するためのエンドポイント。
//! ロードバランサーや監視システムからの死活監視に使用する。
//!
//! タスク API とは異なり運用系のエンドポイントなので、
//! ディスパッチャを経由せず axum のルートに直接登録する。

use axum::Json;
use serde::Serialize;

/// ヘルスチェックレスポンス
#[derive(Debug, Serialize)]
pub struct HealthResponse {
   /// 稼働状態（`"healthy"` 固定）
   pub status:  String,
   /// アプリケーションバージョン（Cargo.toml から取得）
   pub version: String,
}

/// ヘルスチェックエンドポイント
///
/// サーバーが正常に稼働していることを確認する。データベースへの接続は
/// 確認せず、アプリケーション自体の起動状態のみを返す。
///
/// # レスポンス
///
/// 常に 200 OK:
///
/// ```text
/// $ curl http://localhost:8000/health
/// {"status":"healthy","version":"0.1.0"}
/// ```
pub async fn health_check() -> Json<HealthResponse> {
   Json(HealthResponse {
      status:  "healthy".to_string(),
      version: env!("CARGO_PKG_VERSION").to_string(),
   })
}
