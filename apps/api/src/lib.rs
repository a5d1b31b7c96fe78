//! # TaskApp API サーバー
//!
//! タスク管理のための CRUD API と、ブラウザクライアントの配信を行う。
//!
//! ## アーキテクチャ
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Browser   │────▶│  TaskApp API │────▶│  PostgreSQL  │
//! │ (static/*)  │     │ (port 8000)  │     │              │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! リクエストの流れ:
//!
//! ```text
//! axum（トランスポート層: TCP, TraceLayer, 静的ファイル配信）
//!    │ fallback
//!    ▼
//! router::ApiRouter.dispatch（パターンマッチ + パラメータ抽出）
//!    │ RequestContext
//!    ▼
//! handler::tasks（バリデーション → ストア呼び出し → JSON 整形）
//!    │
//!    ▼
//! taskapp_infra::TaskStore（パラメータ化 SQL, 障害封じ込め）
//! ```
//!
//! ## モジュール構成
//!
//! - [`config`] - アプリケーション設定（環境変数からの読み込み）
//! - [`router`] - パスパターンマッチングとディスパッチ
//! - [`handler`] - HTTP リクエストハンドラ
//! - [`error`] - バリデーションエラー定義
//! - [`app`] - axum アプリケーションの組み立て
//!
//! ## 依存関係
//!
//! このクレートは以下のクレートに依存する:
//!
//! - `taskapp_domain`: タスクエンティティ、値オブジェクト
//! - `taskapp_infra`: データベースアクセス
//! - `taskapp_shared`: エラーエンベロープ、Request ID

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
