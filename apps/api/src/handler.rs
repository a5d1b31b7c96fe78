//! # HTTP リクエストハンドラ
//!
//! ルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - ハンドラは薄く保つ: バリデーション → ストア呼び出し → JSON 整形のみ
//! - ハンドラはステートレスかつ再入可能。リクエスト間で共有するのは
//!   `Arc<S: TaskStore>` だけ
//!
//! ## モジュール構成
//!
//! ```text
//! handler.rs          # 親モジュール（re-export）
//! └── handler/
//!     ├── health.rs   # ヘルスチェックハンドラ（axum 直結）
//!     └── tasks.rs    # タスク CRUD ハンドラ（ApiRouter 経由）
//! ```

pub mod health;
pub mod tasks;

pub use health::health_check;
