//! # TaskApp サーバーのエントリーポイント
//!
//! 以下の順序で初期化を行う:
//!
//! 1. 環境変数の読み込み（`.env` ファイル）
//! 2. トレーシングの初期化（`LOG_FORMAT=json` で JSON 出力）
//! 3. アプリケーション設定の読み込み
//! 4. タスクストアの構築と接続性チェック
//! 5. HTTP サーバーの起動
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p taskapp-api
//!
//! # 本番環境（環境変数を直接指定）
//! DB_NAME=taskapp DB_USER=app DB_PASSWORD=... cargo run -p taskapp-api --release
//! ```
//!
//! ## 接続できない場合の挙動
//!
//! データベースに接続できなくてもプロセスは起動する。その場合、
//! 各タスク操作は `{"error": "unable to connect to the database."}` を
//! 返し、ブラウザクライアントが警告バナーを表示する。
//! 1 リクエストの失敗がプロセスの生存に影響することはない。

use std::{env, net::SocketAddr, sync::Arc};

use taskapp_api::{app, config::AppConfig};
use taskapp_infra::{PgTaskStore, TaskStore};
use tokio::net::TcpListener;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   // 本番環境では .env ファイルは使用せず、環境変数を直接設定する
   dotenvy::dotenv().ok();

   init_tracing();

   // 設定読み込み
   let config = AppConfig::from_env().expect("設定の読み込みに失敗しました");

   // ストア構築。接続の成否はここで明示的に確認し、ログに残す。
   // 接続できなくても起動は継続する（各操作がエラー JSON を返す）。
   let store = PgTaskStore::connect(&config.database.url()).await;
   if store.is_connected() {
      tracing::info!(
         "データベースに接続しました: {}:{}/{}",
         config.database.host,
         config.database.port,
         config.database.name
      );
   } else {
      tracing::warn!("データベースに接続できません。各操作はエラーレスポンスを返します");
   }

   let app = app::build_app(Arc::new(store), &config.static_dir);

   // サーバー起動
   let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
      .parse()
      .expect("アドレスのパースに失敗しました");

   let listener = TcpListener::bind(addr).await?;
   tracing::info!("TaskApp サーバーが起動しました: {}", addr);

   axum::serve(listener, app).await?;

   Ok(())
}

/// トレーシングを初期化する
///
/// `RUST_LOG` 環境変数でログレベルを制御可能。
/// `LOG_FORMAT=json` で本番向けの JSON 出力に切り替わる。
fn init_tracing() {
   let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
      .unwrap_or_else(|_| "info,taskapp=debug".into());

   let fmt_layer = match env::var("LOG_FORMAT").as_deref() {
      Ok("json") => tracing_subscriber::fmt::layer()
         .json()
         .flatten_event(true)
         .boxed(),
      _ => tracing_subscriber::fmt::layer().boxed(),
   };

   tracing_subscriber::registry()
      .with(env_filter)
      .with(fmt_layer)
      .init();
}
