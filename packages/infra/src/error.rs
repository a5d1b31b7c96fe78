//! # ストア層エラー定義
//!
//! データベース操作で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **Display がワイヤメッセージ**: このエラーの `Display` 出力は
//!   そのまま `{"error": "<メッセージ>"}` の値としてクライアントに返る。
//!   ブラウザクライアントにそのまま表示されるため、英語の平易な文とする。
//! - **コンテキスト付きラップ**: sqlx のエラーは操作ごとの文脈
//!   （"unable to get all tasks." など）を添えてラップする。
//!   元エラーは `source` として保持し、ログにのみ出力する。

use thiserror::Error;

/// ストア層で発生するエラー
///
/// すべての [`TaskStore`](crate::task_store::TaskStore) 操作はこのエラーを
/// 返す。タイムアウトもその他のドライバ障害も区別せず [`Backend`]
/// (StoreError::Backend) として扱う（二重のタイムアウト層は設けない）。
#[derive(Debug, Error)]
pub enum StoreError {
   /// 接続が確立できていない、または失われている
   ///
   /// ストアが Disconnected 状態のとき、すべての操作はデータベースに
   /// 触れる前にこのエラーで短絡する。
   #[error("unable to connect to the database.")]
   Disconnected,

   /// データベースドライバ由来の障害
   ///
   /// `context` は操作ごとの人間可読メッセージで、そのままワイヤに載る。
   #[error("{context}")]
   Backend {
      context: String,
      #[source]
      source:  sqlx::Error,
   },
}

impl StoreError {
   /// 文脈メッセージ付きでドライバエラーをラップする
   pub fn backend(context: impl Into<String>, source: sqlx::Error) -> Self {
      Self::Backend {
         context: context.into(),
         source,
      }
   }
}
