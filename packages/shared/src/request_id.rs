//! # リクエスト追跡用の Request ID
//!
//! 1 つの HTTP リクエストに紐づくログを横断検索するための識別子。
//! ディスパッチ時に生成し、tracing スパンのフィールドとして記録する。
//!
//! ## 設計判断
//!
//! - **Newtype パターン**: `String` をラップして他の文字列型との混同を防ぐ
//! - **UUID v7 採用**: タイムスタンプを含むため、ログの時系列分析が容易
//! - **文字列表現**: 将来の HTTP ヘッダ伝播を考慮し、内部は文字列で保持

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// リクエスト単位の一意識別子
///
/// リクエスト受信時に生成され、そのリクエストのスパンに
/// `tracing::info_span!("request", id = %request_id)` の形で記録される。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
   /// 新しい Request ID を生成する
   ///
   /// UUID v7 を使用するため、生成順にソート可能。
   pub fn new() -> Self {
      Self(Uuid::now_v7().to_string())
   }

   /// 既存の文字列から Request ID を作成する
   ///
   /// 外部から受け取った値（例: リバースプロキシの付与するヘッダ）を
   /// 型安全に保持する際に使用する。
   pub fn from_string(s: impl Into<String>) -> Self {
      Self(s.into())
   }

   /// 内部の文字列参照を取得する
   pub fn as_str(&self) -> &str {
      &self.0
   }
}

impl Default for RequestId {
   fn default() -> Self {
      Self::new()
   }
}

impl fmt::Display for RequestId {
   /// `tracing` マクロの `%` フォーマッタで使用される
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "{}", self.0)
   }
}
