//! # エラーエンベロープ
//!
//! API の失敗レスポンス `{"error": "<メッセージ>"}` を表現する。
//!
//! ## 設計
//!
//! - ブラウザクライアントは HTTP ステータスコードではなく、ペイロードに
//!   `error` キーが存在するかどうかで成否を判定する。このキーの有無が
//!   公式の失敗シグナルであり、この型がその唯一の生成元となる。
//! - `ErrorBody` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）。
//!   axum の `IntoResponse` 変換は API 層の責務とする。

use serde::{Deserialize, Serialize};

/// 失敗レスポンスのエンベロープ
///
/// JSON に変換すると `{"error": "<メッセージ>"}` のキーを 1 つだけ持つ
/// オブジェクトになる。成功レスポンスがこのキーを持つことはない。
///
/// ## 使用例
///
/// ```
/// use taskapp_shared::ErrorBody;
///
/// let body = ErrorBody::new("unable to get all tasks.");
/// assert_eq!(body.to_json(), r#"{"error":"unable to get all tasks."}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
   pub error: String,
}

impl ErrorBody {
   /// 新しいエラーエンベロープを作成する
   pub fn new(message: impl Into<String>) -> Self {
      Self {
         error: message.into(),
      }
   }

   /// JSON テキストとして書き出す
   ///
   /// フィールドが `String` のみのため、シリアライズは失敗しない。
   pub fn to_json(&self) -> String {
      serde_json::json!({ "error": self.error }).to_string()
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_to_jsonがerrorキーのみのオブジェクトを返す() {
      let body = ErrorBody::new("boom");
      let value: serde_json::Value = serde_json::from_str(&body.to_json()).unwrap();

      let obj = value.as_object().unwrap();
      assert_eq!(obj.len(), 1);
      assert_eq!(obj["error"], "boom");
   }

   #[test]
   fn test_serializeとto_jsonが同じ形状になる() {
      let body = ErrorBody::new("unable to connect to the database.");

      assert_eq!(serde_json::to_string(&body).unwrap(), body.to_json());
   }

   #[test]
   fn test_deserializeでエラーメッセージを取り出せる() {
      let body: ErrorBody = serde_json::from_str(r#"{"error":"not good"}"#).unwrap();

      assert_eq!(body.error, "not good");
   }

   #[test]
   fn test_メッセージ内の引用符がエスケープされる() {
      let body = ErrorBody::new(r#"unable to update task "1"."#);
      let value: serde_json::Value = serde_json::from_str(&body.to_json()).unwrap();

      assert_eq!(value["error"], r#"unable to update task "1"."#);
   }
}
