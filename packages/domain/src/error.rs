//! # ドメイン層エラー定義
//!
//! 値オブジェクトのコンストラクタが返すバリデーションエラー。
//! API 層でこのエラーを 400 Bad Request にマッピングする。

use thiserror::Error;

/// ドメイン層のバリデーションエラー
///
/// いずれのバリアントもクライアント入力の不備を表す。
/// データベースや接続の異常はここには含めない（インフラ層の責務）。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
   /// 必須フィールドが空（トリム後に空文字列）
   #[error("{0} が空です")]
   EmptyField(&'static str),

   /// フィールドが最大長を超過
   ///
   /// 超過分を黙って切り詰めることはせず、明示的に拒否する。
   #[error("{field} は {max} 文字以内で指定してください（{actual} 文字）")]
   TooLong {
      field:  &'static str,
      max:    usize,
      actual: usize,
   },

   /// タスク ID として解釈できない値（非数値、ゼロ以下）
   #[error("不正なタスク ID: {0}")]
   InvalidId(String),
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_too_longのdisplayに上限と実際の長さが含まれる() {
      let err = DomainError::TooLong {
         field:  "title",
         max:    64,
         actual: 70,
      };

      assert_eq!(
         format!("{err}"),
         "title は 64 文字以内で指定してください（70 文字）"
      );
   }

   #[test]
   fn test_invalid_idのdisplayに入力値が含まれる() {
      let err = DomainError::InvalidId("abc".to_string());

      assert_eq!(format!("{err}"), "不正なタスク ID: abc");
   }
}
