//! # タスクエンティティ
//!
//! 永続化される唯一のエンティティ `Task` と、その値オブジェクトを定義する。
//!
//! ## 設計判断
//!
//! ### Newtype パターンの採用
//!
//! `TaskId` / `TaskTitle` / `TaskContent` はプリミティブ型をラップした
//! Newtype である。これにより:
//!
//! - 型安全性: タイトルと本文の取り違えをコンパイラが検出
//! - 検証の集約: 長さ制限・空文字チェックはコンストラクタの 1 箇所のみ
//! - 不変条件の保証: インスタンスが存在する時点で制約は満たされている
//!
//! ### 2 系統のコンストラクタ
//!
//! - `new`: クライアント入力用。トリムと検証を行い、失敗し得る
//! - `from_db`: データベースから取得した値の復元用。スキーマ側で制約が
//!   保証されているため検証しない
//!
//! ## 不変条件
//!
//! - `id` は正の整数で、ストアが採番した後は不変
//! - `title` は 64 文字以内、`content` は 255 文字以内
//! - `created_at` は作成時に一度だけ付与され、以後変更されない

use chrono::{DateTime, Utc};

use crate::error::DomainError;

/// タスクの一意識別子
///
/// データベースの `BIGSERIAL` が採番する正の整数。
/// クライアント入力からは [`TaskId::parse`] で検証付きで構築する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(i64);

impl TaskId {
   /// 正の整数からタスク ID を作成する
   ///
   /// ゼロ以下は [`DomainError::InvalidId`] になる。
   pub fn new(value: i64) -> Result<Self, DomainError> {
      if value > 0 {
         Ok(Self(value))
      } else {
         Err(DomainError::InvalidId(value.to_string()))
      }
   }

   /// クライアント入力の文字列を検証付きでパースする
   ///
   /// 数値として解釈できない、またはゼロ以下の場合は
   /// [`DomainError::InvalidId`] を返す。
   ///
   /// # 例
   ///
   /// ```
   /// use taskapp_domain::task::TaskId;
   ///
   /// assert!(TaskId::parse("42").is_ok());
   /// assert!(TaskId::parse("abc").is_err());
   /// assert!(TaskId::parse("0").is_err());
   /// ```
   pub fn parse(s: &str) -> Result<Self, DomainError> {
      s.parse::<i64>()
         .ok()
         .filter(|v| *v > 0)
         .map(Self)
         .ok_or_else(|| DomainError::InvalidId(s.to_string()))
   }

   /// データベースから取得した値を復元する
   ///
   /// 主キーは `BIGSERIAL` のため正であることが保証されている。
   pub fn from_db(value: i64) -> Self {
      Self(value)
   }

   /// 内部の整数値を取得する
   ///
   /// sqlx のバインドパラメータやレスポンス DTO で使用する。
   pub fn as_i64(&self) -> i64 {
      self.0
   }
}

impl std::fmt::Display for TaskId {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(f, "{}", self.0)
   }
}

/// タスクのタイトル（64 文字以内）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTitle(String);

impl TaskTitle {
   /// 最大文字数
   pub const MAX_LEN: usize = 64;
   /// タイトル省略時にスキーマが用いるプレースホルダ
   pub const PLACEHOLDER: &'static str = "No Title";

   /// クライアント入力からタイトルを作成する
   ///
   /// 前後の空白をトリムした上で検証する。トリム後に空なら
   /// [`DomainError::EmptyField`]、64 文字を超えるなら
   /// [`DomainError::TooLong`] を返す。切り詰めは行わない。
   pub fn new(value: &str) -> Result<Self, DomainError> {
      let trimmed = value.trim();
      if trimmed.is_empty() {
         return Err(DomainError::EmptyField("title"));
      }
      let len = trimmed.chars().count();
      if len > Self::MAX_LEN {
         return Err(DomainError::TooLong {
            field:  "title",
            max:    Self::MAX_LEN,
            actual: len,
         });
      }
      Ok(Self(trimmed.to_string()))
   }

   /// データベースから取得した値を復元する
   pub fn from_db(value: String) -> Self {
      Self(value)
   }

   /// 内部の文字列参照を取得する
   pub fn as_str(&self) -> &str {
      &self.0
   }
}

impl std::fmt::Display for TaskTitle {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(f, "{}", self.0)
   }
}

/// タスクの本文（255 文字以内）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskContent(String);

impl TaskContent {
   /// 最大文字数
   pub const MAX_LEN: usize = 255;

   /// クライアント入力から本文を作成する
   ///
   /// 検証規則は [`TaskTitle::new`] と同じ（トリム後非空、上限超過は拒否）。
   pub fn new(value: &str) -> Result<Self, DomainError> {
      let trimmed = value.trim();
      if trimmed.is_empty() {
         return Err(DomainError::EmptyField("content"));
      }
      let len = trimmed.chars().count();
      if len > Self::MAX_LEN {
         return Err(DomainError::TooLong {
            field:  "content",
            max:    Self::MAX_LEN,
            actual: len,
         });
      }
      Ok(Self(trimmed.to_string()))
   }

   /// データベースから取得した値を復元する
   pub fn from_db(value: String) -> Self {
      Self(value)
   }

   /// 内部の文字列参照を取得する
   pub fn as_str(&self) -> &str {
      &self.0
   }
}

impl std::fmt::Display for TaskContent {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(f, "{}", self.0)
   }
}

/// タスクエンティティ
///
/// `id` と `created_at` はストアが付与し、以後変更されない。
/// 変更可能なのは `title` と `content` のみで、それも UPDATE 文を通じて
/// データベース上で行われる（このエンティティ自体は不変として扱う）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
   id:         TaskId,
   title:      TaskTitle,
   content:    TaskContent,
   created_at: DateTime<Utc>,
}

impl Task {
   /// データベースの行からエンティティを復元する
   pub fn from_db(
      id: TaskId,
      title: TaskTitle,
      content: TaskContent,
      created_at: DateTime<Utc>,
   ) -> Self {
      Self {
         id,
         title,
         content,
         created_at,
      }
   }

   pub fn id(&self) -> TaskId {
      self.id
   }

   pub fn title(&self) -> &TaskTitle {
      &self.title
   }

   pub fn content(&self) -> &TaskContent {
      &self.content
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }
}
