//! # TaskStore
//!
//! タスクの永続化を担当するストア。
//!
//! ## 設計方針
//!
//! - **トレイトによる分離**: API 層は [`TaskStore`] トレイトにのみ依存し、
//!   テストではスタブ実装を注入する
//! - **パラメータ化クエリ**: すべての値は `bind` で渡す。SQL 文字列への
//!   埋め込みは行わない
//! - **書き込み後の再取得**: `add` / `update` は書き込んだ行を ID で
//!   取得し直して返す。スキーマによる補完や型変換を経た正準の状態を
//!   クライアントに返すため
//! - **Disconnected 状態の許容**: 接続確立に失敗してもストアの構築自体は
//!   成功し、以後のすべての操作が [`StoreError::Disconnected`] に短絡する。
//!   起動時の接続可否は [`PgTaskStore::is_connected`] で合成ルートが確認する

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use taskapp_domain::task::{Task, TaskContent, TaskId, TaskTitle};

use crate::{db, error::StoreError};

/// タスクストアトレイト
///
/// タスクの永続化操作を定義する。各操作は `Result` を返し、
/// インフラ障害がこの境界を越えてパニックとして伝播することはない。
#[async_trait]
pub trait TaskStore: Send + Sync {
   /// 接続が使用可能かどうか
   ///
   /// 合成ルートが起動時に検査する明示的な接続性チェック。
   /// `false` でも各操作は独立してエラー `Result` を返すため、
   /// このチェックを省略しても安全性は損なわれない（多層防御）。
   fn is_connected(&self) -> bool;

   /// すべてのタスクを ID 順（= 挿入順）で取得する
   async fn get_all(&self) -> Result<Vec<Task>, StoreError>;

   /// ID でタスクを 1 件取得する
   ///
   /// # 戻り値
   ///
   /// - `Ok(Some(task))`: 見つかった場合
   /// - `Ok(None)`: 該当行が存在しない場合
   /// - `Err(_)`: 接続不能またはドライバ障害
   async fn get_by_id(&self, id: TaskId) -> Result<Option<Task>, StoreError>;

   /// タスクを追加し、採番された ID で取得し直して返す
   async fn add(&self, title: &TaskTitle, content: &TaskContent) -> Result<Task, StoreError>;

   /// タスクのタイトルと本文を更新し、更新後の行を返す
   ///
   /// 該当行が存在しない場合は `Ok(None)`。行が新規作成されることはない。
   async fn update(
      &self,
      id: TaskId,
      title: &TaskTitle,
      content: &TaskContent,
   ) -> Result<Option<Task>, StoreError>;

   /// タスクを削除する
   ///
   /// 削除は無条件かつ恒久的。該当行が既に存在しない場合も成功とする。
   async fn delete(&self, id: TaskId) -> Result<(), StoreError>;

   /// 指定 ID のタスクが存在するかどうか
   async fn exists(&self, id: TaskId) -> Result<bool, StoreError>;
}

/// tasks テーブルの行
///
/// sqlx の行マッピング専用。ドメインエンティティへの変換は `From` で行う。
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
   id:         i64,
   title:      String,
   content:    String,
   created_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
   fn from(row: TaskRow) -> Self {
      Task::from_db(
         TaskId::from_db(row.id),
         TaskTitle::from_db(row.title),
         TaskContent::from_db(row.content),
         row.created_at,
      )
   }
}

/// PostgreSQL 実装の TaskStore
///
/// 接続プール（= 接続プロバイダ）を保持する。構築時に接続が確立できなかった
/// 場合は `pool` が `None` となり、以後の操作は Disconnected として短絡する。
#[derive(Debug, Clone)]
pub struct PgTaskStore {
   pool: Option<PgPool>,
}

impl PgTaskStore {
   /// 接続を確立し、tasks テーブルのブートストラップまで行う
   ///
   /// この関数は失敗しない。接続またはブートストラップに失敗した場合は
   /// Disconnected 状態のストアを返し、エラーはログに記録する。
   /// 呼び出し元は [`is_connected`](PgTaskStore::is_connected) で
   /// 接続可否を確認できる。
   pub async fn connect(database_url: &str) -> Self {
      let pool = match db::create_pool(database_url).await {
         Ok(pool) => pool,
         Err(e) => {
            tracing::error!(error = %e, "データベース接続の確立に失敗しました");
            return Self { pool: None };
         }
      };

      if let Err(e) = db::ensure_tasks_table(&pool).await {
         tracing::error!(error = %e, "tasks テーブルのブートストラップに失敗しました");
         return Self { pool: None };
      }

      Self { pool: Some(pool) }
   }

   /// 既存のプールからストアを作成する
   ///
   /// テストや、独自に構成したプールを注入する場合に使用する。
   pub fn from_pool(pool: PgPool) -> Self {
      Self { pool: Some(pool) }
   }

   fn pool(&self) -> Result<&PgPool, StoreError> {
      self.pool.as_ref().ok_or(StoreError::Disconnected)
   }
}

#[async_trait]
impl TaskStore for PgTaskStore {
   fn is_connected(&self) -> bool {
      self.pool.is_some()
   }

   async fn get_all(&self) -> Result<Vec<Task>, StoreError> {
      let rows = sqlx::query_as::<_, TaskRow>(
         "SELECT id, title, content, created_at FROM tasks ORDER BY id",
      )
      .fetch_all(self.pool()?)
      .await
      .map_err(|e| StoreError::backend("unable to get all tasks.", e))?;

      Ok(rows.into_iter().map(Task::from).collect())
   }

   async fn get_by_id(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
      let row = sqlx::query_as::<_, TaskRow>(
         "SELECT id, title, content, created_at FROM tasks WHERE id = $1",
      )
      .bind(id.as_i64())
      .fetch_optional(self.pool()?)
      .await
      .map_err(|e| StoreError::backend(format!("unable to find task with id {id}."), e))?;

      Ok(row.map(Task::from))
   }

   async fn add(&self, title: &TaskTitle, content: &TaskContent) -> Result<Task, StoreError> {
      let new_id: i64 =
         sqlx::query_scalar("INSERT INTO tasks (title, content) VALUES ($1, $2) RETURNING id")
            .bind(title.as_str())
            .bind(content.as_str())
            .fetch_one(self.pool()?)
            .await
            .map_err(|e| {
               StoreError::backend(format!("unable to add task \"{title}\"."), e)
            })?;

      // 書き込んだ行を取得し直し、スキーマを経た正準の状態を返す
      self
         .get_by_id(TaskId::from_db(new_id))
         .await?
         .ok_or_else(|| {
            StoreError::backend(
               format!("unable to find task with id {new_id} after insert."),
               sqlx::Error::RowNotFound,
            )
         })
   }

   async fn update(
      &self,
      id: TaskId,
      title: &TaskTitle,
      content: &TaskContent,
   ) -> Result<Option<Task>, StoreError> {
      let result = sqlx::query("UPDATE tasks SET title = $1, content = $2 WHERE id = $3")
         .bind(title.as_str())
         .bind(content.as_str())
         .bind(id.as_i64())
         .execute(self.pool()?)
         .await
         .map_err(|e| StoreError::backend(format!("unable to update task {id}."), e))?;

      if result.rows_affected() == 0 {
         return Ok(None);
      }

      self.get_by_id(id).await
   }

   async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
      sqlx::query("DELETE FROM tasks WHERE id = $1")
         .bind(id.as_i64())
         .execute(self.pool()?)
         .await
         .map_err(|e| StoreError::backend(format!("unable to delete task {id}."), e))?;

      Ok(())
   }

   async fn exists(&self, id: TaskId) -> Result<bool, StoreError> {
      let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE id = $1")
         .bind(id.as_i64())
         .fetch_one(self.pool()?)
         .await
         .map_err(|e| {
            StoreError::backend(format!("unable to check if a task exists with id {id}."), e)
         })?;

      Ok(count > 0)
   }
}
