//! # タスク API ハンドラ
//!
//! タスク CRUD の 4 エンドポイントを [`ApiRouter`] に束ねる。
//!
//! ## エンドポイント
//!
//! | メソッド | パス | ストア操作 |
//! |----------|------|-----------|
//! | GET | `/tasks` | `get_all` |
//! | POST | `/tasks` | `add` |
//! | PUT | `/tasks/{id}` | `update` |
//! | DELETE | `/tasks/{id}` | `delete` |
//!
//! ## 失敗の扱い
//!
//! - バリデーション失敗は `ApiError` として返し、ディスパッチが
//!   400 + 空ボディに変換する。**このときストアには一切触れない**
//! - ストアの失敗は `{"error": "<メッセージ>"}` ボディとして 200 で返す。
//!   クライアントはステータスコードではなく `error` キーで成否を判定する

use std::sync::Arc;

use serde::Serialize;
use taskapp_domain::task::{Task, TaskContent, TaskId, TaskTitle};
use taskapp_infra::{StoreError, TaskStore};
use taskapp_shared::ErrorBody;

use crate::{
   error::ApiError,
   router::{ApiRouter, HandlerResult, RequestContext},
};

/// タスクのレスポンス DTO
///
/// ワイヤ形状: `{"id": 1, "title": "...", "content": "...",
/// "created_at": "<RFC 3339>"}`
#[derive(Debug, Serialize)]
pub struct TaskDto {
   pub id:         i64,
   pub title:      String,
   pub content:    String,
   pub created_at: String,
}

impl TaskDto {
   fn from_task(task: &Task) -> Self {
      Self {
         id:         task.id().as_i64(),
         title:      task.title().as_str().to_string(),
         content:    task.content().as_str().to_string(),
         created_at: task.created_at().to_rfc3339(),
      }
   }
}

/// 4 つのタスクルートを登録する
///
/// ストアは合成ルートで一度だけ構築され、ここで各ハンドラのクロージャに
/// 注入される（グローバル状態への暗黙アクセスはしない）。
pub fn register_routes<S: TaskStore + 'static>(router: &mut ApiRouter, store: Arc<S>) {
   let s = Arc::clone(&store);
   router.get("/tasks", move |ctx| list_tasks(Arc::clone(&s), ctx));

   let s = Arc::clone(&store);
   router.post("/tasks", move |ctx| create_task(Arc::clone(&s), ctx));

   let s = Arc::clone(&store);
   router.put("/tasks/{id}", move |ctx| update_task(Arc::clone(&s), ctx));

   let s = Arc::clone(&store);
   router.delete("/tasks/{id}", move |ctx| delete_task(Arc::clone(&s), ctx));
}

/// GET /tasks - 全タスクを ID 順で返す
pub async fn list_tasks<S: TaskStore>(store: Arc<S>, _ctx: RequestContext) -> HandlerResult {
   Ok(match store.get_all().await {
      Ok(tasks) => {
         let dtos: Vec<TaskDto> = tasks.iter().map(TaskDto::from_task).collect();
         to_json_body(&dtos)
      }
      Err(e) => store_error_body("get_all", &e),
   })
}

/// POST /tasks - タスクを追加し、作成された行を返す
pub async fn create_task<S: TaskStore>(store: Arc<S>, ctx: RequestContext) -> HandlerResult {
   // バリデーションが通るまでストアには触れない
   let title = TaskTitle::new(ctx.required("title")?)?;
   let content = TaskContent::new(ctx.required("content")?)?;

   Ok(match store.add(&title, &content).await {
      Ok(task) => to_json_body(&TaskDto::from_task(&task)),
      Err(e) => store_error_body("add", &e),
   })
}

/// PUT /tasks/{id} - タスクのタイトルと本文を更新し、更新後の行を返す
pub async fn update_task<S: TaskStore>(store: Arc<S>, ctx: RequestContext) -> HandlerResult {
   let id = require_task_id(&ctx)?;
   let title = TaskTitle::new(ctx.required("title")?)?;
   let content = TaskContent::new(ctx.required("content")?)?;

   Ok(match store.update(id, &title, &content).await {
      Ok(Some(task)) => to_json_body(&TaskDto::from_task(&task)),
      Ok(None) => not_found_body(id),
      Err(e) => store_error_body("update", &e),
   })
}

/// DELETE /tasks/{id} - タスクを削除する
pub async fn delete_task<S: TaskStore>(store: Arc<S>, ctx: RequestContext) -> HandlerResult {
   let id = require_task_id(&ctx)?;

   Ok(match store.delete(id).await {
      // リクエストされた ID をそのまま確認応答する
      Ok(()) => serde_json::json!({ "id": id.to_string() }).to_string(),
      Err(e) => store_error_body("delete", &e),
   })
}

/// パスパラメータ `{id}` を検証付きで取り出す
///
/// ボディやクエリの同名キーに惑わされないよう、必ず `path_params` 側から
/// 読む。正の整数でなければ 400 になる。
fn require_task_id(ctx: &RequestContext) -> Result<TaskId, ApiError> {
   let raw = ctx
      .path_param("id")
      .ok_or_else(|| ApiError::MissingField("id".to_string()))?;
   Ok(TaskId::parse(raw)?)
}

fn to_json_body<T: Serialize>(value: &T) -> String {
   serde_json::to_string(value)
      .unwrap_or_else(|e| ErrorBody::new(format!("failed to serialize response: {e}")).to_json())
}

/// ストア失敗をワイヤ契約の `{"error": ...}` ボディに変換する
fn store_error_body(operation: &str, error: &StoreError) -> String {
   tracing::warn!(error = %error, operation, "ストア操作が失敗しました");
   ErrorBody::new(error.to_string()).to_json()
}

/// 存在しない ID への操作が返す安定した形状
fn not_found_body(id: TaskId) -> String {
   ErrorBody::new(format!("no task with id {id}")).to_json()
}

#[cfg(test)]
mod tests {
   use std::{
      collections::HashMap,
      sync::atomic::{AtomicUsize, Ordering},
   };

   use async_trait::async_trait;
   use chrono::Utc;
   use pretty_assertions::assert_eq;

   use super::*;

   /// 呼び出し回数を記録するスタブストア
   #[derive(Default)]
   struct StubTaskStore {
      tasks:        Vec<Task>,
      disconnected: bool,
      add_calls:    AtomicUsize,
      update_calls: AtomicUsize,
      delete_calls: AtomicUsize,
   }

   impl StubTaskStore {
      fn with_tasks(tasks: Vec<Task>) -> Self {
         Self {
            tasks,
            ..Self::default()
         }
      }

      fn disconnected() -> Self {
         Self {
            disconnected: true,
            ..Self::default()
         }
      }
   }

   #[async_trait]
   impl TaskStore for StubTaskStore {
      fn is_connected(&self) -> bool {
         !self.disconnected
      }

      async fn get_all(&self) -> Result<Vec<Task>, StoreError> {
         if self.disconnected {
            return Err(StoreError::Disconnected);
         }
         Ok(self.tasks.clone())
      }

      async fn get_by_id(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
         if self.disconnected {
            return Err(StoreError::Disconnected);
         }
         Ok(self.tasks.iter().find(|t| t.id() == id).cloned())
      }

      async fn add(&self, title: &TaskTitle, content: &TaskContent) -> Result<Task, StoreError> {
         self.add_calls.fetch_add(1, Ordering::SeqCst);
         if self.disconnected {
            return Err(StoreError::Disconnected);
         }
         Ok(Task::from_db(
            TaskId::from_db(1),
            title.clone(),
            content.clone(),
            Utc::now(),
         ))
      }

      async fn update(
         &self,
         id: TaskId,
         title: &TaskTitle,
         content: &TaskContent,
      ) -> Result<Option<Task>, StoreError> {
         self.update_calls.fetch_add(1, Ordering::SeqCst);
         if self.disconnected {
            return Err(StoreError::Disconnected);
         }
         Ok(self.tasks.iter().any(|t| t.id() == id).then(|| {
            Task::from_db(id, title.clone(), content.clone(), Utc::now())
         }))
      }

      async fn delete(&self, _id: TaskId) -> Result<(), StoreError> {
         self.delete_calls.fetch_add(1, Ordering::SeqCst);
         if self.disconnected {
            return Err(StoreError::Disconnected);
         }
         Ok(())
      }

      async fn exists(&self, id: TaskId) -> Result<bool, StoreError> {
         if self.disconnected {
            return Err(StoreError::Disconnected);
         }
         Ok(self.tasks.iter().any(|t| t.id() == id))
      }
   }

   fn sample_task(id: i64, title: &str, content: &str) -> Task {
      Task::from_db(
         TaskId::from_db(id),
         TaskTitle::from_db(title.to_string()),
         TaskContent::from_db(content.to_string()),
         Utc::now(),
      )
   }

   fn ctx(path_params: &[(&str, &str)], params: &[(&str, &str)]) -> RequestContext {
      let path: HashMap<String, String> = path_params
         .iter()
         .map(|(k, v)| (k.to_string(), v.to_string()))
         .collect();
      let mut merged: HashMap<String, String> = path.clone();
      merged.extend(params.iter().map(|(k, v)| (k.to_string(), v.to_string())));
      RequestContext::new(path, merged)
   }

   // ===== バリデーションの短絡（ストアに触れないこと） =====

   #[tokio::test]
   async fn test_contentを欠くpostは400でストアは呼ばれない() {
      let store = Arc::new(StubTaskStore::default());

      let result = create_task(Arc::clone(&store), ctx(&[], &[("title", "Buy milk")])).await;

      assert_eq!(
         result,
         Err(ApiError::MissingField("content".to_string()))
      );
      assert_eq!(store.add_calls.load(Ordering::SeqCst), 0);
   }

   #[tokio::test]
   async fn test_不正なidのdeleteはストアに到達しない() {
      let store = Arc::new(StubTaskStore::default());

      let result = delete_task(Arc::clone(&store), ctx(&[("id", "abc")], &[])).await;

      assert!(matches!(result, Err(ApiError::InvalidParam(_))));
      assert_eq!(store.delete_calls.load(Ordering::SeqCst), 0);
   }

   #[tokio::test]
   async fn test_ゼロ以下のidのdeleteも拒否される() {
      let store = Arc::new(StubTaskStore::default());

      for raw in ["0", "-1"] {
         let result = delete_task(Arc::clone(&store), ctx(&[("id", raw)], &[])).await;
         assert!(matches!(result, Err(ApiError::InvalidParam(_))));
      }
      assert_eq!(store.delete_calls.load(Ordering::SeqCst), 0);
   }

   #[tokio::test]
   async fn test_64文字を超えるタイトルのpostは400でストアは呼ばれない() {
      let store = Arc::new(StubTaskStore::default());
      let long_title = "a".repeat(65);

      let result = create_task(
         Arc::clone(&store),
         ctx(&[], &[("title", &long_title), ("content", "c")]),
      )
      .await;

      assert!(matches!(result, Err(ApiError::InvalidParam(_))));
      assert_eq!(store.add_calls.load(Ordering::SeqCst), 0);
   }

   #[tokio::test]
   async fn test_idを欠くupdateはストアに到達しない() {
      let store = Arc::new(StubTaskStore::default());

      let result = update_task(
         Arc::clone(&store),
         ctx(&[], &[("title", "t"), ("content", "c")]),
      )
      .await;

      assert_eq!(result, Err(ApiError::MissingField("id".to_string())));
      assert_eq!(store.update_calls.load(Ordering::SeqCst), 0);
   }

   // ===== 成功レスポンスの形状 =====

   #[tokio::test]
   async fn test_createの成功レスポンスはタスクのdto形状() {
      let store = Arc::new(StubTaskStore::default());

      let body = create_task(
         store,
         ctx(&[], &[("title", "Buy milk"), ("content", "2%  reduced fat")]),
      )
      .await
      .unwrap();

      let value: serde_json::Value = serde_json::from_str(&body).unwrap();
      assert_eq!(value["id"], 1);
      assert_eq!(value["title"], "Buy milk");
      assert_eq!(value["content"], "2%  reduced fat");
      assert!(value["created_at"].is_string());
      assert!(value.get("error").is_none());
   }

   #[tokio::test]
   async fn test_deleteはリクエストされたidを文字列で確認応答する() {
      let store = Arc::new(StubTaskStore::default());

      let body = delete_task(store, ctx(&[("id", "1")], &[])).await.unwrap();

      assert_eq!(body, r#"{"id":"1"}"#);
   }

   #[tokio::test]
   async fn test_list_tasksは配列を返す() {
      let store = Arc::new(StubTaskStore::with_tasks(vec![
         sample_task(1, "first", "a"),
         sample_task(2, "second", "b"),
      ]));

      let body = list_tasks(store, ctx(&[], &[])).await.unwrap();

      let value: serde_json::Value = serde_json::from_str(&body).unwrap();
      let items = value.as_array().unwrap();
      assert_eq!(items.len(), 2);
      assert_eq!(items[0]["id"], 1);
      assert_eq!(items[1]["title"], "second");
   }

   // ===== 失敗レスポンスの形状 =====

   #[tokio::test]
   async fn test_存在しないidのupdateはnot_found形状を返す() {
      let store = Arc::new(StubTaskStore::default());

      let body = update_task(
         store,
         ctx(&[("id", "42")], &[("title", "t"), ("content", "c")]),
      )
      .await
      .unwrap();

      assert_eq!(body, r#"{"error":"no task with id 42"}"#);
   }

   #[tokio::test]
   async fn test_切断時のget_allはerrorキー付きボディを返す() {
      let store = Arc::new(StubTaskStore::disconnected());

      // ハンドラとしては成功（ボディに error キーを載せて返す契約）
      let body = list_tasks(store, ctx(&[], &[])).await.unwrap();

      assert_eq!(body, r#"{"error":"unable to connect to the database."}"#);
   }

   #[tokio::test]
   async fn test_ボディのidはパスパラメータを上書きできない() {
      let store = Arc::new(StubTaskStore::with_tasks(vec![sample_task(5, "t", "c")]));

      // マージ後の params では id=999 だが、path_params の 5 が使われる
      let body = update_task(
         store,
         ctx(
            &[("id", "5")],
            &[("id", "999"), ("title", "new"), ("content", "body")],
         ),
      )
      .await
      .unwrap();

      let value: serde_json::Value = serde_json::from_str(&body).unwrap();
      assert_eq!(value["id"], 5);
   }
}
