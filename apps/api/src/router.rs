//! # パスパターンルーター
//!
//! (メソッド, パスパターン) とハンドラの対応を登録し、受信リクエストを
//! ディスパッチする。axum のルーターは使わず、このモジュールが
//! ルーティングの意味論を一手に担う（axum はトランスポートのみ）。
//!
//! ## パターンマッチングの規則
//!
//! パターンとパスを `/` 区切りのセグメント列に分割し、以下をすべて
//! 満たすときマッチとする:
//!
//! - セグメント数が等しい
//! - リテラルセグメントは大文字小文字を区別して一致する
//! - `{name}` セグメントは空でない任意のセグメントに一致し、
//!   `name → 値` を束縛する
//!
//! 複数のパターンが重なる場合は**先に登録した方が勝つ**。
//! 最長一致などの特異性ヒューリスティックは持たない（決定性を優先）。
//!
//! ## パラメータのマージ
//!
//! ハンドラに渡す [`RequestContext`] の `params` は、次の優先順位で
//! マージする（後のものが前のものを上書きする）:
//!
//! 1. パスパラメータ
//! 2. クエリ文字列のキー/値
//! 3. リクエストボディ（POST/PUT のフォームエンコード）のキー/値
//!
//! パスパラメータだけは `path_params` として別途保持し、
//! ボディによる上書きの影響を受けずに参照できる。
//!
//! ## ディスパッチの結果
//!
//! | 状況 | ステータス | ボディ |
//! |------|-----------|--------|
//! | パスが一致しない | 404 | 空 |
//! | パスは一致するがメソッドが異なる | 405 | 空 |
//! | ハンドラがバリデーション失敗 | 400 | 空 |
//! | ハンドラが成功 | 200 | JSON |
//!
//! ステータスコードを決定するのはディスパッチのこの一箇所だけである。

use std::{collections::HashMap, future::Future, pin::Pin};

use axum::http::{Method, StatusCode};

use crate::error::ApiError;

/// ハンドラが返す結果
///
/// `Ok` は 200 で返す JSON ボディ。`Err` はバリデーション失敗で、
/// ディスパッチが 400 + 空ボディに変換する。
pub type HandlerResult = Result<String, ApiError>;

type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;
type BoxedHandler = Box<dyn Fn(RequestContext) -> HandlerFuture + Send + Sync>;

/// ハンドラに渡されるリクエストコンテキスト
///
/// `params` はパス・クエリ・ボディをマージした平坦なマップ、
/// `path_params` はパスパラメータのみのサブセット。
#[derive(Debug, Default)]
pub struct RequestContext {
   path_params: HashMap<String, String>,
   params:      HashMap<String, String>,
}

impl RequestContext {
   pub(crate) fn new(
      path_params: HashMap<String, String>,
      params: HashMap<String, String>,
   ) -> Self {
      Self {
         path_params,
         params,
      }
   }

   /// 必須パラメータを取得する
   ///
   /// 存在しない場合は [`ApiError::MissingField`] を返す。
   /// バリデーションをハンドラごとに再実装せず、このアクセサに集約する。
   pub fn required(&self, name: &str) -> Result<&str, ApiError> {
      self
         .params
         .get(name)
         .map(String::as_str)
         .ok_or_else(|| ApiError::MissingField(name.to_string()))
   }

   /// 任意パラメータを取得する
   pub fn param(&self, name: &str) -> Option<&str> {
      self.params.get(name).map(String::as_str)
   }

   /// パスパラメータを取得する
   ///
   /// クエリやボディの同名キーに上書きされない生の束縛値。
   pub fn path_param(&self, name: &str) -> Option<&str> {
      self.path_params.get(name).map(String::as_str)
   }
}

/// パスパターンの 1 セグメント
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
   /// そのままの文字列と一致するセグメント
   Literal(String),
   /// `{name}` 形式。空でない任意のセグメントに一致し、値を束縛する
   Param(String),
}

/// 登録時にパースされたパスパターン
#[derive(Debug, Clone)]
struct PathPattern {
   segments: Vec<Segment>,
}

impl PathPattern {
   fn parse(pattern: &str) -> Self {
      let segments = pattern
         .split('/')
         .map(|seg| {
            match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
               Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
               _ => Segment::Literal(seg.to_string()),
            }
         })
         .collect();
      Self { segments }
   }

   /// パスがこのパターンに一致すれば、束縛したパスパラメータを返す
   fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
      let parts: Vec<&str> = path.split('/').collect();
      if parts.len() != self.segments.len() {
         return None;
      }

      let mut bound = HashMap::new();
      for (segment, part) in self.segments.iter().zip(&parts) {
         match segment {
            Segment::Literal(lit) if lit == part => {}
            Segment::Literal(_) => return None,
            // パラメータは空セグメントには一致しない
            Segment::Param(_) if part.is_empty() => return None,
            Segment::Param(name) => {
               bound.insert(name.clone(), decode_component(part));
            }
         }
      }
      Some(bound)
   }
}

/// 登録された 1 ルート
///
/// 起動時の登録以降は不変。ルート集合全体がプロセス全域の
/// ルーティング状態となる。
struct RouteEntry {
   method:  Method,
   pattern: PathPattern,
   handler: BoxedHandler,
}

/// パスパターンルーター
///
/// ## 使用例
///
/// ```rust,ignore
/// let mut router = ApiRouter::new();
/// router.get("/tasks", |ctx| async move { Ok("[]".to_string()) });
/// router.put("/tasks/{id}", move |ctx| update_task(store.clone(), ctx));
///
/// let (status, body) = router
///     .dispatch(&Method::GET, "/tasks", None, "")
///     .await;
/// ```
pub struct ApiRouter {
   routes: Vec<RouteEntry>,
}

impl ApiRouter {
   pub fn new() -> Self {
      Self { routes: Vec::new() }
   }

   /// ルートを登録する
   ///
   /// 同じ (メソッド, パス) に一致するパターンが複数登録された場合、
   /// 先に登録されたものが使われる。
   pub fn register<H, Fut>(&mut self, method: Method, pattern: &str, handler: H)
   where
      H: Fn(RequestContext) -> Fut + Send + Sync + 'static,
      Fut: Future<Output = HandlerResult> + Send + 'static,
   {
      self.routes.push(RouteEntry {
         method,
         pattern: PathPattern::parse(pattern),
         handler: Box::new(move |ctx| Box::pin(handler(ctx))),
      });
   }

   /// GET ルートを登録する
   pub fn get<H, Fut>(&mut self, pattern: &str, handler: H)
   where
      H: Fn(RequestContext) -> Fut + Send + Sync + 'static,
      Fut: Future<Output = HandlerResult> + Send + 'static,
   {
      self.register(Method::GET, pattern, handler);
   }

   /// POST ルートを登録する
   pub fn post<H, Fut>(&mut self, pattern: &str, handler: H)
   where
      H: Fn(RequestContext) -> Fut + Send + Sync + 'static,
      Fut: Future<Output = HandlerResult> + Send + 'static,
   {
      self.register(Method::POST, pattern, handler);
   }

   /// PUT ルートを登録する
   pub fn put<H, Fut>(&mut self, pattern: &str, handler: H)
   where
      H: Fn(RequestContext) -> Fut + Send + Sync + 'static,
      Fut: Future<Output = HandlerResult> + Send + 'static,
   {
      self.register(Method::PUT, pattern, handler);
   }

   /// DELETE ルートを登録する
   pub fn delete<H, Fut>(&mut self, pattern: &str, handler: H)
   where
      H: Fn(RequestContext) -> Fut + Send + Sync + 'static,
      Fut: Future<Output = HandlerResult> + Send + 'static,
   {
      self.register(Method::DELETE, pattern, handler);
   }

   /// リクエストを解決し、ステータスコードとボディを返す
   ///
   /// ルートは登録順に走査し、パスとメソッドの両方が一致した最初の
   /// ルートのハンドラを呼び出す。パスだけ一致するルートがあった場合は
   /// 405、どのパスにも一致しなければ 404。
   pub async fn dispatch(
      &self,
      method: &Method,
      path: &str,
      raw_query: Option<&str>,
      raw_body: &str,
   ) -> (StatusCode, String) {
      let mut path_matched = false;

      for route in &self.routes {
         let Some(path_params) = route.pattern.matches(path) else {
            continue;
         };
         if route.method != *method {
            path_matched = true;
            continue;
         }

         let ctx = build_context(method, path_params, raw_query, raw_body);
         return match (route.handler)(ctx).await {
            Ok(body) => (StatusCode::OK, body),
            Err(e) => {
               tracing::debug!(error = %e, %method, path, "リクエストの検証に失敗しました");
               (e.status_code(), String::new())
            }
         };
      }

      if path_matched {
         (StatusCode::METHOD_NOT_ALLOWED, String::new())
      } else {
         (StatusCode::NOT_FOUND, String::new())
      }
   }
}

impl Default for ApiRouter {
   fn default() -> Self {
      Self::new()
   }
}

/// パス・クエリ・ボディをマージしてコンテキストを組み立てる
///
/// ボディのデコードは POST/PUT のみ（フォームエンコードされたボディを
/// 持つのはこの 2 メソッドだけという契約）。
fn build_context(
   method: &Method,
   path_params: HashMap<String, String>,
   raw_query: Option<&str>,
   raw_body: &str,
) -> RequestContext {
   let mut params = path_params.clone();

   if let Some(query) = raw_query {
      params.extend(parse_pairs(query));
   }
   if *method == Method::POST || *method == Method::PUT {
      params.extend(parse_pairs(raw_body));
   }

   RequestContext::new(path_params, params)
}

/// `key=value&key2=value2` 形式の文字列をデコードして列挙する
///
/// `=` を含まないチャンクは空値のキーとして扱う。
fn parse_pairs(raw: &str) -> Vec<(String, String)> {
   raw.split('&')
      .filter(|chunk| !chunk.is_empty())
      .map(|chunk| {
         let (key, value) = chunk.split_once('=').unwrap_or((chunk, ""));
         (decode_component(key), decode_component(value))
      })
      .collect()
}

/// フォーム/クエリの 1 要素をパーセントデコードする
///
/// フォームエンコードの規則に従い `+` は空白として扱う。
/// 不正なパーセント列は生のまま返す（リクエストを落とさない）。
fn decode_component(raw: &str) -> String {
   let plus_decoded = raw.replace('+', " ");
   match urlencoding::decode(&plus_decoded) {
      Ok(decoded) => decoded.into_owned(),
      Err(_) => plus_decoded,
   }
}
