//! # リクエストコンテキスト
//!
//! リクエスト到着時に相関 ID と開始時刻を決め、完了時にレスポンスヘッダへの
//! `X-Request-Id` 付与と所要時間ログの出力を行う tower Layer。
//!
//! ## 責務分離
//!
//! - RequestContextLayer（最外）: ID 決定・計時・完了ログ・ヘッダ付与
//! - TraceLayer: [`make_request_span`](crate::observability::make_request_span) で
//!   `request_id` を持つスパンを作り、ハンドラ内のログをそのスパンに紐づける
//!
//! ```text
//! RequestContextLayer → TraceLayer → [他のミドルウェア] → handler
//! ```
//!
//! リクエストをまたぐ共有状態は持たない。

use std::{
   future::Future,
   pin::Pin,
   task::{Context, Poll},
   time::{Duration, Instant},
};

use http::{HeaderValue, Request, Response};
use tower::{Layer, Service};

use crate::{CorrelationId, observability::REQUEST_ID_HEADER};

/// リクエスト単位のコンテキスト
///
/// リクエストの extensions に格納され、ハンドラからは
/// `Extension<RequestContext>` で参照できる。
#[derive(Debug, Clone)]
pub struct RequestContext {
   pub id:         CorrelationId,
   pub started_at: Instant,
}

impl RequestContext {
   /// 受信ヘッダから相関 ID を決定してコンテキストを作る
   ///
   /// ヘッダ値が可視 ASCII として読めない場合は未指定と同じ扱いになる。
   pub fn from_request<B>(request: &Request<B>) -> Self {
      let inbound = request
         .headers()
         .get(REQUEST_ID_HEADER)
         .and_then(|value| value.to_str().ok());

      Self {
         id:         CorrelationId::resolve(inbound),
         started_at: Instant::now(),
      }
   }

   pub fn elapsed(&self) -> Duration {
      self.started_at.elapsed()
   }
}

/// ミリ秒に変換し、小数第 2 位で丸める
pub fn duration_ms(elapsed: Duration) -> f64 {
   (elapsed.as_secs_f64() * 100_000.0).round() / 100.0
}

/// リクエストコンテキストを管理する Layer
#[derive(Clone, Debug, Default)]
pub struct RequestContextLayer;

impl<S> Layer<S> for RequestContextLayer {
   type Service = RequestContextService<S>;

   fn layer(&self, inner: S) -> Self::Service {
      RequestContextService { inner }
   }
}

/// [`RequestContextLayer`] が生成する Service
#[derive(Clone, Debug)]
pub struct RequestContextService<S> {
   inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestContextService<S>
where
   S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
   S::Future: Send + 'static,
   S::Error: std::fmt::Display + 'static,
   ReqBody: Send + 'static,
   ResBody: Send + 'static,
{
   type Error = S::Error;
   type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
   type Response = S::Response;

   fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
      self.inner.poll_ready(cx)
   }

   fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
      // clone-swap パターン: poll_ready で得た readiness を保持する inner を使う
      let clone = self.inner.clone();
      let mut inner = std::mem::replace(&mut self.inner, clone);

      let context = RequestContext::from_request(&req);
      req.extensions_mut().insert(context.clone());

      Box::pin(async move {
         let result = inner.call(req).await;
         let duration_ms = duration_ms(context.elapsed());

         match result {
            Ok(mut response) => {
               // 受信値は to_str() を通過済み、生成値は UUID なので必ず成功する
               if let Ok(value) = HeaderValue::from_str(context.id.as_str()) {
                  response.headers_mut().insert(REQUEST_ID_HEADER, value);
               }
               tracing::info!(
                  request_id = %context.id,
                  status = response.status().as_u16(),
                  duration_ms,
                  "Request completed"
               );
               Ok(response)
            }
            Err(err) => {
               tracing::error!(
                  request_id = %context.id,
                  duration_ms,
                  error.message = %err,
                  "Request failed"
               );
               Err(err)
            }
         }
      })
   }
}
