//! # Observability 基盤
//!
//! トレーシング初期化とリクエストスパンの生成を提供する。
//! ログ出力形式は環境変数 `LOG_FORMAT` で JSON / Pretty を切り替える。

/// 相関 ID をやり取りする HTTP ヘッダ名
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// ログ出力形式
///
/// 値が未設定または不正な場合は [`Pretty`](LogFormat::Pretty) にフォールバックする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
   /// JSON 形式（本番環境向け）
   Json,
   /// 人間が読みやすい形式（開発環境向け）
   #[default]
   Pretty,
}

impl LogFormat {
   /// 文字列からログ形式をパースする
   ///
   /// 不正な値の場合は [`Pretty`](LogFormat::Pretty) にフォールバックし、
   /// stderr に警告を出力する。
   pub fn parse(s: &str) -> Self {
      match s {
         "json" => Self::Json,
         "pretty" => Self::Pretty,
         other => {
            eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
            Self::Pretty
         }
      }
   }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
   /// サービス名（呼び出し元でルートスパンに付与する）
   pub service_name:      String,
   /// ログ出力形式
   pub log_format:        LogFormat,
   /// `RUST_LOG` 未設定時に使うフィルタ（例: `"info"`）
   pub default_directive: String,
}

impl TracingConfig {
   pub fn new(
      service_name: impl Into<String>,
      log_format: LogFormat,
      default_directive: impl Into<String>,
   ) -> Self {
      Self {
         service_name: service_name.into(),
         log_format,
         default_directive: default_directive.into(),
      }
   }
}

/// トレーシングを初期化する
///
/// `RUST_LOG` が設定されていればそれを優先し、無ければ
/// [`TracingConfig::default_directive`] を使う。
/// `tracing_error::ErrorLayer` を登録するため、エラー生成時に
/// `SpanTrace` を捕捉できる。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) {
   use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

   let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
      .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.default_directive));

   let fmt_layer = match config.log_format {
      LogFormat::Json => tracing_subscriber::fmt::layer()
         .json()
         .flatten_event(true)
         .with_target(true)
         .with_current_span(true)
         .with_span_list(false)
         .boxed(),
      LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
   };

   tracing_subscriber::registry()
      .with(env_filter)
      .with(fmt_layer)
      .with(tracing_error::ErrorLayer::default())
      .init();
}

/// TraceLayer 用のリクエストスパンを生成する
///
/// [`RequestContextLayer`](crate::request_context::RequestContextLayer) が
/// extensions に入れた相関 ID を `request_id` フィールドに記録する。
/// ハンドラ内のログはすべてこのスパンの子になる。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
   let request_id = request
      .extensions()
      .get::<crate::request_context::RequestContext>()
      .map(|context| context.id.to_string())
      .unwrap_or_else(|| "-".to_string());

   tracing::info_span!(
      "request",
      request_id = %request_id,
      method = %request.method(),
      uri = %request.uri(),
   )
}
