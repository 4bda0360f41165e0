//! # アプリケーション設定
//!
//! 環境変数からアプリケーション設定を読み込み、検証する。
//!
//! ## 設計方針
//!
//! [12-Factor App](https://12factor.net/ja/config) の原則に従い、
//! すべての設定を環境変数から読み込む。不正な値は黙って既定値に
//! 置き換えず、起動時に [`ConfigError`] として報告する。
//!
//! 空文字列の変数は未設定として扱う。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | デフォルト | 説明 |
//! |--------|------------|------|
//! | `NODE_ENV` | `production` | 実行モード（development/production/test） |
//! | `HOST` | `0.0.0.0` | バインドアドレス |
//! | `PORT` | `3000` | ポート番号（1〜65535） |
//! | `FASTIFY_CLOSE_GRACE_DELAY` | `500` | 終了シグナル後の猶予（ミリ秒） |
//! | `CORS_ORIGINS` | なし | 許可するオリジン（カンマ区切り） |
//! | `LOG_LEVEL` | `info` | fatal/error/warn/info/debug/trace |
//! | `LOG_FORMAT` | `pretty` | json/pretty |
//!
//! `RUST_LOG` が設定されている場合は `LOG_LEVEL` より優先される。
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use keystone_api::config::AppConfig;
//!
//! dotenvy::dotenv().ok();
//! let config = AppConfig::from_env()?;
//! println!("サーバー: {}:{}", config.server.host, config.server.port);
//! ```

use std::{env, str::FromStr, time::Duration};

use axum::http::HeaderValue;
use keystone_shared::observability::LogFormat;
use strum::IntoStaticStr;
use thiserror::Error;

/// 実行モード
///
/// `Development` のときだけエラーレスポンスに内部情報（スタック、元のメッセージ）を含める。
#[derive(
   Debug, Clone, Copy, Default, PartialEq, Eq, IntoStaticStr, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
   Development,
   #[default]
   Production,
   Test,
}

impl Environment {
   pub fn is_development(self) -> bool {
      self == Self::Development
   }

   pub fn is_production(self) -> bool {
      self == Self::Production
   }
}

/// ログレベル
#[derive(
   Debug, Clone, Copy, Default, PartialEq, Eq, IntoStaticStr, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
   Fatal,
   Error,
   Warn,
   #[default]
   Info,
   Debug,
   Trace,
}

impl LogLevel {
   /// `EnvFilter` に渡すディレクティブ
   ///
   /// tracing には fatal が無いため error に丸める。
   pub fn as_directive(self) -> &'static str {
      match self {
         Self::Fatal | Self::Error => "error",
         Self::Warn => "warn",
         Self::Info => "info",
         Self::Debug => "debug",
         Self::Trace => "trace",
      }
   }
}

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
   #[error("環境変数 {var} の値 {value:?} が不正です: {reason}")]
   Invalid {
      var:    &'static str,
      value:  String,
      reason: &'static str,
   },
}

/// HTTP サーバー設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
   /// バインドアドレス（例: `0.0.0.0`, `127.0.0.1`）
   pub host: String,
   /// ポート番号
   pub port: u16,
}

/// アプリケーション全体の設定
///
/// 起動時に一度だけ構築し、各コンポーネントに渡す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
   pub environment:       Environment,
   pub server:            ServerConfig,
   /// 終了シグナル受信後、処理中リクエストの完了を待つ上限
   pub close_grace_delay: Duration,
   /// 許可する CORS オリジン（development では無視される）
   pub cors_origins:      Vec<String>,
   pub log_level:         LogLevel,
   pub log_format:        LogFormat,
}

impl AppConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|key| env::var(key).ok())
   }

   /// 任意の参照関数から設定を読み込む
   ///
   /// テストではプロセス環境を汚さずに値を与えるために使う。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

      let environment = match get("NODE_ENV") {
         Some(raw) => parse_enum("NODE_ENV", raw, "development, production, test のいずれか")?,
         None => Environment::default(),
      };

      let log_level = match get("LOG_LEVEL") {
         Some(raw) => parse_enum(
            "LOG_LEVEL",
            raw,
            "fatal, error, warn, info, debug, trace のいずれか",
         )?,
         None => LogLevel::default(),
      };

      Ok(Self {
         environment,
         server: ServerConfig {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: get("PORT").map_or(Ok(3000), parse_port)?,
         },
         close_grace_delay: get("FASTIFY_CLOSE_GRACE_DELAY")
            .map_or(Ok(Duration::from_millis(500)), parse_grace_delay)?,
         cors_origins: get("CORS_ORIGINS").map_or(Ok(Vec::new()), parse_cors_origins)?,
         log_level,
         log_format: get("LOG_FORMAT").map_or(LogFormat::default(), |raw| LogFormat::parse(&raw)),
      })
   }
}

// --- パース関数 ---

fn parse_enum<T: FromStr>(
   var: &'static str,
   raw: String,
   reason: &'static str,
) -> Result<T, ConfigError> {
   raw.trim().parse().map_err(|_| ConfigError::Invalid {
      var,
      value: raw,
      reason,
   })
}

fn parse_port(raw: String) -> Result<u16, ConfigError> {
   match raw.trim().parse::<u16>() {
      Ok(port) if port > 0 => Ok(port),
      _ => Err(ConfigError::Invalid {
         var:    "PORT",
         value:  raw,
         reason: "1〜65535 の整数である必要があります",
      }),
   }
}

fn parse_grace_delay(raw: String) -> Result<Duration, ConfigError> {
   raw.trim()
      .parse::<u64>()
      .map(Duration::from_millis)
      .map_err(|_| ConfigError::Invalid {
         var:    "FASTIFY_CLOSE_GRACE_DELAY",
         value:  raw,
         reason: "0 以上の整数（ミリ秒）である必要があります",
      })
}

fn parse_cors_origins(raw: String) -> Result<Vec<String>, ConfigError> {
   let origins: Vec<String> = raw
      .split(',')
      .map(str::trim)
      .filter(|origin| !origin.is_empty())
      .map(str::to_string)
      .collect();

   if origins
      .iter()
      .any(|origin| HeaderValue::from_str(origin).is_err())
   {
      return Err(ConfigError::Invalid {
         var:    "CORS_ORIGINS",
         value:  raw,
         reason: "ヘッダ値として使えない文字が含まれています",
      });
   }

   Ok(origins)
}
