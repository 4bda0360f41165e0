//! # ヘルスチェックツール
//!
//! コンテナの HEALTHCHECK 用。`PORT` で待ち受けている自サーバーの `GET /` を叩き、
//! 200 なら終了コード 0、それ以外は 1 で終了する。
//!
//! ## 使い方
//!
//! ```dockerfile
//! HEALTHCHECK CMD ["/app/healthcheck"]
//! ```

use std::process::ExitCode;

use keystone_api::{
   config::AppConfig,
   healthcheck::{PROBE_TIMEOUT, local_url, probe},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
   let port = match AppConfig::from_env() {
      Ok(config) => config.server.port,
      Err(err) => {
         eprintln!("healthcheck: {err}");
         return ExitCode::FAILURE;
      }
   };

   match probe(&local_url(port), PROBE_TIMEOUT).await {
      Ok(()) => ExitCode::SUCCESS,
      Err(err) => {
         eprintln!("healthcheck: {err:#}");
         ExitCode::FAILURE
      }
   }
}
