//! # Keystone API サーバー
//!
//! ## 起動の流れ
//!
//! 1. `.env` と環境変数から [`AppConfig`] を読み込む（不正な値なら起動しない）
//! 2. トレーシングを初期化する
//! 3. シード済みのインメモリストアでルーターを組み立てる
//! 4. `HOST:PORT` で待ち受ける（失敗したら終了コード 1）
//!
//! ## 終了処理
//!
//! SIGINT / SIGTERM を受けると新規接続の受け付けをやめ、処理中のリクエストの
//! 完了を待つ。`FASTIFY_CLOSE_GRACE_DELAY` ミリ秒以内に終わらなければ
//! 終了コード 1 で強制終了する。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! NODE_ENV=development cargo run -p keystone-api
//!
//! # 本番環境
//! PORT=8080 LOG_FORMAT=json cargo run -p keystone-api --release
//! ```

use std::{sync::Arc, time::Duration};

use anyhow::Context as _;
use keystone_api::{app_builder::build_app, config::AppConfig};
use keystone_domain::clock::{Clock, SystemClock};
use keystone_infra::repository::InMemoryUserRepository;
use keystone_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;
use tracing::Instrument as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   let config = AppConfig::from_env().context("設定の読み込みに失敗しました")?;

   let tracing_config = TracingConfig::new(
      "keystone-api",
      config.log_format,
      config.log_level.as_directive(),
   );
   let service_name = tracing_config.service_name.clone();
   init_tracing(tracing_config);

   run(config)
      .instrument(tracing::info_span!("app", service = %service_name))
      .await
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
   let clock: Arc<dyn Clock> = Arc::new(SystemClock);
   let repository = Arc::new(InMemoryUserRepository::seeded(clock.now()));
   let app = build_app(&config, repository, clock);

   let listener = match TcpListener::bind((config.server.host.as_str(), config.server.port)).await
   {
      Ok(listener) => listener,
      Err(err) => {
         tracing::error!(
            error = %err,
            host = %config.server.host,
            port = config.server.port,
            "待ち受けを開始できませんでした"
         );
         return Err(err).context("待ち受けを開始できませんでした");
      }
   };

   tracing::info!(
      address = %listener.local_addr()?,
      environment = %config.environment,
      "API サーバーが起動しました"
   );

   axum::serve(listener, app)
      .with_graceful_shutdown(shutdown_signal(config.close_grace_delay))
      .await?;

   tracing::info!("API サーバーを停止しました");
   Ok(())
}

/// 最初の終了シグナルで完了する
///
/// 完了時に猶予タイマーを起動し、時間内にドレインが終わらなければ
/// プロセスを終了コード 1 で落とす。
async fn shutdown_signal(grace_delay: Duration) {
   let ctrl_c = async {
      if let Err(err) = tokio::signal::ctrl_c().await {
         tracing::error!(error = %err, "Ctrl-C ハンドラを登録できませんでした");
         std::future::pending::<()>().await;
      }
   };

   #[cfg(unix)]
   let terminate = async {
      match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
         Ok(mut signal) => {
            signal.recv().await;
         }
         Err(err) => {
            tracing::error!(error = %err, "SIGTERM ハンドラを登録できませんでした");
            std::future::pending::<()>().await;
         }
      }
   };

   #[cfg(not(unix))]
   let terminate = std::future::pending::<()>();

   tokio::select! {
      () = ctrl_c => {}
      () = terminate => {}
   }

   tracing::info!(
      grace_delay_ms = grace_delay.as_millis(),
      "終了シグナルを受信しました。処理中のリクエストを待機します"
   );

   tokio::spawn(async move {
      tokio::time::sleep(grace_delay).await;
      tracing::error!("猶予時間内に終了できなかったため強制終了します");
      std::process::exit(1);
   });
}
