//! # ヘルスチェックプローブ
//!
//! コンテナの HEALTHCHECK から起動される `healthcheck` バイナリの本体。
//! 自プロセスの `GET /` を叩き、200 が返った場合だけ成功とする。

use std::time::Duration;

use anyhow::{Context as _, bail};

/// プローブのタイムアウト
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// 指定 URL に GET を送り、200 以外なら失敗とする
pub async fn probe(url: &str, timeout: Duration) -> anyhow::Result<()> {
   let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .context("HTTP クライアントの構築に失敗しました")?;

   let response = client
      .get(url)
      .send()
      .await
      .with_context(|| format!("{url} に接続できません"))?;

   let status = response.status();
   if status != reqwest::StatusCode::OK {
      bail!("{url} が {status} を返しました");
   }

   Ok(())
}

/// ローカルホストの指定ポートに対するプローブ URL
pub fn local_url(port: u16) -> String {
   format!("http://127.0.0.1:{port}/")
}
