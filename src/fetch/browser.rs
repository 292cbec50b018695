//! 无头浏览器抓取 - 渲染目标主页并返回 HTML
//!
//! X 的主页完全由 JS 渲染，普通 HTTP 请求拿不到时间线，
//! 必须用无头 Chrome 打开页面后读取渲染结果。

use anyhow::Result;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::Instant;

/// 导航后等待初始渲染的时间
const INITIAL_RENDER_WAIT: Duration = Duration::from_secs(2);
/// 轮询时间线标记的间隔
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// 主页抓取器
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    /// 等待时间线标记出现的上限（秒）
    timeout_secs: u64,
}

impl BrowserFetcher {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    /// 打开主页并返回渲染后的 HTML
    ///
    /// 在超时窗口内轮询页面内容，出现帖子容器即返回；超时后返回
    /// 最后一次读到的内容，是否算布局缺失由解析器判定。
    pub async fn fetch_profile_html(&self, profile_url: &str) -> Result<String> {
        let config = BrowserConfig::builder()
            .arg("--no-sandbox") // Required for containerized environments
            .arg("--disable-dev-shm-usage") // Avoid /dev/shm size issues in containers
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;
        let (mut browser, mut handler) = Browser::launch(config).await?;

        // 浏览器事件处理任务
        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        tracing::debug!(url = %profile_url, "Navigating to profile page");
        let page = browser.new_page(profile_url).await?;

        tokio::time::sleep(INITIAL_RENDER_WAIT).await;

        let html = self.wait_for_timeline(&page).await?;
        tracing::debug!(len = html.len(), "Got page content");

        // 调试：把 HTML 落盘便于排查选择器
        if std::env::var("XWT_DUMP_HTML").is_ok() {
            let dump_path = std::env::var("XWT_DUMP_PATH")
                .unwrap_or_else(|_| "/tmp/xwt-profile.html".to_string());
            if let Err(e) = std::fs::write(&dump_path, &html) {
                tracing::warn!(path = %dump_path, error = %e, "Failed to dump HTML");
            } else {
                tracing::info!(path = %dump_path, "Dumped HTML for inspection");
            }
        }

        browser.close().await?;
        handle.await?;

        Ok(html)
    }

    /// 在超时窗口内等待时间线标记出现
    async fn wait_for_timeline(&self, page: &chromiumoxide::Page) -> Result<String> {
        let deadline = Instant::now() + Duration::from_secs(self.timeout_secs);

        loop {
            let html = page.content().await?;
            if html.contains("data-testid=\"tweet\"") || html.contains("<article") {
                return Ok(html);
            }
            if Instant::now() >= deadline {
                tracing::warn!(
                    timeout_secs = self.timeout_secs,
                    "Timed out waiting for timeline markup"
                );
                return Ok(html);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
