//! 追踪器 - 抓取 → 对比 → 推送 → 持久化的运行流程
//!
//! 单次运行（check_once）跑完即止，没有常驻进程。watch 模式只是
//! 在固定间隔上反复调用单次检查，单线程顺序执行。
//! 抓取失败和布局缺失是预期内的可恢复情况：记录警告、不发送、
//! 不改动标记，等待外部调度器（或 watch 循环）下一次调用。

use anyhow::Result;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::TrackerConfig;
use crate::fetch::{BrowserFetcher, TimelineParser};
use crate::notification::formatter::format_test_message;
use crate::notification::{format_post_message, TelegramConfig, TelegramNotifier};
use crate::state::MarkerStore;
use crate::timeline::diff::diff_timeline;

/// 单次检查的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// 页面没有帖子或加载失败，标记未改动
    NoPosts,
    /// 首次运行，已记录最新帖子 ID，未发送通知
    FirstRun { marker: String },
    /// 没有新帖子，标记未改动
    UpToDate,
    /// 已推送 sent 条新帖并更新标记
    Notified { sent: usize, marker: String },
    /// 推送中断，标记未更新，下次运行会从旧标记重发
    SendFailed { sent: usize, total: usize },
}

/// 追踪器
pub struct Tracker {
    config: TrackerConfig,
    fetcher: BrowserFetcher,
    notifier: TelegramNotifier,
    store: MarkerStore,
    /// dry-run 模式：只打印将要发送的消息，不调用 Telegram，不更新标记
    dry_run: bool,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        let fetcher = BrowserFetcher::new(config.page_timeout_secs);
        let notifier = TelegramNotifier::new(TelegramConfig {
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
            ..Default::default()
        })?;
        let store = MarkerStore::new(&config.state_file);

        Ok(Self {
            config,
            fetcher,
            notifier,
            store,
            dry_run: false,
        })
    }

    /// 设置 dry-run 模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 执行一次完整检查
    ///
    /// 抓取失败与布局缺失返回 `Ok(CheckOutcome::NoPosts)`，推送失败
    /// 返回 `Ok(CheckOutcome::SendFailed)`，两者都不是调用方需要
    /// 处理的错误。只有标记文件读写失败才作为 `Err` 向上传播。
    pub async fn check_once(&self) -> Result<CheckOutcome> {
        let profile_url = self.config.profile_url();

        let html = match self.fetcher.fetch_profile_html(&profile_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %profile_url, error = %e, "Profile page fetch failed");
                return Ok(CheckOutcome::NoPosts);
            }
        };

        let posts = TimelineParser::parse(&html, self.config.max_posts);
        if posts.is_empty() {
            warn!(handle = %self.config.handle, "No posts extracted, skipping this run");
            return Ok(CheckOutcome::NoPosts);
        }

        let last_seen = self.store.load()?;
        let Some(result) = diff_timeline(&posts, last_seen.as_deref()) else {
            return Ok(CheckOutcome::NoPosts);
        };

        if last_seen.is_none() {
            // 首次运行：只记录状态，下次运行开始推送
            self.store.save(&result.next_marker)?;
            info!(marker = %result.next_marker, "First run, seeded marker without notifying");
            return Ok(CheckOutcome::FirstRun {
                marker: result.next_marker,
            });
        }

        if result.is_up_to_date() {
            info!(handle = %self.config.handle, "No new posts since last check");
            return Ok(CheckOutcome::UpToDate);
        }

        // 旧 → 新依次推送，保持时间线顺序
        let total = result.new_posts.len();
        for (index, post) in result.new_posts.iter().enumerate() {
            let message = format_post_message(&self.config.handle, post);

            if self.dry_run {
                eprintln!("[DRY-RUN] Would send:\n{message}\n");
                continue;
            }

            if let Err(e) = self.notifier.send_message(&message).await {
                warn!(post_id = %post.id, error = %e, "Telegram send failed, marker left untouched");
                return Ok(CheckOutcome::SendFailed {
                    sent: index,
                    total,
                });
            }
        }

        if self.dry_run {
            info!(count = total, "Dry-run complete, marker left untouched");
            return Ok(CheckOutcome::Notified {
                sent: total,
                marker: result.next_marker,
            });
        }

        self.store.save(&result.next_marker)?;
        info!(count = total, marker = %result.next_marker, "Relayed new posts");

        Ok(CheckOutcome::Notified {
            sent: total,
            marker: result.next_marker,
        })
    }

    /// watch 模式：按配置的间隔循环检查
    ///
    /// 单次检查失败只记录警告，循环继续下一轮。
    pub async fn run(&self) -> Result<()> {
        println!(
            "🔍 开始追踪 @{} (间隔: {}秒)...",
            self.config.handle, self.config.poll_seconds
        );
        println!("按 Ctrl+C 停止\n");

        loop {
            match self.check_once().await {
                Ok(outcome) => self.report_outcome(&outcome),
                Err(e) => warn!(error = %e, "Check failed"),
            }

            sleep(Duration::from_secs(self.config.poll_seconds)).await;
        }
    }

    /// 发送一条测试消息验证凭证
    pub async fn send_test(&self, message: Option<String>) -> Result<()> {
        let text = message.unwrap_or_else(|| format_test_message(&self.config.handle));

        if self.dry_run {
            eprintln!("[DRY-RUN] Would send:\n{text}");
            return Ok(());
        }

        self.notifier.send_message(&text).await
    }

    fn report_outcome(&self, outcome: &CheckOutcome) {
        match outcome {
            CheckOutcome::NoPosts => {}
            CheckOutcome::FirstRun { marker } => {
                println!("📌 首次运行，已记录最新帖子 ID: {marker}");
            }
            CheckOutcome::UpToDate => {}
            CheckOutcome::Notified { sent, .. } => {
                println!("📨 已推送 {sent} 条新帖子");
            }
            CheckOutcome::SendFailed { sent, total } => {
                println!("⚠️ 推送中断 ({sent}/{total})，下次轮询重试");
            }
        }
    }
}
