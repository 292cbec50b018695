//! 配置模块 - 从环境变量（含 .env 文件）加载运行配置
//!
//! 必填项缺失时返回错误并列出所有缺失的变量名，由调用方警告后
//! 干净退出，不发送任何通知。配置一经加载在整个运行期间不可变。

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::state::MarkerStore;

/// 轮询间隔默认值（秒）
const DEFAULT_POLL_SECONDS: u64 = 120;
/// 单次抓取的最大帖子数
const DEFAULT_MAX_POSTS: usize = 10;
/// 等待时间线渲染的超时（秒）
const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 30;

/// 运行配置
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// 目标账号 handle（不含 @ 前缀）
    pub handle: String,
    /// Telegram Bot Token
    pub bot_token: String,
    /// Telegram Chat ID
    pub chat_id: String,
    /// watch 模式的轮询间隔（秒）
    pub poll_seconds: u64,
    /// 标记文件路径
    pub state_file: PathBuf,
    /// 单次抓取的最大帖子数
    pub max_posts: usize,
    /// 等待时间线渲染的超时（秒）
    pub page_timeout_secs: u64,
}

impl TrackerConfig {
    /// 从进程环境加载配置，优先读取当前目录下的 .env 文件
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意查找函数加载配置（测试时传入内存表）
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = ["X_USERNAME", "TELEGRAM_BOT_TOKEN", "TELEGRAM_CHAT_ID"];
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|name| lookup(name).map_or(true, |v| v.trim().is_empty()))
            .collect();

        if !missing.is_empty() {
            bail!("缺少必需的环境变量: {}", missing.join(", "));
        }

        let handle = normalize_handle(&lookup("X_USERNAME").unwrap_or_default());
        if handle.is_empty() {
            bail!("X_USERNAME 不是有效的账号 handle");
        }

        let poll_seconds = parse_or_default(lookup("POLL_SECONDS"), DEFAULT_POLL_SECONDS)?;
        if poll_seconds == 0 {
            bail!("POLL_SECONDS 必须大于 0");
        }

        let max_posts = parse_or_default(lookup("MAX_POSTS"), DEFAULT_MAX_POSTS)?;
        if max_posts == 0 {
            bail!("MAX_POSTS 必须大于 0");
        }

        let page_timeout_secs =
            parse_or_default(lookup("PAGE_TIMEOUT_SECS"), DEFAULT_PAGE_TIMEOUT_SECS)?;

        let state_file = lookup("STATE_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(MarkerStore::default_path);

        Ok(Self {
            handle,
            bot_token: lookup("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            chat_id: lookup("TELEGRAM_CHAT_ID").unwrap_or_default(),
            poll_seconds,
            state_file,
            max_posts,
            page_timeout_secs,
        })
    }

    /// 目标账号的公开主页 URL
    pub fn profile_url(&self) -> String {
        format!("https://x.com/{}", self.handle)
    }
}

/// 去掉 handle 前后的空白与 @ 前缀
fn normalize_handle(raw: &str) -> String {
    raw.trim().trim_start_matches('@').to_string()
}

fn parse_or_default<T: std::str::FromStr>(value: Option<String>, default: T) -> Result<T> {
    match value {
        Some(raw) if !raw.trim().is_empty() => match raw.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => bail!("无法解析数值配置: {}", raw),
        },
        _ => Ok(default),
    }
}
