//! Telegram 推送 - 通过 Bot API sendMessage 发送通知

use anyhow::{bail, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Telegram 客户端配置
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot Token
    pub bot_token: String,
    /// 目标 Chat ID
    pub chat_id: String,
    /// API 地址（测试时可替换）
    pub api_base: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_base: "https://api.telegram.org".to_string(),
            timeout_secs: 10,
        }
    }
}

/// sendMessage 请求载荷
#[derive(Debug, Serialize)]
struct SendMessagePayload<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Bot API 响应
#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram 推送客户端
#[derive(Debug)]
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    /// 创建推送客户端
    pub fn new(config: TelegramConfig) -> Result<Self> {
        if config.bot_token.is_empty() {
            bail!("bot_token is required");
        }
        if config.chat_id.is_empty() {
            bail!("chat_id is required");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {e}"))?;

        Ok(Self { client, config })
    }

    /// 发送一条文本消息到配置的 Chat
    pub async fn send_message(&self, text: &str) -> Result<()> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.api_base, self.config.bot_token
        );

        let payload = SendMessagePayload {
            chat_id: &self.config.chat_id,
            text,
        };

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Telegram request failed: {e}"))?;

        let status = response.status();
        let body: SendMessageResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse Telegram response (status {status}): {e}"))?;

        if !body.ok {
            bail!(
                "Telegram send failed (status {status}): {}",
                body.description.unwrap_or_else(|| "Unknown error".to_string())
            );
        }

        Ok(())
    }
}
