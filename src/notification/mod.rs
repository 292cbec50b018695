//! 通知模块 - 消息格式化与 Telegram 推送

pub mod formatter;
pub mod telegram;

pub use formatter::format_post_message;
pub use telegram::{TelegramConfig, TelegramNotifier};
