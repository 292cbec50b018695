//! 消息格式化 - 把帖子快照转换为发送给 Telegram 的文本
//!
//! 格式保持简洁：一行标题 + 帖子链接 + 正文。正文超长时按字符
//! 截断，避免超过 Bot API 的消息长度上限。

use crate::timeline::Post;

/// 正文截断上限（字符数）
const MAX_TEXT_CHARS: usize = 500;

/// 格式化单条新帖通知
pub fn format_post_message(handle: &str, post: &Post) -> String {
    let mut message = format!("🆕 @{handle} 发布了新帖子\n{}", post.url);

    let text = truncate_text(&post.text, MAX_TEXT_CHARS);
    if !text.is_empty() {
        message.push_str("\n\n");
        message.push_str(&text);
    }

    message
}

/// 格式化凭证验证用的测试消息
pub fn format_test_message(handle: &str) -> String {
    format!("✅ x-web-tracker 测试消息（追踪 @{handle}）")
}

/// 按字符截断文本，超长时追加省略号
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{truncated}...")
}
