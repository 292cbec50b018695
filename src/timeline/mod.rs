//! 时间线模块 - 帖子快照与新帖对比

pub mod diff;

use serde::{Deserialize, Serialize};

/// 帖子快照（单次运行内只读）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// 平台分配的帖子 ID（同一时间线内按时间递增）
    pub id: String,
    /// 帖子的绝对 URL
    pub url: String,
    /// 显示文本
    pub text: String,
}

impl Post {
    pub fn new(id: impl Into<String>, url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            text: text.into(),
        }
    }
}
