//! 新帖对比 - 纯函数，不做任何 I/O
//!
//! 输入为页面抽取的帖子列表（最新在前）和持久化的最后已读 ID，
//! 输出需要推送的帖子（最旧在前）和新的标记值。
//! 浏览器抓取、消息发送、文件读写都在外层完成，这里只负责对比逻辑。

use super::Post;

/// 对比结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    /// 需要推送的新帖子，按时间从旧到新排列
    pub new_posts: Vec<Post>,
    /// 运行结束后应持久化的标记（最新帖子的 ID）
    pub next_marker: String,
}

impl DiffResult {
    /// 是否没有需要推送的帖子
    pub fn is_up_to_date(&self) -> bool {
        self.new_posts.is_empty()
    }
}

/// 对比抽取结果与最后已读标记
///
/// 返回 `None` 表示抽取列表为空（页面未加载或布局变化），调用方
/// 不应改动标记。`last_seen` 为 `None` 表示首次运行：不推送任何
/// 帖子，只把最新 ID 作为新标记。
///
/// 标记规则：
/// - 在最新在前的排序中，出现在标记之前的帖子视为新帖
/// - 标记已是最新 ID 时没有新帖，标记不变
/// - 标记在列表中不存在（原帖被删除等），整个列表视为新帖
pub fn diff_timeline(extracted: &[Post], last_seen: Option<&str>) -> Option<DiffResult> {
    let newest = extracted.first()?;

    let Some(marker) = last_seen else {
        // 首次运行：记录最新 ID，下次运行开始推送
        return Some(DiffResult {
            new_posts: Vec::new(),
            next_marker: newest.id.clone(),
        });
    };

    // 最新在前，遇到标记即停止
    let mut new_posts: Vec<Post> = extracted
        .iter()
        .take_while(|post| post.id != marker)
        .cloned()
        .collect();

    // 推送顺序为旧 → 新，保持时间线连贯
    new_posts.reverse();

    Some(DiffResult {
        new_posts,
        next_marker: newest.id.clone(),
    })
}
