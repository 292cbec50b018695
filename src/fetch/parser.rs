//! 时间线 HTML 解析 - 从渲染后的主页抽取帖子列表
//!
//! X 的页面结构以 `data-testid="tweet"` 标记帖子容器。布局变化时
//! 退回到 `article` 容器。解析失败不是错误：返回空列表，由调用方
//! 记录警告并跳过本次运行。

use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::timeline::Post;

const BASE_URL: &str = "https://x.com";

/// 帖子链接中的 status ID
fn status_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/status/(\d+)").expect("Invalid status id regex"))
}

/// 主页时间线解析器
pub struct TimelineParser;

impl TimelineParser {
    /// 从页面 HTML 抽取帖子，保持页面顺序（最新在前）
    ///
    /// 按 ID 去重（转发卡片等会重复出现同一链接），最多返回
    /// `max_posts` 条。找不到任何帖子容器时返回空列表。
    pub fn parse(html: &str, max_posts: usize) -> Vec<Post> {
        let document = Html::parse_document(html);
        let mut posts = Vec::new();

        // 优先使用稳定的 testid 选择器，布局变化时退回 article
        let tweet_selector =
            Selector::parse("[data-testid='tweet']").expect("Invalid tweet selector");
        let article_selector = Selector::parse("article").expect("Invalid article selector");
        let link_selector = Selector::parse("a[href*='/status/']").expect("Invalid link selector");
        let text_selector =
            Selector::parse("[data-testid='tweetText']").expect("Invalid text selector");
        let lang_text_selector = Selector::parse("div[lang]").expect("Invalid lang text selector");

        let mut containers: Vec<_> = document.select(&tweet_selector).collect();
        if containers.is_empty() {
            containers = document.select(&article_selector).collect();
        }

        if containers.is_empty() {
            tracing::warn!(
                "No post containers found in HTML (selectors: data-testid=tweet, article). \
                 The page may not have rendered or the markup may have changed."
            );
            return posts;
        }
        tracing::debug!(container_count = containers.len(), "Found post containers");

        let mut seen_ids = HashSet::new();

        for container in containers {
            // 帖子链接里带着 ID
            let Some(href) = container
                .select(&link_selector)
                .filter_map(|el| el.value().attr("href"))
                .find(|href| status_id_regex().is_match(href))
            else {
                tracing::debug!("Post container missing status link, skipping");
                continue;
            };

            let Some(id) = Self::extract_post_id(href) else {
                continue;
            };
            if !seen_ids.insert(id.clone()) {
                continue;
            }

            let url = if href.starts_with("http") {
                href.to_string()
            } else {
                format!("{BASE_URL}{href}")
            };

            // 文本优先取 tweetText，退回 div[lang]；图片帖可能没有文本
            let text = container
                .select(&text_selector)
                .next()
                .map(|el| el.text().collect::<String>())
                .or_else(|| {
                    container
                        .select(&lang_text_selector)
                        .next()
                        .map(|el| el.text().collect::<String>())
                })
                .unwrap_or_default()
                .trim()
                .to_string();

            posts.push(Post::new(id, url, text));
            if posts.len() >= max_posts {
                break;
            }
        }

        tracing::debug!(count = posts.len(), "Parsed posts from HTML");
        posts
    }

    /// 从链接中抽取帖子 ID
    ///
    /// 链接形如 `/username/status/1234567890` 或带查询串的完整 URL。
    pub fn extract_post_id(href: &str) -> Option<String> {
        status_id_regex()
            .captures(href)
            .map(|caps| caps[1].to_string())
    }
}
