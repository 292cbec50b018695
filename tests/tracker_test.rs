//! 对比逻辑与标记存储的组合流程测试
//!
//! 不依赖浏览器和网络：抓取结果用内存中的帖子列表模拟，
//! 验证「首次运行 → 出新帖 → 无新帖」的完整状态演进。

use tempfile::TempDir;
use x_web_tracker::{diff_timeline, MarkerStore, Post};

fn post(id: &str) -> Post {
    Post::new(
        id,
        format!("https://x.com/someone/status/{id}"),
        format!("post {id}"),
    )
}

#[test]
fn test_consecutive_runs_advance_marker() {
    let dir = TempDir::new().unwrap();
    let store = MarkerStore::new(dir.path().join("last_id.txt"));

    // 1. 首次运行：页面上有 3 条帖子，不推送，只记录最新 ID
    let extracted = vec![post("103"), post("102"), post("101")];
    let result = diff_timeline(&extracted, store.load().unwrap().as_deref()).unwrap();
    assert!(result.new_posts.is_empty());
    store.save(&result.next_marker).unwrap();
    assert_eq!(store.load().unwrap(), Some("103".to_string()));

    // 2. 第二次运行：出现 2 条新帖，推送顺序为旧 → 新
    let extracted = vec![post("105"), post("104"), post("103"), post("102")];
    let result = diff_timeline(&extracted, store.load().unwrap().as_deref()).unwrap();
    let ids: Vec<&str> = result.new_posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["104", "105"]);
    store.save(&result.next_marker).unwrap();
    assert_eq!(store.load().unwrap(), Some("105".to_string()));

    // 3. 第三次运行：没有新帖，标记不变
    let result = diff_timeline(&extracted, store.load().unwrap().as_deref()).unwrap();
    assert!(result.is_up_to_date());
    assert_eq!(result.next_marker, "105");
}

#[test]
fn test_no_new_posts_runs_are_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = MarkerStore::new(dir.path().join("last_id.txt"));

    let extracted = vec![post("5"), post("4"), post("3")];

    // 推进到最新状态
    store.save("5").unwrap();
    let contents_before = std::fs::read(store.path()).unwrap();

    // 连续两次运行之间没有新帖：对比结果为空，标记文件不改写
    for _ in 0..2 {
        let result = diff_timeline(&extracted, store.load().unwrap().as_deref()).unwrap();
        assert!(result.is_up_to_date());
    }

    let contents_after = std::fs::read(store.path()).unwrap();
    assert_eq!(contents_before, contents_after);
}

#[test]
fn test_failed_extraction_leaves_marker_untouched() {
    let dir = TempDir::new().unwrap();
    let store = MarkerStore::new(dir.path().join("last_id.txt"));
    store.save("42").unwrap();

    // 页面加载失败或布局变化：抽取结果为空，对比直接返回 None
    let result = diff_timeline(&[], store.load().unwrap().as_deref());
    assert!(result.is_none());

    // 标记保持原值，等待下一次调度
    assert_eq!(store.load().unwrap(), Some("42".to_string()));
}

#[test]
fn test_deleted_marker_post_relays_whole_page() {
    let dir = TempDir::new().unwrap();
    let store = MarkerStore::new(dir.path().join("last_id.txt"));

    // 标记指向的帖子已从页面上消失
    store.save("90").unwrap();

    let extracted = vec![post("103"), post("102"), post("101")];
    let result = diff_timeline(&extracted, store.load().unwrap().as_deref()).unwrap();

    let ids: Vec<&str> = result.new_posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["101", "102", "103"]);

    store.save(&result.next_marker).unwrap();
    assert_eq!(store.load().unwrap(), Some("103".to_string()));
}
