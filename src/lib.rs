//! X Web Tracker - 追踪 X (Twitter) 用户主页并推送新帖子到 Telegram

pub mod config;
pub mod fetch;
pub mod notification;
pub mod state;
pub mod timeline;
pub mod tracker;

pub use config::TrackerConfig;
pub use fetch::{BrowserFetcher, TimelineParser};
pub use notification::{format_post_message, TelegramConfig, TelegramNotifier};
pub use state::MarkerStore;
pub use timeline::diff::{diff_timeline, DiffResult};
pub use timeline::Post;
pub use tracker::{CheckOutcome, Tracker};
