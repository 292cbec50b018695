//! X Web Tracker CLI
//!
//! 追踪 X (Twitter) 用户主页，把新帖子推送到 Telegram

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
use x_web_tracker::{CheckOutcome, MarkerStore, Tracker, TrackerConfig};

#[derive(Parser)]
#[command(name = "xwt")]
#[command(about = "X Web Tracker - 追踪 X 用户主页并推送新帖子到 Telegram")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 执行一次检查：抓取 → 对比 → 推送 → 持久化
    Check {
        /// 只打印将要发送的消息，不调用 Telegram，不更新标记
        #[arg(long)]
        dry_run: bool,
    },
    /// 按固定间隔循环检查
    Watch {
        /// 轮询间隔（秒），缺省使用 POLL_SECONDS
        #[arg(long, short)]
        interval: Option<u64>,
    },
    /// 查看当前标记状态
    State {
        /// 输出 JSON 格式
        #[arg(long)]
        json: bool,
    },
    /// 删除标记文件，恢复首次运行状态
    StateReset,
    /// 发送一条测试消息验证 Telegram 凭证
    SendTest {
        /// 自定义消息内容
        message: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // 初始化 tracing 日志系统
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    // 例如: RUST_LOG=debug xwt check
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("x_web_tracker=info,xwt=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    // 已记录的失败路径一律警告后以 0 退出，由外部调度器下次重试
    if let Err(e) = run(cli).await {
        warn!(error = %e, "Run aborted");
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Check { dry_run } => {
            let config = TrackerConfig::from_env()?;
            let tracker = Tracker::new(config)?.with_dry_run(dry_run);
            let outcome = tracker.check_once().await?;
            print_outcome(&outcome);
        }
        Commands::Watch { interval } => {
            let mut config = TrackerConfig::from_env()?;
            if let Some(secs) = interval {
                if secs == 0 {
                    anyhow::bail!("--interval 必须大于 0");
                }
                config.poll_seconds = secs;
            }
            Tracker::new(config)?.run().await?;
        }
        Commands::State { json } => {
            show_state(&state_store(), json)?;
        }
        Commands::StateReset => {
            let store = state_store();
            if store.reset()? {
                println!("🗑️ 已删除标记文件: {}", store.path().display());
            } else {
                println!("标记文件不存在: {}", store.path().display());
            }
        }
        Commands::SendTest { message } => {
            let config = TrackerConfig::from_env()?;
            let tracker = Tracker::new(config)?;
            tracker.send_test(message).await?;
            println!("✅ 测试消息已发送");
        }
    }

    Ok(())
}

/// 标记存储的位置只依赖 STATE_FILE，查看状态不需要 Telegram 凭证
fn state_store() -> MarkerStore {
    dotenvy::dotenv().ok();
    let path = std::env::var("STATE_FILE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(MarkerStore::default_path);
    MarkerStore::new(path)
}

fn show_state(store: &MarkerStore, json: bool) -> anyhow::Result<()> {
    let marker = store.load()?;
    let modified_at = store.modified_at();

    if json {
        let value = serde_json::json!({
            "path": store.path(),
            "marker": marker,
            "modified_at": modified_at,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("标记文件: {}", store.path().display());
    match marker {
        Some(id) => {
            println!("最后已读帖子 ID: {id}");
            if let Some(ts) = modified_at {
                println!("更新时间: {}", ts.format("%Y-%m-%d %H:%M:%S UTC"));
            }
        }
        None => println!("（无标记，下次运行视为首次运行）"),
    }

    Ok(())
}

fn print_outcome(outcome: &CheckOutcome) {
    match outcome {
        CheckOutcome::NoPosts => {
            println!("⚠️ 页面没有帖子或加载失败，本次跳过");
        }
        CheckOutcome::FirstRun { marker } => {
            println!("📌 首次运行，已记录最新帖子 ID: {marker}（下次运行开始推送）");
        }
        CheckOutcome::UpToDate => {
            println!("✅ 没有新帖子");
        }
        CheckOutcome::Notified { sent, marker } => {
            println!("📨 已推送 {sent} 条新帖子，标记更新为 {marker}");
        }
        CheckOutcome::SendFailed { sent, total } => {
            println!("⚠️ 推送中断 ({sent}/{total})，标记未更新");
        }
    }
}
