//! 五子棋引擎命令行
//!
//! 读入一个局面，调用一次 `get_move` 或 `solve`，打印结果。
//!
//! ```text
//! gomoku --solve XXXX. OOO.. O.... ..... .....
//! gomoku --config engine.json --to-play w .X... ..... ..... ..... .....
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use gomoku_ai::{Engine, EngineConfig, SolveOutcome, Strategy};
use gomoku_board::{format_point, Board, Point, Stone};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 引擎配置文件（JSON），缺省使用内置默认值
    #[arg(long)]
    config: Option<PathBuf>,

    /// 覆盖配置中的策略: alpha_beta / boolean / monte_carlo
    #[arg(long, value_parser = parse_strategy)]
    strategy: Option<Strategy>,

    /// 覆盖配置中的时限（毫秒）
    #[arg(long)]
    time_ms: Option<u64>,

    /// 固定随机种子
    #[arg(long)]
    seed: Option<u64>,

    /// 走子方（b / w），缺省按双方子数推断
    #[arg(long, value_parser = parse_stone)]
    to_play: Option<Stone>,

    /// 求解局面而不是选点
    #[arg(long)]
    solve: bool,

    /// 以 JSON 输出结果
    #[arg(long)]
    json: bool,

    /// 棋盘各行，由 X、O、. 组成
    #[arg(required = true)]
    rows: Vec<String>,
}

/// JSON 输出
#[derive(Debug, Serialize)]
struct Report {
    to_play: char,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<String>,
    #[serde(rename = "move")]
    mv: Option<String>,
    nodes: u64,
    elapsed_ms: u128,
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("gomoku_ai=info".parse()?))
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;
    let board = build_board(&args.rows, args.to_play)?;
    debug!("Position:\n{}", board);

    info!("Running {:?} on {}x{} board", config.strategy, board.size(), board.size());
    let mut engine = Engine::new(config);
    let started = Instant::now();

    let (outcome, mv) = if args.solve {
        let (outcome, mv) = engine.solve(&board);
        (Some(outcome), mv)
    } else {
        (None, engine.get_move(&board))
    };

    let report = Report {
        to_play: board.current_player().to_char(),
        outcome: outcome.map(|outcome| outcome.to_string()),
        mv: mv.map(|point| format_point(point, board.size())),
        nodes: engine.nodes_searched(),
        elapsed_ms: started.elapsed().as_millis(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render(outcome, mv, board.size()));
    }

    Ok(())
}

/// 读取配置文件并应用命令行覆盖项
fn build_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };

    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(time_ms) = args.time_ms {
        config.time_limit_ms = time_ms;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    Ok(config)
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("读取配置文件失败: {}", path.display()))?;
    EngineConfig::from_json(&text).with_context(|| format!("配置文件格式错误: {}", path.display()))
}

/// 解析棋盘，未指定走子方时子数相等轮黑方，否则轮白方
fn build_board(rows: &[String], to_play: Option<Stone>) -> Result<Board> {
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let mut board = Board::from_rows(&rows, Stone::Black)?;

    let to_play = match to_play {
        Some(stone) => stone,
        None => {
            let black = (0..board.len()).filter(|&p| board.get(p) == Some(Stone::Black)).count();
            let white = board.stone_count() - black;
            match black.checked_sub(white) {
                Some(0) => Stone::Black,
                Some(1) => Stone::White,
                _ => bail!("无法从子数推断走子方（黑 {} / 白 {}），请用 --to-play 指定", black, white),
            }
        }
    };
    board.set_current_player(to_play);

    Ok(board)
}

/// 文本输出：求解时为 `结果 [走法]`，选点时为走法或 `pass`
fn render(outcome: Option<SolveOutcome>, mv: Option<Point>, size: usize) -> String {
    let mv = mv.map(|point| format_point(point, size));
    match (outcome, mv) {
        (Some(outcome), Some(mv)) => format!("{} {}", outcome, mv),
        (Some(outcome), None) => outcome.to_string(),
        (None, Some(mv)) => mv,
        (None, None) => "pass".to_string(),
    }
}

fn parse_strategy(text: &str) -> Result<Strategy, String> {
    serde_json::from_value(serde_json::Value::String(text.to_string()))
        .map_err(|_| format!("未知策略: {} (可选 alpha_beta / boolean / monte_carlo)", text))
}

fn parse_stone(text: &str) -> Result<Stone, String> {
    let mut chars = text.chars();
    match (chars.next().and_then(Stone::from_char), chars.next()) {
        (Some(stone), None) => Ok(stone),
        _ => Err(format!("无效的走子方: {}", text)),
    }
}
