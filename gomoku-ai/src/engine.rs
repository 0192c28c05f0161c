//! 引擎入口
//!
//! 对外提供 `get_move` 和 `solve`，按配置分派到 Alpha-Beta、布尔求解器
//! 或蒙特卡洛搜索。每次搜索都在调用方棋盘的私有副本上进行；
//! 超时只在这里处理一次，退回到廉价的启发式走法。

use std::cmp::Ordering;
use std::time::Duration;

use gomoku_board::{Board, Point, Stone, DEFAULT_BOARD_SIZE};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::deadline::{Deadline, DEFAULT_CHECK_INTERVAL};
use crate::error::SearchError;
use crate::evaluate::Evaluator;
use crate::mcts::{MctsTree, MonteCarlo, PlayoutPolicy, DEFAULT_SIMULATIONS};
use crate::search::AlphaBeta;
use crate::solver::{BooleanSolver, Outcome};
use crate::tactics;
use crate::transposition::{TTEntry, TranspositionTable};
use crate::zobrist::ZobristTable;

/// 搜索策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// 穷举 Alpha-Beta（数值评估）
    AlphaBeta,
    /// 穷举布尔求解
    Boolean,
    /// 蒙特卡洛模拟
    MonteCarlo,
}

/// 引擎配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub strategy: Strategy,
    /// 每次调用的时限（毫秒）
    pub time_limit_ms: u64,
    /// 蒙特卡洛模拟次数
    pub num_simulations: usize,
    /// 蒙特卡洛走子策略
    pub playout: PlayoutPolicy,
    /// 每隔多少节点读一次时钟
    pub check_interval: u64,
    /// 固定随机种子（None 时每个引擎实例随机取种）
    pub seed: Option<u64>,
}

impl EngineConfig {
    pub fn alpha_beta() -> Self {
        Self {
            strategy: Strategy::AlphaBeta,
            ..Default::default()
        }
    }

    pub fn boolean() -> Self {
        Self {
            strategy: Strategy::Boolean,
            ..Default::default()
        }
    }

    pub fn monte_carlo() -> Self {
        Self {
            strategy: Strategy::MonteCarlo,
            ..Default::default()
        }
    }

    /// 从 JSON 解析，缺省字段取默认值
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::MonteCarlo,
            time_limit_ms: 10_000,
            num_simulations: DEFAULT_SIMULATIONS,
            playout: PlayoutPolicy::RuleBased,
            check_interval: DEFAULT_CHECK_INTERVAL,
            seed: None,
        }
    }
}

/// 求解结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    /// 完美对弈下的胜方
    Winner(Stone),
    /// 和棋
    Draw,
    /// 时限内未能证明
    Unknown,
}

impl std::fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveOutcome::Winner(Stone::Black) => write!(f, "b"),
            SolveOutcome::Winner(Stone::White) => write!(f, "w"),
            SolveOutcome::Draw => write!(f, "draw"),
            SolveOutcome::Unknown => write!(f, "unknown"),
        }
    }
}

/// 五子棋引擎
///
/// 哈希键、随机数发生器和各策略的表都归引擎实例所有，
/// 表在同一局的多次调用间保留，`new_game` 时清空。
pub struct Engine {
    config: EngineConfig,
    rng: ChaCha8Rng,
    zobrist: ZobristTable,
    score_table: TranspositionTable<TTEntry>,
    outcome_table: TranspositionTable<Outcome>,
    tree: MctsTree,
    nodes_searched: u64,
}

impl Engine {
    /// 创建新引擎
    pub fn new(config: EngineConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let zobrist = ZobristTable::new(DEFAULT_BOARD_SIZE, &mut rng);
        debug!("Engine created: strategy={:?}, seed={:#x}", config.strategy, seed);

        Self {
            config,
            rng,
            zobrist,
            score_table: TranspositionTable::new(),
            outcome_table: TranspositionTable::new(),
            tree: MctsTree::new(),
            nodes_searched: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 获取上次搜索的节点数（蒙特卡洛为模拟次数）
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// 清空所有表
    pub fn new_game(&mut self) {
        self.score_table.clear();
        self.outcome_table.clear();
        self.tree.clear();
    }

    /// 按配置的时限为当前走子方选择走法，终局返回 None
    pub fn get_move(&mut self, board: &Board) -> Option<Point> {
        self.get_move_for(board, board.current_player(), self.config.time_limit())
    }

    /// 为指定一方在指定时限内选择走法，终局返回 None
    pub fn get_move_for(&mut self, board: &Board, to_play: Stone, time_limit: Duration) -> Option<Point> {
        let mut position = board.clone();
        position.set_current_player(to_play);
        self.prepare(&position);

        if terminal_outcome(&position).is_some() {
            return None;
        }

        let mut deadline = Deadline::new(Some(time_limit), self.config.check_interval);
        match self.config.strategy {
            Strategy::MonteCarlo => self.monte_carlo(&position, &mut deadline),
            Strategy::AlphaBeta | Strategy::Boolean => {
                let (_, mv) = self.prove(&position, &mut deadline);
                mv.or_else(|| fallback_move(&position))
            }
        }
    }

    /// 按配置的时限求解
    pub fn solve(&mut self, board: &Board) -> (SolveOutcome, Option<Point>) {
        self.solve_within(board, self.config.time_limit())
    }

    /// 在指定时限内求解，超时返回 `SolveOutcome::Unknown`
    ///
    /// `AlphaBeta` 策略用 Alpha-Beta 证明，其余策略用布尔求解器。
    pub fn solve_within(&mut self, board: &Board, time_limit: Duration) -> (SolveOutcome, Option<Point>) {
        self.prepare(board);

        if let Some(outcome) = terminal_outcome(board) {
            return (outcome, None);
        }

        let mut deadline = Deadline::new(Some(time_limit), self.config.check_interval);
        self.prove(board, &mut deadline)
    }

    /// 棋盘尺寸变化时重新生成哈希键并清表
    fn prepare(&mut self, board: &Board) {
        if self.zobrist.len() != board.len() {
            debug!("Re-keying Zobrist table for {}x{} board", board.size(), board.size());
            self.zobrist = ZobristTable::new(board.size(), &mut self.rng);
            self.new_game();
        }
    }

    /// 穷举证明（在私有副本上进行）
    fn prove(&mut self, board: &Board, deadline: &mut Deadline) -> (SolveOutcome, Option<Point>) {
        let mut working = board.clone();
        let to_play = board.current_player();

        let result = match self.config.strategy {
            Strategy::AlphaBeta => {
                let mut search = AlphaBeta::new(&self.zobrist, &mut self.score_table);
                let result = search.search_root(&mut working, deadline);
                self.nodes_searched = search.nodes_searched();
                result.map(|(score, mv)| match score.cmp(&0) {
                    Ordering::Greater => (Outcome::Win, mv),
                    Ordering::Less => (Outcome::Loss, None),
                    Ordering::Equal => (Outcome::Draw, mv),
                })
            }
            Strategy::Boolean | Strategy::MonteCarlo => {
                let mut solver = BooleanSolver::new(&self.zobrist, &mut self.outcome_table);
                let result = solver.solve(&mut working, deadline);
                self.nodes_searched = solver.nodes_searched();
                result
            }
        };

        match result {
            Ok((outcome, mv)) => {
                let solved = match outcome {
                    Outcome::Win => SolveOutcome::Winner(to_play),
                    Outcome::Loss => SolveOutcome::Winner(to_play.opponent()),
                    Outcome::Draw => SolveOutcome::Draw,
                };
                info!(
                    "Solved in {} ms ({} nodes): {} {:?}",
                    deadline.elapsed().as_millis(),
                    self.nodes_searched,
                    solved,
                    mv
                );
                debug!(
                    "Table stats: score={:?}, outcome={:?}",
                    self.score_table.stats(),
                    self.outcome_table.stats()
                );
                (solved, mv)
            }
            Err(SearchError::Timeout) => {
                warn!(
                    "Solve timed out after {} ms ({} nodes)",
                    deadline.elapsed().as_millis(),
                    self.nodes_searched
                );
                (SolveOutcome::Unknown, None)
            }
            Err(SearchError::GameOver) => (terminal_outcome(board).unwrap_or(SolveOutcome::Unknown), None),
        }
    }

    /// 蒙特卡洛搜索，超时时取已有统计中最好的一手
    fn monte_carlo(&mut self, board: &Board, deadline: &mut Deadline) -> Option<Point> {
        let mut mc = MonteCarlo::new(&self.zobrist, &mut self.tree, &mut self.rng, self.config.num_simulations)
            .with_policy(self.config.playout);

        let mv = match mc.search(board, deadline) {
            Ok(mv) => mv,
            Err(err) => {
                warn!("{} after {} simulations, using statistics so far", err, mc.simulations_run());
                let candidates = self.config.playout.moves(board);
                mc.best_first_move(board, &candidates)
            }
        };
        self.nodes_searched = mc.simulations_run() as u64;

        info!(
            "MCTS finished in {} ms ({} simulations): {:?}",
            deadline.elapsed().as_millis(),
            self.nodes_searched,
            mv
        );
        mv
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// 已结束局面的结果
fn terminal_outcome(board: &Board) -> Option<SolveOutcome> {
    if let Some(winner) = board.detect_five() {
        return Some(SolveOutcome::Winner(winner));
    }
    if board.is_full() {
        return Some(SolveOutcome::Draw);
    }
    None
}

/// 超时或证明失败后的廉价走法：战术候选中评估最高的一手
fn fallback_move(board: &Board) -> Option<Point> {
    let mut working = board.clone();
    let candidates = tactics::classify(&working).moves;
    Evaluator::best_move(&mut working, &candidates)
}
