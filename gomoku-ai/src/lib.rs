//! 五子棋 AI 引擎
//!
//! 包含:
//! - 战术走法过滤（成五 / 挡五 / 活四 / 挡活四）
//! - 局面评估函数
//! - 不限深度的 Alpha-Beta 搜索
//! - 布尔 negamax 求解器
//! - 蒙特卡洛模拟
//! - Zobrist 哈希与置换表
//! - 时限控制

mod deadline;
mod engine;
mod error;
mod evaluate;
mod mcts;
mod search;
mod solver;
mod tactics;
mod transposition;
mod zobrist;

pub use deadline::{Deadline, DEFAULT_CHECK_INTERVAL};
pub use engine::{Engine, EngineConfig, SolveOutcome, Strategy};
pub use error::{Result, SearchError};
pub use evaluate::Evaluator;
pub use mcts::{MctsTree, MonteCarlo, NodeStats, PlayoutPolicy, Terminal, DEFAULT_SIMULATIONS};
pub use search::{AlphaBeta, INFINITY, WIN_SCORE};
pub use solver::{BooleanSolver, Outcome};
pub use tactics::{
    block_open_four_moves, block_win_moves, classify, classify_for, open_four_moves, win_moves, MoveClass,
    TacticalMoves,
};
pub use transposition::{EntryType, TTEntry, TTStats, TranspositionTable};
pub use zobrist::{ZobristTable, DEFAULT_ZOBRIST_SEED};
