//! 棋盘常量定义

/// 连成多少子获胜
pub const WIN_LENGTH: usize = 5;

/// 默认棋盘边长
pub const DEFAULT_BOARD_SIZE: usize = 7;

/// 最小棋盘边长（小于此值无法连成五子）
pub const MIN_BOARD_SIZE: usize = WIN_LENGTH;

/// 最大棋盘边长（受列字母表限制）
pub const MAX_BOARD_SIZE: usize = 19;

/// 列字母（跳过 I，与围棋/GTP 习惯一致）
pub const COLUMN_LETTERS: &str = "ABCDEFGHJKLMNOPQRST";
