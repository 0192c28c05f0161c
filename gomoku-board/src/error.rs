//! 错误类型定义

use thiserror::Error;

/// 棋盘操作错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// 无效的棋盘尺寸
    #[error("Invalid board size: {size} (expected {min}..={max})")]
    InvalidSize { size: usize, min: usize, max: usize },

    /// 落点超出棋盘
    #[error("Point {point} is outside a {size}x{size} board")]
    PointOutOfRange { point: usize, size: usize },

    /// 落点已有棋子
    #[error("Point {point} is already occupied")]
    Occupied { point: usize },

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,

    /// 无效的棋盘文本
    #[error("Invalid board row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    /// 无效的坐标表示
    #[error("Invalid point notation: {text}")]
    InvalidNotation { text: String },
}

/// 棋盘操作结果类型
pub type Result<T> = std::result::Result<T, BoardError>;
