//! 五子棋棋盘库
//!
//! 包含:
//! - 棋子、棋盘、落点等核心数据结构
//! - 落子/悔棋、空点枚举、连线枚举与五连判定
//! - 坐标表示法（A1 形式）
//! - 错误类型定义

mod board;
mod constants;
mod error;
mod notation;
mod stone;

pub use board::Board;
pub use constants::*;
pub use error::{BoardError, Result};
pub use notation::{format_point, parse_point};
pub use stone::{Point, Stone};
