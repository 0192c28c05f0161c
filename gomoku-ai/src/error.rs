//! 错误类型定义

use thiserror::Error;

/// 搜索错误
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// 时间用尽，搜索在任意递归深度被放弃
    #[error("Search timed out")]
    Timeout,

    /// 根局面已经结束（有五连或已下满）
    #[error("Position is already terminal")]
    GameOver,
}

/// 搜索结果类型
pub type Result<T> = std::result::Result<T, SearchError>;
