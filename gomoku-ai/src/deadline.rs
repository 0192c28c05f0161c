//! 搜索时限
//!
//! 协作式取消：递归中每展开一个节点调用一次 `check()`，每隔
//! `check_interval` 个节点读一次时钟，超时后返回 `SearchError::Timeout`，
//! 由调用栈用 `?` 一路传回顶层。

use std::time::{Duration, Instant};

use crate::error::{Result, SearchError};

/// 默认读时钟间隔（节点数）
pub const DEFAULT_CHECK_INTERVAL: u64 = 1024;

/// 搜索截止时间
#[derive(Debug, Clone)]
pub struct Deadline {
    /// 开始时间
    started_at: Instant,
    /// 截止时刻（None 表示不限时）
    expires_at: Option<Instant>,
    /// 读时钟间隔
    check_interval: u64,
    /// 已展开节点数
    nodes: u64,
}

impl Deadline {
    /// 从现在开始计时
    pub fn new(time_limit: Option<Duration>, check_interval: u64) -> Self {
        let started_at = Instant::now();
        Self {
            started_at,
            expires_at: time_limit.map(|limit| started_at + limit),
            check_interval: check_interval.max(1),
            nodes: 0,
        }
    }

    /// 限时搜索
    pub fn after(time_limit: Duration) -> Self {
        Self::new(Some(time_limit), DEFAULT_CHECK_INTERVAL)
    }

    /// 不限时搜索
    pub fn unlimited() -> Self {
        Self::new(None, DEFAULT_CHECK_INTERVAL)
    }

    /// 计入一个节点，必要时读时钟
    #[inline]
    pub fn check(&mut self) -> Result<()> {
        self.nodes += 1;
        if self.nodes % self.check_interval == 0 && self.is_expired() {
            return Err(SearchError::Timeout);
        }
        Ok(())
    }

    /// 立即读时钟
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    /// 已展开节点数
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// 已用时间
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}
