//! 置换表
//!
//! 用于缓存已搜索过的局面，避免重复计算。
//! 一局对弈内棋盘小、步数少，不设淘汰策略，表随搜索单调增长。

use std::cell::Cell;
use std::collections::HashMap;

use gomoku_board::Point;

/// 置换表条目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// 精确值
    Exact,
    /// 下界（Beta 截断）
    LowerBound,
    /// 上界（所有走法都没能超过 Alpha）
    UpperBound,
}

/// 数值搜索的置换表条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    /// 评估分数（走子方视角）
    pub score: i32,
    /// 最佳走法（终局为 None）
    pub best_move: Option<Point>,
    /// 条目类型
    pub entry_type: EntryType,
}

impl TTEntry {
    /// 创建新条目
    pub fn new(score: i32, best_move: Option<Point>, entry_type: EntryType) -> Self {
        Self {
            score,
            best_move,
            entry_type,
        }
    }
}

/// 置换表
///
/// 以局面哈希为键。同一哈希的后写条目覆盖先写条目；
/// 未命中总是回退到完整搜索，不给近似答案。
pub struct TranspositionTable<E = TTEntry> {
    /// 条目
    entries: HashMap<u64, E>,
    /// 命中次数
    hits: Cell<u64>,
    /// 查询次数
    probes: Cell<u64>,
}

impl<E: Copy> TranspositionTable<E> {
    /// 创建空表
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            hits: Cell::new(0),
            probes: Cell::new(0),
        }
    }

    /// 查询条目
    pub fn probe(&self, hash: u64) -> Option<E> {
        self.probes.set(self.probes.get() + 1);

        let entry = self.entries.get(&hash).copied();
        if entry.is_some() {
            self.hits.set(self.hits.get() + 1);
        }
        entry
    }

    /// 存储条目
    pub fn store(&mut self, hash: u64, entry: E) {
        self.entries.insert(hash, entry);
    }

    /// 条目数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 清空表
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits.set(0);
        self.probes.set(0);
    }

    /// 获取命中率
    pub fn hit_rate(&self) -> f64 {
        self.stats().hit_rate()
    }

    /// 获取统计信息
    pub fn stats(&self) -> TTStats {
        TTStats {
            entries: self.entries.len(),
            hits: self.hits.get(),
            probes: self.probes.get(),
        }
    }
}

impl<E: Copy> Default for TranspositionTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// 置换表统计信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTStats {
    pub entries: usize,
    pub hits: u64,
    pub probes: u64,
}

impl TTStats {
    pub fn hit_rate(&self) -> f64 {
        if self.probes == 0 {
            0.0
        } else {
            self.hits as f64 / self.probes as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tt_store_and_probe() {
        let mut tt = TranspositionTable::new();

        let hash = 0x1234567890ABCDEF_u64;
        tt.store(hash, TTEntry::new(100, Some(24), EntryType::Exact));

        let entry = tt.probe(hash).expect("刚存储的条目应命中");
        assert_eq!(entry.score, 100);
        assert_eq!(entry.best_move, Some(24));
        assert_eq!(entry.entry_type, EntryType::Exact);
    }

    #[test]
    fn test_tt_miss() {
        let tt: TranspositionTable = TranspositionTable::new();

        assert!(tt.probe(0x1234567890ABCDEF).is_none());
        assert_eq!(tt.stats().probes, 1);
        assert_eq!(tt.stats().hits, 0);
    }

    #[test]
    fn test_tt_overwrite() {
        let mut tt = TranspositionTable::new();
        let hash = 7u64;

        tt.store(hash, TTEntry::new(50, None, EntryType::LowerBound));
        tt.store(hash, TTEntry::new(80, Some(3), EntryType::Exact));

        let entry = tt.probe(hash).unwrap();
        assert_eq!(entry.score, 80);
        assert_eq!(entry.entry_type, EntryType::Exact);
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn test_tt_generic_entry_and_stats() {
        let mut tt: TranspositionTable<bool> = TranspositionTable::new();
        tt.store(1, true);
        assert_eq!(tt.probe(1), Some(true));
        assert_eq!(tt.probe(2), None);
        assert!((tt.hit_rate() - 0.5).abs() < f64::EPSILON);

        tt.clear();
        assert!(tt.is_empty());
        assert_eq!(tt.stats().probes, 0);
    }
}
