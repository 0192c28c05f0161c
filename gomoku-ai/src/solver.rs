//! 布尔 negamax 求解器
//!
//! 穷举博弈树，证明走子方在完美对弈下的胜、负或和，不计算数值评估。
//! 结果按局面哈希（已含走子方）记忆在独立的置换表里。
//!
//! 两个战术捷径：
//! - 走子方能直接成五时立即判胜；
//! - 对方有成五点时只考虑挡点，对方有两个以上成五点时判负。

use gomoku_board::{Board, Point};

use crate::deadline::Deadline;
use crate::error::{Result, SearchError};
use crate::tactics;
use crate::transposition::TranspositionTable;
use crate::zobrist::ZobristTable;

/// 博弈结果（走子方视角）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    /// 换到对方视角
    pub fn flip(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            Outcome::Draw => Outcome::Draw,
        }
    }
}

/// 布尔求解器
pub struct BooleanSolver<'a> {
    zobrist: &'a ZobristTable,
    table: &'a mut TranspositionTable<Outcome>,
    nodes_searched: u64,
}

impl<'a> BooleanSolver<'a> {
    /// 创建求解器
    pub fn new(zobrist: &'a ZobristTable, table: &'a mut TranspositionTable<Outcome>) -> Self {
        Self {
            zobrist,
            table,
            nodes_searched: 0,
        }
    }

    /// 求解根局面，返回结果与一步达成该结果的走法
    ///
    /// 判负且没有能改善结果的走法时走法为 None。
    /// 根局面已经结束（有五连或已下满）时返回 `SearchError::GameOver`。
    pub fn solve(&mut self, board: &mut Board, deadline: &mut Deadline) -> Result<(Outcome, Option<Point>)> {
        if board.detect_five().is_some() || board.is_full() {
            return Err(SearchError::GameOver);
        }

        deadline.check()?;
        self.nodes_searched += 1;

        let hash = self.zobrist.hash(board);
        let (outcome, mv) = self.expand(board, hash, deadline)?;
        self.table.store(hash, outcome);
        Ok((outcome, mv))
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    fn negamax(
        &mut self,
        board: &mut Board,
        hash: u64,
        last_move: Point,
        deadline: &mut Deadline,
    ) -> Result<Outcome> {
        deadline.check()?;
        self.nodes_searched += 1;

        // 上一手成五，走子方已负
        if board.winner_through(last_move).is_some() {
            return Ok(Outcome::Loss);
        }

        if let Some(outcome) = self.table.probe(hash) {
            return Ok(outcome);
        }

        let (outcome, _) = self.expand(board, hash, deadline)?;
        self.table.store(hash, outcome);
        Ok(outcome)
    }

    /// 展开非终局节点
    fn expand(&mut self, board: &mut Board, hash: u64, deadline: &mut Deadline) -> Result<(Outcome, Option<Point>)> {
        let player = board.current_player();
        let empty = board.empty_points();
        if empty.is_empty() {
            return Ok((Outcome::Draw, None));
        }

        if let Some(&mv) = tactics::win_moves(board, player).first() {
            return Ok((Outcome::Win, Some(mv)));
        }

        let moves = match tactics::block_win_moves(board, player) {
            threats if threats.len() > 1 => return Ok((Outcome::Loss, None)),
            threats if threats.len() == 1 => threats,
            _ => empty,
        };

        let mut draw_move = None;
        for mv in moves {
            board.apply(mv);
            let child_hash = self.zobrist.toggle(hash, mv, player);
            let result = self.negamax(board, child_hash, mv, deadline);
            board.undo(mv);

            match result? {
                Outcome::Loss => return Ok((Outcome::Win, Some(mv))),
                Outcome::Draw if draw_move.is_none() => draw_move = Some(mv),
                _ => {}
            }
        }

        Ok(match draw_move {
            Some(mv) => (Outcome::Draw, Some(mv)),
            None => (Outcome::Loss, None),
        })
    }
}
