//! Alpha-Beta 搜索
//!
//! 不限深度的 negamax + Alpha-Beta 剪枝，一直搜到终局。
//! 分数总是走子方视角：胜为 `WIN_SCORE`，负为 `-WIN_SCORE`，和为 0。
//!
//! 候选走法只做不改变博弈值的裁剪：能成五只走成五点，对方有成五点只走挡点；
//! 其余情况展开全部空点，活四 / 挡活四类走法只用来排序。
//!
//! 置换表条目带上下界标记：Beta 截断存下界，所有走法都没超过 Alpha 时存上界，
//! 查询时只有标记能确定当前窗口结果才直接返回。

use gomoku_board::{Board, Point};

use crate::deadline::Deadline;
use crate::error::Result;
use crate::tactics;
use crate::transposition::{EntryType, TTEntry, TranspositionTable};
use crate::zobrist::ZobristTable;

/// 胜局分值
pub const WIN_SCORE: i32 = 10_000;

/// 全窗口边界（大于任何局面分值）
pub const INFINITY: i32 = 100_000;

/// Alpha-Beta 搜索器
pub struct AlphaBeta<'a> {
    zobrist: &'a ZobristTable,
    table: &'a mut TranspositionTable<TTEntry>,
    nodes_searched: u64,
}

impl<'a> AlphaBeta<'a> {
    /// 创建搜索器
    pub fn new(zobrist: &'a ZobristTable, table: &'a mut TranspositionTable<TTEntry>) -> Self {
        Self {
            zobrist,
            table,
            nodes_searched: 0,
        }
    }

    /// 全窗口搜索
    pub fn search_root(&mut self, board: &mut Board, deadline: &mut Deadline) -> Result<(i32, Option<Point>)> {
        self.search(board, -INFINITY, INFINITY, deadline)
    }

    /// 在 `(alpha, beta)` 窗口内搜索，返回分数与最佳走法
    ///
    /// 返回时棋盘与传入时一致（超时也一样）。
    pub fn search(
        &mut self,
        board: &mut Board,
        alpha: i32,
        beta: i32,
        deadline: &mut Deadline,
    ) -> Result<(i32, Option<Point>)> {
        let hash = self.zobrist.hash(board);
        self.alpha_beta(board, hash, alpha, beta, None, deadline)
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    fn alpha_beta(
        &mut self,
        board: &mut Board,
        hash: u64,
        mut alpha: i32,
        beta: i32,
        last_move: Option<Point>,
        deadline: &mut Deadline,
    ) -> Result<(i32, Option<Point>)> {
        deadline.check()?;
        self.nodes_searched += 1;

        if let Some(entry) = self.table.probe(hash) {
            match entry.entry_type {
                EntryType::Exact => return Ok((entry.score.max(alpha).min(beta), entry.best_move)),
                EntryType::LowerBound if entry.score >= beta => return Ok((beta, entry.best_move)),
                EntryType::UpperBound if entry.score <= alpha => return Ok((alpha, entry.best_move)),
                _ => {}
            }
        }

        if let Some(score) = Self::terminal_score(board, last_move) {
            self.table.store(hash, TTEntry::new(score, None, EntryType::Exact));
            return Ok((score.max(alpha).min(beta), None));
        }

        let moves = candidate_moves(board);
        let alpha_orig = alpha;
        let mut best_move = moves[0];

        for &mv in &moves {
            let mover = board.current_player();
            board.apply(mv);
            let child_hash = self.zobrist.toggle(hash, mv, mover);
            let result = self.alpha_beta(board, child_hash, -beta, -alpha, Some(mv), deadline);
            board.undo(mv);

            let value = -result?.0;

            if value >= beta {
                // Beta 剪枝
                self.table.store(hash, TTEntry::new(beta, Some(mv), EntryType::LowerBound));
                return Ok((beta, Some(mv)));
            }
            if value > alpha {
                alpha = value;
                best_move = mv;
            }
        }

        let entry_type = if alpha > alpha_orig {
            EntryType::Exact
        } else {
            EntryType::UpperBound
        };
        self.table.store(hash, TTEntry::new(alpha, Some(best_move), entry_type));
        Ok((alpha, Some(best_move)))
    }

    /// 终局的静态分值（走子方视角），非终局返回 None
    fn terminal_score(board: &Board, last_move: Option<Point>) -> Option<i32> {
        let winner = match last_move {
            Some(mv) => board.winner_through(mv),
            None => board.detect_five(),
        };
        if let Some(winner) = winner {
            return Some(if winner == board.current_player() {
                WIN_SCORE
            } else {
                -WIN_SCORE
            });
        }
        if board.is_full() {
            return Some(0);
        }
        None
    }
}

/// 搜索候选
///
/// 对方有两个以上成五点时挡哪一个都输，只展开第一个挡点即可得出负分。
fn candidate_moves(board: &Board) -> Vec<Point> {
    let player = board.current_player();
    if let Some(&mv) = tactics::win_moves(board, player).first() {
        return vec![mv];
    }

    let mut threats = tactics::block_win_moves(board, player);
    if !threats.is_empty() {
        threats.truncate(1);
        return threats;
    }

    let mut moves = tactics::classify_for(board, player).moves;
    let mut listed = vec![false; board.len()];
    for &mv in &moves {
        listed[mv] = true;
    }
    moves.extend(board.empty_points().into_iter().filter(|&point| !listed[point]));
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use gomoku_board::Stone;
    use std::time::Duration;

    fn search(board: &mut Board) -> (i32, Option<Point>) {
        let zobrist = ZobristTable::with_seed(board.size(), 7);
        let mut table = TranspositionTable::new();
        let mut engine = AlphaBeta::new(&zobrist, &mut table);
        engine.search_root(board, &mut Deadline::unlimited()).unwrap()
    }

    #[test]
    fn test_finds_immediate_win() {
        let mut board = Board::from_rows(
            &["XXXX...", "OOO....", "O......", ".......", ".......", ".......", "......."],
            Stone::Black,
        )
        .unwrap();
        let (score, mv) = search(&mut board);
        assert_eq!(score, WIN_SCORE);
        assert_eq!(mv, Some(4));
    }

    #[test]
    fn test_terminal_position_has_no_move() {
        let mut board = Board::from_rows(&["XXXXX", "OOOO.", ".....", ".....", "....."], Stone::White)
            .unwrap();
        let (score, mv) = search(&mut board);
        assert_eq!(score, -WIN_SCORE, "对方已成五，走子方判负");
        assert_eq!(mv, None);
    }

    #[test]
    fn test_full_board_is_draw() {
        let mut board = Board::from_rows(
            &["XXOOX", "OOXXO", "XXOOX", "OOXXO", "XXOOX"],
            Stone::Black,
        )
        .unwrap();
        assert!(board.is_full());
        assert_eq!(search(&mut board), (0, None));
    }

    #[test]
    fn test_board_restored_after_search() {
        let mut board = Board::from_rows(
            &["XOXO.", "OXOX.", "XOXO.", ".....", "OXOX."],
            Stone::Black,
        )
        .unwrap();
        let before = board.clone();
        search(&mut board);
        assert_eq!(board, before, "搜索结束后棋盘应恢复原状");
    }

    #[test]
    fn test_table_reuse_gives_same_result() {
        let mut board = Board::from_rows(
            &["XOXO.", "OXOX.", "XOXO.", ".....", "OXOX."],
            Stone::Black,
        )
        .unwrap();
        let zobrist = ZobristTable::with_seed(5, 1);
        let mut table = TranspositionTable::new();

        let first = AlphaBeta::new(&zobrist, &mut table)
            .search_root(&mut board, &mut Deadline::unlimited())
            .unwrap();
        assert!(!table.is_empty());
        let second = AlphaBeta::new(&zobrist, &mut table)
            .search_root(&mut board, &mut Deadline::unlimited())
            .unwrap();
        assert_eq!(first, second, "置换表命中应给出相同结果");
    }

    #[test]
    fn test_timeout_restores_board() {
        let mut board = Board::new(7).unwrap();
        let before = board.clone();
        let zobrist = ZobristTable::with_seed(7, 3);
        let mut table = TranspositionTable::new();
        let mut deadline = Deadline::new(Some(Duration::ZERO), 64);

        let result = AlphaBeta::new(&zobrist, &mut table).search_root(&mut board, &mut deadline);
        assert_eq!(result, Err(SearchError::Timeout));
        assert_eq!(board, before);
    }

    #[test]
    fn test_candidates_take_the_win() {
        let board = Board::from_rows(&["XXXX.", "OOO..", "O....", ".....", "....."], Stone::Black).unwrap();
        assert_eq!(candidate_moves(&board), vec![4]);
    }

    #[test]
    fn test_candidates_single_block_against_double_threat() {
        let board = Board::from_rows(&["OOOO.", ".....", ".OOOO", "XXX..", "XX.X."], Stone::Black).unwrap();
        let moves = candidate_moves(&board);
        assert_eq!(moves.len(), 1, "双成五点时只需展开一个挡点");
        assert!(tactics::block_win_moves(&board, Stone::Black).contains(&moves[0]));

        let mut working = board.clone();
        assert_eq!(search(&mut working).0, -WIN_SCORE);
    }

    #[test]
    fn test_candidates_keep_every_move_behind_block_open_four() {
        // 白方有活三，黑方在 45 落子可形成双四；挡活四类只能排序，不能裁掉 45
        let board = Board::from_rows(
            &[".OOO...", "...O...", ".......", "...X...", "...X...", "...X...", "XXX...."],
            Stone::Black,
        )
        .unwrap();
        assert_eq!(tactics::classify(&board).class, tactics::MoveClass::BlockOpenFour);

        let moves = candidate_moves(&board);
        let mut leading = moves[..3].to_vec();
        leading.sort_unstable();
        assert_eq!(leading, vec![0, 4, 5], "挡活四的走法排在前面");
        assert!(moves.contains(&45), "双四点必须保留");

        let mut all = moves.clone();
        all.sort_unstable();
        assert_eq!(all, board.empty_points(), "其余空点各出现一次");
    }

    #[test]
    fn test_exact_hit_clamped_to_window() {
        let mut board = Board::from_rows(
            &["XXXX...", "OOO....", "O......", ".......", ".......", ".......", "......."],
            Stone::Black,
        )
        .unwrap();
        let zobrist = ZobristTable::with_seed(7, 8);
        let mut table = TranspositionTable::new();

        let mut engine = AlphaBeta::new(&zobrist, &mut table);
        assert_eq!(engine.search_root(&mut board, &mut Deadline::unlimited()).unwrap().0, WIN_SCORE);

        // 根局面已存为精确值，窄窗口命中时仍须落在窗口内
        let (score, mv) = engine.search(&mut board, -10, 10, &mut Deadline::unlimited()).unwrap();
        assert_eq!(score, 10);
        assert_eq!(mv, Some(4));
    }
}
