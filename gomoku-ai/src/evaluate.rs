//! 局面评估函数
//!
//! 对每条连线上的每个五格窗口计分：只含一方棋子的窗口按子数取
//! `WINDOW_SCORES`，己方为正、对方为负；双方都有棋子的窗口已被封死，记 0。

use gomoku_board::{Board, Point, Stone, WIN_LENGTH};

/// 窗口内 0..=5 个同色棋子对应的分值
const WINDOW_SCORES: [i32; WIN_LENGTH + 1] = [0, 1, 10, 100, 1000, 1_000_000];

/// 评估器
pub struct Evaluator;

impl Evaluator {
    /// 评估局面（`player` 视角，正值对 `player` 有利）
    pub fn evaluate(board: &Board, player: Stone) -> i32 {
        let mut score = 0i32;

        for line in board.lines() {
            for window in line.windows(WIN_LENGTH) {
                score = score.saturating_add(Self::evaluate_window(board, window, player));
            }
        }

        score
    }

    /// 单个窗口的分值
    fn evaluate_window(board: &Board, window: &[Point], player: Stone) -> i32 {
        let mut mine = 0;
        let mut theirs = 0;
        for &point in window {
            match board.get(point) {
                Some(stone) if stone == player => mine += 1,
                Some(_) => theirs += 1,
                None => {}
            }
        }

        if mine > 0 && theirs > 0 {
            return 0;
        }
        WINDOW_SCORES[mine] - WINDOW_SCORES[theirs]
    }

    /// 在候选走法中挑出落子后评估最高的一手（同分取先出现者）
    ///
    /// 棋盘在返回前恢复原状。
    pub fn best_move(board: &mut Board, moves: &[Point]) -> Option<Point> {
        let player = board.current_player();
        let mut best: Option<(i32, Point)> = None;

        for &mv in moves {
            board.apply(mv);
            let score = Self::evaluate(board, player);
            board.undo(mv);

            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, mv));
            }
        }

        best.map(|(_, mv)| mv)
    }
}
