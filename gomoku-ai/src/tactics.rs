//! 战术走法过滤
//!
//! 按顺序检查五类走法，返回第一个非空的类别：
//! 1. 成五
//! 2. 挡对方成五
//! 3. 活四（`.XXXX.`）
//! 4. 挡对方活四
//! 5. 以上都没有时返回全部空点
//!
//! 这只是缩小分支，不保证完备。

use gomoku_board::{Board, Point, Stone, WIN_LENGTH};

/// 活四窗口长度（四子加两端）
const OPEN_FOUR_WINDOW: usize = WIN_LENGTH + 1;

/// 走法类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveClass {
    /// 直接成五
    Win,
    /// 挡住对方成五
    BlockWin,
    /// 形成活四
    OpenFour,
    /// 阻止对方形成活四
    BlockOpenFour,
    /// 无战术走法，全部空点
    Fallback,
}

/// 过滤结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TacticalMoves {
    pub class: MoveClass,
    pub moves: Vec<Point>,
}

/// 对当前走子方分类
pub fn classify(board: &Board) -> TacticalMoves {
    classify_for(board, board.current_player())
}

/// 对指定一方分类
pub fn classify_for(board: &Board, player: Stone) -> TacticalMoves {
    let checks: [(MoveClass, fn(&Board, Stone) -> Vec<Point>); 4] = [
        (MoveClass::Win, win_moves),
        (MoveClass::BlockWin, block_win_moves),
        (MoveClass::OpenFour, open_four_moves),
        (MoveClass::BlockOpenFour, block_open_four_moves),
    ];

    for (class, check) in checks {
        let moves = check(board, player);
        if !moves.is_empty() {
            return TacticalMoves { class, moves };
        }
    }

    TacticalMoves {
        class: MoveClass::Fallback,
        moves: board.empty_points(),
    }
}

/// 能直接成五的点：五格窗口中恰有一个空点，其余全是己方棋子
pub fn win_moves(board: &Board, player: Stone) -> Vec<Point> {
    let mut moves = Vec::new();
    for line in board.lines() {
        for window in line.windows(WIN_LENGTH) {
            if let Some(point) = single_gap(board, window, player) {
                push_unique(&mut moves, point);
            }
        }
    }
    moves
}

/// 对方能直接成五的点
pub fn block_win_moves(board: &Board, player: Stone) -> Vec<Point> {
    win_moves(board, player.opponent())
}

/// 能形成活四的点：六格窗口两端为空，中间四格恰有一个空点，其余全是己方棋子
pub fn open_four_moves(board: &Board, player: Stone) -> Vec<Point> {
    let mut moves = Vec::new();
    for line in board.lines() {
        for window in line.windows(OPEN_FOUR_WINDOW) {
            if let Some(point) = open_four_gap(board, window, player) {
                push_unique(&mut moves, point);
            }
        }
    }
    moves
}

/// 阻止对方形成活四的点
///
/// 中间的空点总能阻止。窗口贴着棋盘边缘时，对方无法把棋形平移出去，
/// 所以远离边缘的一端也能阻止；贴边一端只有在空点不紧挨它时才有效。
pub fn block_open_four_moves(board: &Board, player: Stone) -> Vec<Point> {
    let opponent = player.opponent();
    let mut moves = Vec::new();

    for line in board.lines() {
        let last = line.len().saturating_sub(OPEN_FOUR_WINDOW);
        for (i, window) in line.windows(OPEN_FOUR_WINDOW).enumerate() {
            let Some(gap) = open_four_gap(board, window, opponent) else {
                continue;
            };
            push_unique(&mut moves, gap);

            if i == 0 {
                push_unique(&mut moves, window[5]);
                if gap != window[1] {
                    push_unique(&mut moves, window[0]);
                }
            } else if i == last {
                push_unique(&mut moves, window[0]);
                if gap != window[4] {
                    push_unique(&mut moves, window[5]);
                }
            }
        }
    }
    moves
}

/// 窗口中恰有一个空点且其余全是 `player` 时返回该空点
fn single_gap(board: &Board, window: &[Point], player: Stone) -> Option<Point> {
    let mut gap = None;
    for &point in window {
        match board.get(point) {
            None if gap.is_none() => gap = Some(point),
            None => return None,
            Some(stone) if stone != player => return None,
            Some(_) => {}
        }
    }
    gap
}

/// 六格窗口两端为空，中间四格满足 `single_gap` 时返回该空点
fn open_four_gap(board: &Board, window: &[Point], player: Stone) -> Option<Point> {
    if board.get(window[0]).is_some() || board.get(window[5]).is_some() {
        return None;
    }
    single_gap(board, &window[1..5], player)
}

fn push_unique(moves: &mut Vec<Point>, point: Point) {
    if !moves.contains(&point) {
        moves.push(point);
    }
}
