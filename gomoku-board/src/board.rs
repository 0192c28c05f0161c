//! 棋盘状态

use std::sync::Arc;

use crate::constants::{COLUMN_LETTERS, MAX_BOARD_SIZE, MIN_BOARD_SIZE, WIN_LENGTH};
use crate::error::{BoardError, Result};
use crate::stone::{Point, Stone};

/// 四个连线方向（行、列增量）：横、竖、主对角线、副对角线
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// 棋盘
///
/// `size x size` 的格子按行优先存储，索引为 `row * size + col`。
/// 连线表只依赖尺寸，克隆时通过 `Arc` 共享，所以 `clone()` 只复制格子本身。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// 边长
    size: usize,
    /// 格子内容
    cells: Vec<Option<Stone>>,
    /// 当前走子方
    current_player: Stone,
    /// 所有长度不小于五的连线（行、列、两个方向的对角线）
    lines: Arc<[Vec<Point>]>,
}

impl Board {
    /// 创建空棋盘，黑方先行
    pub fn new(size: usize) -> Result<Self> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(BoardError::InvalidSize {
                size,
                min: MIN_BOARD_SIZE,
                max: MAX_BOARD_SIZE,
            });
        }

        Ok(Self {
            size,
            cells: vec![None; size * size],
            current_player: Stone::Black,
            lines: build_lines(size).into(),
        })
    }

    /// 从文本行创建棋盘
    ///
    /// 每行由 `X`（黑）、`O`（白）、`.`（空）组成，空白字符被忽略。
    /// 行数即棋盘边长。
    pub fn from_rows(rows: &[&str], to_play: Stone) -> Result<Self> {
        let mut board = Self::new(rows.len())?;
        board.current_player = to_play;

        for (row, text) in rows.iter().enumerate() {
            let cells: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != board.size {
                return Err(BoardError::InvalidRow {
                    row,
                    reason: format!("expected {} cells, found {}", board.size, cells.len()),
                });
            }
            for (col, c) in cells.into_iter().enumerate() {
                let stone = match c {
                    '.' | '+' | '-' => None,
                    other => Some(Stone::from_char(other).ok_or_else(|| BoardError::InvalidRow {
                        row,
                        reason: format!("unexpected character '{}'", other),
                    })?),
                };
                board.cells[row * board.size + col] = stone;
            }
        }

        Ok(board)
    }

    /// 棋盘边长
    pub fn size(&self) -> usize {
        self.size
    }

    /// 格子总数
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// 棋盘是否没有格子（尺寸合法时恒为 false）
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 行列坐标转落点
    pub fn point(&self, row: usize, col: usize) -> Point {
        debug_assert!(row < self.size && col < self.size);
        row * self.size + col
    }

    /// 落点转行列坐标
    pub fn row_col(&self, point: Point) -> (usize, usize) {
        (point / self.size, point % self.size)
    }

    /// 中心点
    pub fn center(&self) -> Point {
        self.point(self.size / 2, self.size / 2)
    }

    /// 获取指定落点的棋子
    pub fn get(&self, point: Point) -> Option<Stone> {
        self.cells.get(point).copied().flatten()
    }

    /// 设置指定落点的棋子（不检查规则，用于摆局面）
    pub fn set(&mut self, point: Point, stone: Option<Stone>) {
        if point < self.cells.len() {
            self.cells[point] = stone;
        }
    }

    /// 当前走子方
    pub fn current_player(&self) -> Stone {
        self.current_player
    }

    /// 设置走子方
    pub fn set_current_player(&mut self, stone: Stone) {
        self.current_player = stone;
    }

    /// 落子（检查规则），成功后切换走子方
    pub fn play(&mut self, point: Point) -> Result<()> {
        if point >= self.cells.len() {
            return Err(BoardError::PointOutOfRange {
                point,
                size: self.size,
            });
        }
        if self.cells[point].is_some() {
            return Err(BoardError::Occupied { point });
        }
        if self.detect_five().is_some() {
            return Err(BoardError::GameOver);
        }
        self.apply(point);
        Ok(())
    }

    /// 当前走子方在空点落子并切换走子方（不检查规则，搜索内部使用）
    #[inline]
    pub fn apply(&mut self, point: Point) {
        debug_assert!(self.cells[point].is_none(), "apply onto occupied point {}", point);
        self.cells[point] = Some(self.current_player);
        self.current_player = self.current_player.opponent();
    }

    /// 撤销 `apply`：移除上一手的棋子并切回走子方
    #[inline]
    pub fn undo(&mut self, point: Point) {
        let mover = self.current_player.opponent();
        debug_assert_eq!(self.cells[point], Some(mover), "undo of a point the last mover did not play");
        self.cells[point] = None;
        self.current_player = mover;
    }

    /// 所有空点
    pub fn empty_points(&self) -> Vec<Point> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(point, _)| point)
            .collect()
    }

    /// 是否已下满
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// 棋盘上的棋子数
    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// 所有连线
    pub fn lines(&self) -> &[Vec<Point>] {
        &self.lines
    }

    /// 检查是否存在五连，返回获胜方
    pub fn detect_five(&self) -> Option<Stone> {
        for line in self.lines.iter() {
            let mut run = 0;
            let mut last = None;
            for &point in line {
                let cell = self.cells[point];
                if cell.is_some() && cell == last {
                    run += 1;
                } else {
                    run = 1;
                    last = cell;
                }
                if run >= WIN_LENGTH {
                    if let Some(stone) = last {
                        return Some(stone);
                    }
                }
            }
        }
        None
    }

    /// 检查经过 `point` 的四个方向上是否有五连
    pub fn winner_through(&self, point: Point) -> Option<Stone> {
        let stone = self.get(point)?;
        let (row, col) = self.row_col(point);

        for (dr, dc) in DIRECTIONS {
            let count = 1
                + self.count_direction(row, col, dr, dc, stone)
                + self.count_direction(row, col, -dr, -dc, stone);
            if count >= WIN_LENGTH {
                return Some(stone);
            }
        }
        None
    }

    /// 沿某方向数同色连续棋子（不含起点）
    fn count_direction(&self, row: usize, col: usize, dr: isize, dc: isize, stone: Stone) -> usize {
        let mut count = 0;
        let mut r = row as isize + dr;
        let mut c = col as isize + dc;
        while r >= 0 && c >= 0 && (r as usize) < self.size && (c as usize) < self.size {
            if self.cells[r as usize * self.size + c as usize] != Some(stone) {
                break;
            }
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  ")?;
        for letter in COLUMN_LETTERS.chars().take(self.size) {
            write!(f, " {}", letter)?;
        }
        writeln!(f)?;

        for row in 0..self.size {
            write!(f, "{:>2}", row + 1)?;
            for col in 0..self.size {
                let c = self.cells[row * self.size + col].map_or('.', |stone| stone.to_char());
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "to play: {}", self.current_player)
    }
}

/// 生成所有长度不小于五的连线
fn build_lines(size: usize) -> Vec<Vec<Point>> {
    let mut lines = Vec::new();

    // 行与列
    for i in 0..size {
        lines.push((0..size).map(|j| i * size + j).collect());
        lines.push((0..size).map(|j| j * size + i).collect());
    }

    // 两个方向的对角线，起点在首行或首/末列
    let starts = (0..size).map(|c| (0, c)).chain((1..size).map(|r| (r, 0)));
    for (r, c) in starts {
        lines.push(walk(size, r, c, 1, 1));
    }
    let starts = (0..size).map(|c| (0, c)).chain((1..size).map(|r| (r, size - 1)));
    for (r, c) in starts {
        lines.push(walk(size, r, c, 1, -1));
    }

    lines.retain(|line: &Vec<Point>| line.len() >= WIN_LENGTH);
    lines
}

/// 从 (row, col) 沿方向走到棋盘边缘
fn walk(size: usize, row: usize, col: usize, dr: isize, dc: isize) -> Vec<Point> {
    let mut line = Vec::new();
    let mut r = row as isize;
    let mut c = col as isize;
    while r >= 0 && c >= 0 && (r as usize) < size && (c as usize) < size {
        line.push(r as usize * size + c as usize);
        r += dr;
        c += dc;
    }
    line
}
