//! 蒙特卡洛搜索
//!
//! 穷举搜索来不及时使用。每次模拟从首步候选中均匀随机选一手，
//! 之后每个节点从候选走法中均匀随机落子，直到终局。
//! 候选走法由 `PlayoutPolicy` 决定：战术过滤后的走法，或全部空点。
//!
//! 节点按（棋子哈希, 走子方）存储：同一棋子布局可能轮到不同的一方，
//! 所以每个哈希下有两个槽位。
//!
//! 计分约定：节点的 `wins` 只统计“走进该节点的一方”（即该节点走子方的对手）
//! 获胜的模拟，和棋不计分。首步节点的走入方就是根走子方，
//! 所以首步节点的胜率就是根走子方选这一手的胜率。

use std::collections::HashMap;

use gomoku_board::{Board, Point, Stone};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::deadline::Deadline;
use crate::error::Result;
use crate::tactics;
use crate::zobrist::ZobristTable;

/// 默认模拟次数
pub const DEFAULT_SIMULATIONS: usize = 20_000;

/// 模拟走子策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayoutPolicy {
    /// 全部空点中均匀随机
    Random,
    /// 战术过滤（成五 / 挡五 / 活四 / 挡活四）后均匀随机
    #[default]
    RuleBased,
}

impl PlayoutPolicy {
    /// 当前走子方的候选走法
    pub fn moves(self, board: &Board) -> Vec<Point> {
        match self {
            PlayoutPolicy::Random => board.empty_points(),
            PlayoutPolicy::RuleBased => tactics::classify(board).moves,
        }
    }
}

/// 终局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// 一方成五
    Won(Stone),
    /// 下满和棋
    Draw,
}

/// 节点统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStats {
    /// 终局结果（非终局为 None）
    pub terminal: Option<Terminal>,
    /// 候选走法（终局为空）
    pub moves: Vec<Point>,
    /// 访问次数
    pub visits: u32,
    /// 走入方获胜次数
    pub wins: u32,
}

impl NodeStats {
    /// 首次访问时计算终局结果和候选走法
    fn expand(board: &Board, last_move: Point, policy: PlayoutPolicy) -> Self {
        let terminal = match board.winner_through(last_move) {
            Some(winner) => Some(Terminal::Won(winner)),
            None if board.is_full() => Some(Terminal::Draw),
            None => None,
        };
        let moves = if terminal.is_some() {
            Vec::new()
        } else {
            policy.moves(board)
        };

        Self {
            terminal,
            moves,
            visits: 0,
            wins: 0,
        }
    }

    /// 经验胜率（未访问为 0）
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins as f64 / self.visits as f64
        }
    }
}

/// 节点表：每个棋子哈希下按走子方分两个槽位
#[derive(Debug, Default)]
pub struct MctsTree {
    nodes: HashMap<u64, [Option<NodeStats>; 2]>,
}

impl MctsTree {
    /// 创建空表
    pub fn new() -> Self {
        Self::default()
    }

    /// 查询节点
    pub fn get(&self, hash: u64, to_play: Stone) -> Option<&NodeStats> {
        self.nodes.get(&hash)?[to_play.index()].as_ref()
    }

    fn get_mut(&mut self, hash: u64, to_play: Stone) -> Option<&mut NodeStats> {
        self.nodes.get_mut(&hash)?[to_play.index()].as_mut()
    }

    /// 查询节点，不存在时用 `expand` 创建
    fn get_or_expand(&mut self, hash: u64, to_play: Stone, expand: impl FnOnce() -> NodeStats) -> &mut NodeStats {
        let slots = self.nodes.entry(hash).or_insert_with(|| [None, None]);
        slots[to_play.index()].get_or_insert_with(expand)
    }

    /// 已有节点数
    pub fn len(&self) -> usize {
        self.nodes.values().map(|slots| slots.iter().flatten().count()).sum()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 清空
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// 遍历所有节点
    pub fn iter(&self) -> impl Iterator<Item = &NodeStats> {
        self.nodes.values().flat_map(|slots| slots.iter().flatten())
    }
}

/// 蒙特卡洛搜索器
pub struct MonteCarlo<'a, R: Rng> {
    zobrist: &'a ZobristTable,
    tree: &'a mut MctsTree,
    rng: &'a mut R,
    policy: PlayoutPolicy,
    num_simulations: usize,
    simulations_run: usize,
}

impl<'a, R: Rng> MonteCarlo<'a, R> {
    /// 创建搜索器
    pub fn new(zobrist: &'a ZobristTable, tree: &'a mut MctsTree, rng: &'a mut R, num_simulations: usize) -> Self {
        Self {
            zobrist,
            tree,
            rng,
            policy: PlayoutPolicy::default(),
            num_simulations,
            simulations_run: 0,
        }
    }

    /// 指定走子策略
    pub fn with_policy(mut self, policy: PlayoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 已完成的模拟次数
    pub fn simulations_run(&self) -> usize {
        self.simulations_run
    }

    /// 选择走法
    ///
    /// 终局或无空点时返回 None。空棋盘直接下中心点；
    /// 能直接成五或只剩一个候选时不做模拟。首步候选同样由走子策略给出。
    /// 超时返回 `SearchError::Timeout`，此时已有的统计仍保留在节点表中，
    /// 可以用 `best_first_move` 取当前最好的一手。
    pub fn search(&mut self, board: &Board, deadline: &mut Deadline) -> Result<Option<Point>> {
        if board.detect_five().is_some() || board.is_full() {
            return Ok(None);
        }
        if board.stone_count() == 0 {
            return Ok(Some(board.center()));
        }

        if let Some(&mv) = tactics::win_moves(board, board.current_player()).first() {
            return Ok(Some(mv));
        }
        let first_moves = self.policy.moves(board);
        if first_moves.len() == 1 {
            return Ok(Some(first_moves[0]));
        }

        self.tree.clear();
        for _ in 0..self.num_simulations {
            self.simulate(board, &first_moves, deadline)?;
        }

        Ok(self.best_first_move(board, &first_moves))
    }

    /// 首步候选中经验胜率最高的一手
    ///
    /// 同胜率取先出现者；没有任何候选被访问过时均匀随机选一个。
    pub fn best_first_move(&mut self, board: &Board, first_moves: &[Point]) -> Option<Point> {
        let root_player = board.current_player();
        let root_hash = self.zobrist.stones_hash(board);

        let mut best: Option<(f64, Point)> = None;
        for &mv in first_moves {
            let hash = root_hash ^ self.zobrist.stone_hash(root_player, mv);
            let Some(node) = self.tree.get(hash, root_player.opponent()) else {
                continue;
            };
            if node.visits == 0 {
                continue;
            }
            let rate = node.win_rate();
            if best.map_or(true, |(best_rate, _)| rate > best_rate) {
                best = Some((rate, mv));
            }
        }

        best.map(|(_, mv)| mv)
            .or_else(|| first_moves.choose(&mut *self.rng).copied())
    }

    /// 一次模拟：在私有副本上随机走到终局，再沿路径更新统计
    fn simulate(&mut self, root: &Board, first_moves: &[Point], deadline: &mut Deadline) -> Result<()> {
        let mut board = root.clone();
        let Some(&first) = first_moves.choose(&mut *self.rng) else {
            return Ok(());
        };

        let mut hash = self.zobrist.stones_hash(&board) ^ self.zobrist.stone_hash(board.current_player(), first);
        board.apply(first);
        let mut last_move = first;
        let mut path: Vec<(u64, Stone)> = Vec::new();
        let policy = self.policy;

        let result = loop {
            deadline.check()?;

            let to_play = board.current_player();
            let node = self
                .tree
                .get_or_expand(hash, to_play, || NodeStats::expand(&board, last_move, policy));
            path.push((hash, to_play));

            if let Some(terminal) = node.terminal {
                break terminal;
            }
            let mv = node.moves[self.rng.gen_range(0..node.moves.len())];

            hash ^= self.zobrist.stone_hash(to_play, mv);
            board.apply(mv);
            last_move = mv;
        };

        for (hash, to_play) in path {
            if let Some(node) = self.tree.get_mut(hash, to_play) {
                node.visits += 1;
                if result == Terminal::Won(to_play.opponent()) {
                    node.wins += 1;
                }
            }
        }
        self.simulations_run += 1;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::time::Duration;

    fn run(board: &Board, simulations: usize, seed: u64) -> (Option<Point>, MctsTree) {
        let zobrist = ZobristTable::with_seed(board.size(), seed);
        let mut tree = MctsTree::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mv = MonteCarlo::new(&zobrist, &mut tree, &mut rng, simulations)
            .search(board, &mut Deadline::unlimited())
            .unwrap();
        (mv, tree)
    }

    #[test]
    fn test_empty_board_plays_center() {
        let board = Board::new(7).unwrap();
        let (mv, tree) = run(&board, 100, 1);
        assert_eq!(mv, Some(24));
        assert!(tree.is_empty(), "空棋盘不应做模拟");
    }

    #[test]
    fn test_terminal_board_has_no_move() {
        let board = Board::from_rows(&["XXXXX", "OOOO.", ".....", ".....", "....."], Stone::White).unwrap();
        assert_eq!(run(&board, 100, 1).0, None);
    }

    #[test]
    fn test_immediate_win_skips_simulation() {
        let board = Board::from_rows(
            &["XXXX...", "OOO....", "O......", ".......", ".......", ".......", "......."],
            Stone::Black,
        )
        .unwrap();
        let (mv, tree) = run(&board, 100, 2);
        assert_eq!(mv, Some(4));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_statistics_are_bounded() {
        let mut board = Board::new(7).unwrap();
        for point in [24, 25, 17, 31] {
            board.apply(point);
        }
        let simulations = 300;
        let (mv, tree) = run(&board, simulations, 3);

        let candidates = tactics::classify(&board).moves;
        assert!(candidates.contains(&mv.unwrap()), "所选走法必须来自首步候选");
        assert!(!tree.is_empty());
        for node in tree.iter() {
            assert!(node.visits as usize <= simulations, "访问次数不能超过模拟次数");
            assert!(node.wins <= node.visits, "胜场不能超过访问次数");
        }
    }

    #[test]
    fn test_first_move_visits_sum_to_simulations() {
        let mut board = Board::new(5).unwrap();
        for point in [12, 6, 7, 13] {
            board.apply(point);
        }
        let simulations = 200;
        let zobrist = ZobristTable::with_seed(5, 9);
        let mut tree = MctsTree::new();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut mc = MonteCarlo::new(&zobrist, &mut tree, &mut rng, simulations);
        mc.search(&board, &mut Deadline::unlimited()).unwrap();
        assert_eq!(mc.simulations_run(), simulations);

        let root = zobrist.stones_hash(&board);
        let total: u32 = tactics::classify(&board)
            .moves
            .iter()
            .filter_map(|&mv| tree.get(root ^ zobrist.stone_hash(Stone::Black, mv), Stone::White))
            .map(|node| node.visits)
            .sum();
        assert_eq!(total as usize, simulations, "每次模拟恰好经过一个首步节点");
    }

    #[test]
    fn test_timeout_keeps_partial_statistics() {
        let mut board = Board::new(7).unwrap();
        board.apply(24);
        let zobrist = ZobristTable::with_seed(7, 4);
        let mut tree = MctsTree::new();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut deadline = Deadline::new(Some(Duration::ZERO), 256);

        let mut mc = MonteCarlo::new(&zobrist, &mut tree, &mut rng, 1_000_000);
        assert_eq!(mc.search(&board, &mut deadline), Err(SearchError::Timeout));

        let candidates = board.empty_points();
        let mv = mc.best_first_move(&board, &candidates).unwrap();
        assert!(candidates.contains(&mv));
    }

    #[test]
    fn test_random_playouts_respect_bounds() {
        let mut board = Board::new(5).unwrap();
        for point in [12, 6, 7, 13] {
            board.apply(point);
        }
        let simulations = 200;
        let zobrist = ZobristTable::with_seed(5, 21);
        let mut tree = MctsTree::new();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut mc = MonteCarlo::new(&zobrist, &mut tree, &mut rng, simulations).with_policy(PlayoutPolicy::Random);
        let mv = mc.search(&board, &mut Deadline::unlimited()).unwrap().unwrap();
        assert_eq!(mc.simulations_run(), simulations);

        let empty = board.empty_points();
        assert!(empty.contains(&mv), "随机策略的首步候选是全部空点");

        let root = zobrist.stones_hash(&board);
        let mut total = 0;
        for &first in &empty {
            let Some(node) = tree.get(root ^ zobrist.stone_hash(Stone::Black, first), Stone::White) else {
                continue;
            };
            total += node.visits;
            if node.terminal.is_none() {
                assert_eq!(node.moves.len(), empty.len() - 1, "随机策略展开全部空点");
            }
        }
        assert_eq!(total as usize, simulations);

        for node in tree.iter() {
            assert!(node.visits as usize <= simulations);
            assert!(node.wins <= node.visits);
        }
    }

    #[test]
    fn test_playout_policy_moves() {
        let board = Board::from_rows(&["OOOO.", ".....", ".....", "XXX..", "....."], Stone::Black).unwrap();
        assert_eq!(PlayoutPolicy::RuleBased.moves(&board), vec![4]);
        assert_eq!(PlayoutPolicy::Random.moves(&board), board.empty_points());
        assert_eq!(PlayoutPolicy::default(), PlayoutPolicy::RuleBased);
    }
}
