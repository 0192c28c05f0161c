//! Zobrist 哈希
//!
//! 用于快速计算局面的哈希值，支持增量更新。
//! 键取自 64 位随机空间，碰撞概率可忽略，不做碰撞检测。

use gomoku_board::{Board, Point, Stone, DEFAULT_BOARD_SIZE};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// 默认种子
pub const DEFAULT_ZOBRIST_SEED: u64 = 0x5EED_0F_F1FE_2024;

/// Zobrist 哈希表
///
/// 为每个落点的每种颜色生成一个随机键
pub struct ZobristTable {
    /// 棋子哈希值 [color][point]
    /// color: 0=Black, 1=White
    stones: [Vec<u64>; 2],
    /// 白方走子时额外异或的键
    side_to_move: u64,
}

impl ZobristTable {
    /// 用调用方提供的随机数发生器生成键表
    pub fn new<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let cells = size * size;
        let black = (0..cells).map(|_| rng.gen()).collect();
        let white = (0..cells).map(|_| rng.gen()).collect();

        Self {
            stones: [black, white],
            side_to_move: rng.gen(),
        }
    }

    /// 使用固定种子创建（保证确定性）
    pub fn with_seed(size: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::new(size, &mut rng)
    }

    /// 键表覆盖的格子数
    pub fn len(&self) -> usize {
        self.stones[0].len()
    }

    /// 键表是否为空
    pub fn is_empty(&self) -> bool {
        self.stones[0].is_empty()
    }

    /// 计算局面的完整哈希值（包含走子方）
    pub fn hash(&self, board: &Board) -> u64 {
        let mut hash = self.stones_hash(board);
        if board.current_player() == Stone::White {
            hash ^= self.side_to_move;
        }
        hash
    }

    /// 只对棋子计算哈希（不含走子方）
    pub fn stones_hash(&self, board: &Board) -> u64 {
        debug_assert_eq!(board.len(), self.len(), "Zobrist table built for another board size");

        let mut hash = 0u64;
        for point in 0..board.len() {
            if let Some(stone) = board.get(point) {
                hash ^= self.stone_hash(stone, point);
            }
        }
        hash
    }

    /// 获取棋子的哈希值
    #[inline]
    pub fn stone_hash(&self, stone: Stone, point: Point) -> u64 {
        self.stones[stone.index()][point]
    }

    /// 获取走子方切换的哈希值
    #[inline]
    pub fn side_hash(&self) -> u64 {
        self.side_to_move
    }

    /// 增量更新：`stone` 在 `point` 落子（或撤销）并切换走子方
    #[inline]
    pub fn toggle(&self, hash: u64, point: Point, stone: Stone) -> u64 {
        hash ^ self.stone_hash(stone, point) ^ self.side_to_move
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::with_seed(DEFAULT_BOARD_SIZE, DEFAULT_ZOBRIST_SEED)
    }
}
