//! 棋子定义

/// 落点：按行优先排列的格子索引（`row * size + col`）
pub type Point = usize;

/// 棋子颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stone {
    /// 黑方（先手）
    Black,
    /// 白方（后手）
    White,
}

impl Stone {
    /// 获取对方颜色
    pub fn opponent(&self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    /// 颜色索引（0=黑，1=白），用于哈希键表和节点槽位
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Stone::Black => 0,
            Stone::White => 1,
        }
    }

    /// 棋盘文本中的字符
    pub fn to_char(&self) -> char {
        match self {
            Stone::Black => 'X',
            Stone::White => 'O',
        }
    }

    /// 从棋盘文本字符解析
    pub fn from_char(c: char) -> Option<Stone> {
        match c {
            'X' | 'x' | 'B' | 'b' => Some(Stone::Black),
            'O' | 'o' | 'W' | 'w' => Some(Stone::White),
            _ => None,
        }
    }
}

impl std::fmt::Display for Stone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stone::Black => write!(f, "black"),
            Stone::White => write!(f, "white"),
        }
    }
}
