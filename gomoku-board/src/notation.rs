//! 坐标表示法
//!
//! 列用字母（跳过 I），行用从 1 开始的数字，首行为 1。
//! 例如 7 路棋盘的中心点为 `D4`。

use crate::constants::COLUMN_LETTERS;
use crate::error::{BoardError, Result};
use crate::stone::Point;

/// 将落点格式化为坐标（如 `D4`）
pub fn format_point(point: Point, size: usize) -> String {
    let (row, col) = (point / size, point % size);
    let letter = COLUMN_LETTERS.chars().nth(col).unwrap_or('?');
    format!("{}{}", letter, row + 1)
}

/// 解析坐标为落点，大小写不敏感
pub fn parse_point(text: &str, size: usize) -> Result<Point> {
    let invalid = || BoardError::InvalidNotation {
        text: text.to_string(),
    };

    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    let letter = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
    let col = COLUMN_LETTERS.chars().position(|c| c == letter).ok_or_else(invalid)?;
    let row: usize = chars.as_str().parse().map_err(|_| invalid())?;

    if col >= size || row == 0 || row > size {
        return Err(invalid());
    }
    Ok((row - 1) * size + col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_point() {
        assert_eq!(format_point(0, 7), "A1");
        assert_eq!(format_point(24, 7), "D4");
        assert_eq!(format_point(48, 7), "G7");
    }

    #[test]
    fn test_column_skips_i() {
        assert_eq!(format_point(8, 9), "J1");
        assert_eq!(parse_point("j1", 9), Ok(8));
        assert!(parse_point("I1", 9).is_err());
    }

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("D4", 7), Ok(24));
        assert_eq!(parse_point(" a1 ", 7), Ok(0));
        assert!(parse_point("H1", 7).is_err());
        assert!(parse_point("A0", 7).is_err());
        assert!(parse_point("A8", 7).is_err());
        assert!(parse_point("", 7).is_err());
        assert!(parse_point("pass", 7).is_err());
    }
}
