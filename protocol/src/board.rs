//! 棋盘状态
//!
//! 行号从底部开始：第 0 行是最底层。每一列的棋子总是从第 0 行起连续向上堆叠，
//! 这一点由"只写入最低空位"的落子方式保证。

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{COLS, ROWS};
use crate::error::GameError;
use crate::player::Player;

/// 格子的值（`None` 表示空）
pub type CellValue = Option<Player>;

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// 6x7 棋盘，索引为 [row][col]
    cells: [[CellValue; COLS]; ROWS],
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            cells: [[None; COLS]; ROWS],
        }
    }

    /// 获取指定位置的棋子（越界返回空）
    pub fn cell(&self, row: usize, col: usize) -> CellValue {
        if row < ROWS && col < COLS {
            self.cells[row][col]
        } else {
            None
        }
    }

    /// 写入指定位置（不检查规则）
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        if row < ROWS && col < COLS {
            self.cells[row][col] = value;
        }
    }

    /// 放置棋子（调用方保证位置合法）
    pub fn place(&mut self, row: usize, col: usize, player: Player) {
        self.set(row, col, Some(player));
    }

    /// 该列顶格是否为空
    pub fn is_column_open(&self, col: usize) -> bool {
        col < COLS && self.cells[ROWS - 1][col].is_none()
    }

    /// 从底部向上查找该列的最低空位
    pub fn lowest_open_row(&self, col: usize) -> Result<usize, GameError> {
        if col >= COLS {
            return Err(GameError::ColumnOutOfRange { col });
        }
        (0..ROWS)
            .find(|&row| self.cells[row][col].is_none())
            .ok_or(GameError::ColumnFull { col })
    }

    /// 所有可落子的列（升序）
    pub fn open_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| self.is_column_open(col)).collect()
    }

    /// 每一列顶格都已被占据
    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| !self.is_column_open(col))
    }

    /// 从文本图示解析棋盘
    ///
    /// 每行一排，最上面一行是最高层；`.` 为空，`R`/`Y` 为双方棋子。
    /// 空白行和行内空格会被忽略。悬空的棋子视为无效。
    pub fn from_diagram(diagram: &str) -> Result<Self, GameError> {
        let rows: Vec<Vec<char>> = diagram
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();

        if rows.len() != ROWS {
            return Err(GameError::InvalidDiagram {
                reason: format!("Expected {} rows, got {}", ROWS, rows.len()),
            });
        }

        let mut board = Self::empty();
        for (line_idx, chars) in rows.iter().enumerate() {
            if chars.len() != COLS {
                return Err(GameError::InvalidDiagram {
                    reason: format!("Row {} has {} cells, expected {}", line_idx, chars.len(), COLS),
                });
            }
            let row = ROWS - 1 - line_idx;
            for (col, &c) in chars.iter().enumerate() {
                let value = match c {
                    '.' => None,
                    _ => Some(Player::from_char(c).ok_or_else(|| GameError::InvalidDiagram {
                        reason: format!("Unknown cell '{}'", c),
                    })?),
                };
                board.set(row, col, value);
            }
        }

        // 重力规则：不允许悬空
        for col in 0..COLS {
            for row in 1..ROWS {
                if board.cells[row][col].is_some() && board.cells[row - 1][col].is_none() {
                    return Err(GameError::InvalidDiagram {
                        reason: format!("Floating piece at row {}, column {}", row, col),
                    });
                }
            }
        }

        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for col in 0..COLS {
                let c = self.cells[row][col].map_or('.', |p| p.to_char());
                write!(f, "{}", c)?;
            }
            if row > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board() {
        let board = Board::empty();
        assert!((0..ROWS).all(|row| (0..COLS).all(|col| board.cell(row, col).is_none())));
        assert!(!board.is_full());
        assert_eq!(board.open_columns(), (0..COLS).collect::<Vec<_>>());
        assert_eq!(board.lowest_open_row(3), Ok(0));
    }

    #[test]
    fn test_gravity() {
        let mut board = Board::empty();
        for expected in 0..ROWS {
            let row = board.lowest_open_row(2).unwrap();
            assert_eq!(row, expected);
            board.place(row, 2, Player::A);
        }
        assert!(!board.is_column_open(2));
        assert_eq!(board.lowest_open_row(2), Err(GameError::ColumnFull { col: 2 }));
    }

    #[test]
    fn test_out_of_range_column() {
        let board = Board::empty();
        assert!(!board.is_column_open(COLS));
        assert_eq!(
            board.lowest_open_row(COLS),
            Err(GameError::ColumnOutOfRange { col: COLS })
        );
        assert_eq!(board.cell(ROWS, 0), None);
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::empty();
        for col in 0..COLS {
            for row in 0..ROWS {
                board.place(row, col, if (row + col) % 2 == 0 { Player::A } else { Player::B });
            }
        }
        assert!(board.is_full());
        assert!(board.open_columns().is_empty());
    }

    #[test]
    fn test_diagram_roundtrip() {
        let diagram = "\
            .......
            .......
            .......
            ...Y...
            ..RR...
            .YRYR..";
        let board = Board::from_diagram(diagram).unwrap();
        assert_eq!(board.cell(0, 1), Some(Player::B));
        assert_eq!(board.cell(0, 2), Some(Player::A));
        assert_eq!(board.cell(2, 3), Some(Player::B));
        assert_eq!(board.cell(2, 2), None);

        let rendered = board.to_string();
        assert_eq!(Board::from_diagram(&rendered).unwrap(), board);
    }

    #[test]
    fn test_diagram_rejects_floating_piece() {
        let diagram = "\
            .......
            .......
            .......
            .......
            ...R...
            .......";
        assert!(matches!(
            Board::from_diagram(diagram),
            Err(GameError::InvalidDiagram { .. })
        ));
    }

    #[test]
    fn test_diagram_rejects_wrong_shape() {
        assert!(Board::from_diagram("....\n....").is_err());
        assert!(Board::from_diagram(".......\n.......\n.......\n.......\n.......\n..X....").is_err());
    }
}
