//! 规则判定
//!
//! 每次都扫描整个棋盘，不做增量记录，因此同样适用于搜索中的假想棋盘。

use crate::board::Board;
use crate::constants::{COLS, CONNECT, ROWS};
use crate::player::Player;

/// 四个检查方向：(行增量, 列增量)
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// 规则引擎
pub struct RuleEngine;

impl RuleEngine {
    /// 该列是否可以落子
    pub fn is_valid_move(board: &Board, col: usize) -> bool {
        board.is_column_open(col)
    }

    /// 是否存在指定玩家的四连
    pub fn has_four_in_a_row(board: &Board, player: Player) -> bool {
        Self::winning_line(board, player).is_some()
    }

    /// 查找第一条四连，返回其四个格子的 (row, col)
    pub fn winning_line(board: &Board, player: Player) -> Option<[(usize, usize); CONNECT]> {
        for row in 0..ROWS {
            for col in 0..COLS {
                for &(dr, dc) in &DIRECTIONS {
                    if let Some(line) = Self::line_from(board, player, row, col, dr, dc) {
                        return Some(line);
                    }
                }
            }
        }
        None
    }

    /// 以 (row, col) 为起点沿方向检查连续 CONNECT 个棋子
    fn line_from(
        board: &Board,
        player: Player,
        row: usize,
        col: usize,
        dr: isize,
        dc: isize,
    ) -> Option<[(usize, usize); CONNECT]> {
        let mut line = [(0, 0); CONNECT];
        for (step, slot) in line.iter_mut().enumerate() {
            let r = row as isize + dr * step as isize;
            let c = col as isize + dc * step as isize;
            if r < 0 || c < 0 || r >= ROWS as isize || c >= COLS as isize {
                return None;
            }
            let (r, c) = (r as usize, c as usize);
            if board.cell(r, c) != Some(player) {
                return None;
            }
            *slot = (r, c);
        }
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 从锚点沿方向种下一条四连
    fn plant(player: Player, row: usize, col: usize, dr: isize, dc: isize) -> Board {
        let mut board = Board::empty();
        for step in 0..CONNECT as isize {
            let r = (row as isize + dr * step) as usize;
            let c = (col as isize + dc * step) as usize;
            board.set(r, c, Some(player));
        }
        board
    }

    fn anchors(dr: isize, dc: isize) -> Vec<(usize, usize)> {
        let span = CONNECT as isize - 1;
        let mut result = Vec::new();
        for row in 0..ROWS as isize {
            for col in 0..COLS as isize {
                let end_r = row + dr * span;
                let end_c = col + dc * span;
                if end_r >= 0 && end_r < ROWS as isize && end_c >= 0 && end_c < COLS as isize {
                    result.push((row as usize, col as usize));
                }
            }
        }
        result
    }

    #[test]
    fn test_planted_runs_every_orientation_and_anchor() {
        for &(dr, dc) in &DIRECTIONS {
            let anchors = anchors(dr, dc);
            assert!(!anchors.is_empty());
            for (row, col) in anchors {
                for player in [Player::A, Player::B] {
                    let board = plant(player, row, col, dr, dc);
                    assert!(
                        RuleEngine::has_four_in_a_row(&board, player),
                        "missed run at ({}, {}) dir ({}, {})",
                        row, col, dr, dc
                    );
                    assert!(!RuleEngine::has_four_in_a_row(&board, player.opponent()));
                }
            }
        }
    }

    #[test]
    fn test_anchor_counts() {
        // 横向 6*4，纵向 3*7，两条斜向各 3*4
        assert_eq!(anchors(0, 1).len(), 24);
        assert_eq!(anchors(1, 0).len(), 21);
        assert_eq!(anchors(1, 1).len(), 12);
        assert_eq!(anchors(1, -1).len(), 12);
    }

    #[test]
    fn test_three_is_not_enough() {
        for &(dr, dc) in &DIRECTIONS {
            for (row, col) in anchors(dr, dc) {
                let mut board = plant(Player::A, row, col, dr, dc);
                // 移除最后一颗，只剩三连
                let r = (row as isize + dr * 3) as usize;
                let c = (col as isize + dc * 3) as usize;
                board.set(r, c, None);
                assert!(!RuleEngine::has_four_in_a_row(&board, Player::A));
            }
        }
    }

    #[test]
    fn test_broken_run() {
        let board = Board::from_diagram(
            "\
            .......
            .......
            .......
            .......
            .......
            RRYRR..",
        )
        .unwrap();
        assert!(!RuleEngine::has_four_in_a_row(&board, Player::A));
        assert!(!RuleEngine::has_four_in_a_row(&board, Player::B));
    }

    #[test]
    fn test_winning_line_cells() {
        let board = plant(Player::B, 0, 6, 1, -1);
        let line = RuleEngine::winning_line(&board, Player::B).unwrap();
        assert_eq!(line, [(0, 6), (1, 5), (2, 4), (3, 3)]);
    }

    #[test]
    fn test_is_valid_move() {
        let mut board = Board::empty();
        assert!(RuleEngine::is_valid_move(&board, 0));
        for row in 0..ROWS {
            board.place(row, 0, Player::A);
        }
        assert!(!RuleEngine::is_valid_move(&board, 0));
        assert!(!RuleEngine::is_valid_move(&board, COLS));
    }
}
