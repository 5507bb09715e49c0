//! 试探落子
//!
//! 搜索时直接在棋盘上落子、递归、再撤销。撤销放在 Drop 里，
//! 无论正常返回还是展开（unwind），离开作用域时棋盘都会复原。

use std::ops::{Deref, DerefMut};

use protocol::{Board, Player};

/// 一次尚未撤销的试探落子
pub(crate) struct Trial<'a> {
    board: &'a mut Board,
    row: usize,
    col: usize,
}

impl<'a> Trial<'a> {
    /// 在该列最低空位放置棋子；列满或越界时返回 None
    pub(crate) fn place(board: &'a mut Board, col: usize, player: Player) -> Option<Self> {
        let row = board.lowest_open_row(col).ok()?;
        board.place(row, col, player);
        Some(Self { board, row, col })
    }
}

impl Deref for Trial<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl DerefMut for Trial<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        &mut *self.board
    }
}

impl Drop for Trial<'_> {
    fn drop(&mut self) {
        self.board.set(self.row, self.col, None);
    }
}
