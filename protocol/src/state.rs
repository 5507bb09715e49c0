//! 对局状态机
//!
//! `apply_move` 是唯一的状态转换入口：人类输入、AI 与网络收到的走法都经由它落子，
//! 保证每一步只做一次胜负判定和换手。

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Board;
use crate::error::GameError;
use crate::player::Player;
use crate::rules::RuleEngine;

/// 对局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// 进行中
    Ongoing,
    /// 某方四连获胜
    Won(Player),
    /// 棋盘下满，和棋
    Draw,
}

/// 一次成功落子的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub player: Player,
}

/// 完整的对局状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    current_turn: Player,
    outcome: Outcome,
    /// 已接受的走法（列号）
    moves: Vec<usize>,
}

impl GameState {
    /// 创建新对局：空棋盘，先手走
    pub fn new() -> Self {
        Self {
            board: Board::empty(),
            current_turn: Player::A,
            outcome: Outcome::Ongoing,
            moves: Vec::new(),
        }
    }

    /// 依次执行一串走法
    pub fn from_moves(moves: &[usize]) -> Result<Self, GameError> {
        let mut state = Self::new();
        for &col in moves {
            state.try_apply_move(col)?;
        }
        Ok(state)
    }

    /// 重新开局
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// 落子（失败时不做任何修改）
    pub fn try_apply_move(&mut self, col: usize) -> Result<Placement, GameError> {
        if self.is_terminal() {
            return Err(GameError::GameOver);
        }
        // 列满或越界时返回对应错误
        let row = self.board.lowest_open_row(col)?;
        let mover = self.current_turn;
        self.board.place(row, col, mover);
        self.moves.push(col);

        if RuleEngine::has_four_in_a_row(&self.board, mover) {
            self.outcome = Outcome::Won(mover);
        } else if self.board.is_full() {
            self.outcome = Outcome::Draw;
        } else {
            self.current_turn = mover.opponent();
        }

        debug!(col, row, player = %mover, outcome = ?self.outcome, "move applied");
        Ok(Placement { row, col, player: mover })
    }

    /// 落子，返回是否被接受
    pub fn apply_move(&mut self, col: usize) -> bool {
        match self.try_apply_move(col) {
            Ok(_) => true,
            Err(e) => {
                debug!(col, error = %e, "move rejected");
                false
            }
        }
    }

    /// 是否已结束
    pub fn is_terminal(&self) -> bool {
        self.outcome != Outcome::Ongoing
    }

    /// 对局结果
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// 当前走子方
    pub fn current_turn(&self) -> Player {
        self.current_turn
    }

    /// 棋盘（只读）
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 已接受的走法
    pub fn moves(&self) -> &[usize] {
        &self.moves
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
