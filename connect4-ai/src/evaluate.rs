//! 叶节点评估
//!
//! 只看胜负，不做任何局面打分。

use protocol::{Board, Player, RuleEngine};

/// 获胜局面的分值
pub const WIN_SCORE: i32 = 100_000;

/// 评估器
pub struct Evaluator;

impl Evaluator {
    /// 站在 `maximizer` 视角评估：己方四连 +WIN_SCORE，对方四连 -WIN_SCORE，否则 0
    pub fn evaluate(board: &Board, maximizer: Player) -> i32 {
        if RuleEngine::has_four_in_a_row(board, maximizer) {
            WIN_SCORE
        } else if RuleEngine::has_four_in_a_row(board, maximizer.opponent()) {
            -WIN_SCORE
        } else {
            0
        }
    }

    /// 任一方四连或棋盘已满
    pub fn is_terminal(board: &Board) -> bool {
        RuleEngine::has_four_in_a_row(board, Player::A)
            || RuleEngine::has_four_in_a_row(board, Player::B)
            || board.is_full()
    }
}
