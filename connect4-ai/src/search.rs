//! 搜索引擎
//!
//! 三种可互换的策略，按难度选择：
//! - Easy: 在可落子的列中均匀随机
//! - Medium: 一步取胜，否则一步防守，否则随机
//! - Hard: 固定深度的 Minimax + Alpha-Beta 剪枝
//!
//! 所有策略只负责选列，落子必须由调用方通过 `GameState::apply_move` 完成。

use protocol::{Board, Difficulty, GameState, Player, RuleEngine};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::evaluate::Evaluator;
use crate::trial::Trial;

/// 困难模式在根节点之下的搜索层数
pub const DEFAULT_SEARCH_DEPTH: u8 = 3;

/// AI 配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// 根节点落子之后继续展开的层数
    pub search_depth: u8,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            search_depth: DEFAULT_SEARCH_DEPTH,
        }
    }
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    rng: ChaCha8Rng,
    nodes_searched: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::from_entropy(),
            nodes_searched: 0,
        }
    }

    /// 使用固定种子（结果可复现）
    pub fn with_seed(config: AiConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            nodes_searched: 0,
        }
    }

    /// 为当前走子方选择一列
    ///
    /// 对局已结束或无列可下时返回 None。不修改 `state`。
    pub fn choose_move(&mut self, state: &GameState, difficulty: Difficulty) -> Option<usize> {
        if state.is_terminal() {
            return None;
        }

        self.nodes_searched = 0;
        let me = state.current_turn();
        // 搜索在棋盘快照上进行
        let mut board = state.board().clone();

        let col = match difficulty {
            Difficulty::Easy => self.random_move(&board),
            Difficulty::Medium => self.greedy_move(&mut board, me),
            Difficulty::Hard => self.minimax_move(&mut board, me),
        };

        debug!(
            ?difficulty,
            player = %me,
            col = ?col,
            nodes = self.nodes_searched,
            "AI chose column"
        );
        col
    }

    /// 随机选择一列
    fn random_move(&mut self, board: &Board) -> Option<usize> {
        board.open_columns().choose(&mut self.rng).copied()
    }

    /// 一步取胜，否则一步防守，否则随机
    ///
    /// 先检查己方取胜，再检查防守：两者同时存在时总是取胜。
    fn greedy_move(&mut self, board: &mut Board, me: Player) -> Option<usize> {
        let open = board.open_columns();

        for &col in &open {
            if let Some(trial) = Trial::place(board, col, me) {
                if RuleEngine::has_four_in_a_row(&trial, me) {
                    return Some(col);
                }
            }
        }

        let opponent = me.opponent();
        for &col in &open {
            if let Some(trial) = Trial::place(board, col, opponent) {
                if RuleEngine::has_four_in_a_row(&trial, opponent) {
                    return Some(col);
                }
            }
        }

        self.random_move(board)
    }

    /// 根节点：逐列落子并取 Minimax 值最大的列，同分取先出现的（列号最小）
    fn minimax_move(&mut self, board: &mut Board, me: Player) -> Option<usize> {
        let depth = self.config.search_depth;
        let mut best: Option<(usize, i32)> = None;

        for col in board.open_columns() {
            let score = {
                let Some(mut trial) = Trial::place(board, col, me) else {
                    continue;
                };
                self.minimax(&mut trial, depth, i32::MIN, i32::MAX, false, me)
            };
            debug!(col, score, "root move evaluated");

            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((col, score));
            }
        }

        match best {
            Some((col, _)) => Some(col),
            // 不应出现：调用方已确认棋盘未满
            None => self.random_move(board),
        }
    }

    /// Minimax + Alpha-Beta 剪枝
    fn minimax(
        &mut self,
        board: &mut Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        me: Player,
    ) -> i32 {
        self.nodes_searched += 1;

        if depth == 0 || Evaluator::is_terminal(board) {
            return Evaluator::evaluate(board, me);
        }

        let mover = if maximizing { me } else { me.opponent() };
        let mut value = if maximizing { i32::MIN } else { i32::MAX };

        for col in board.open_columns() {
            let Some(mut trial) = Trial::place(board, col, mover) else {
                continue;
            };
            let score = self.minimax(&mut trial, depth - 1, alpha, beta, !maximizing, me);
            drop(trial);

            if maximizing {
                value = value.max(score);
                alpha = alpha.max(value);
            } else {
                value = value.min(score);
                beta = beta.min(value);
            }
            if alpha >= beta {
                break;
            }
        }

        value
    }

    /// 上一次搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}

impl Default for AiEngine {
    fn default() -> Self {
        Self::new(AiConfig::default())
    }
}
