//! 四子棋 AI 引擎
//!
//! 包含:
//! - 随机策略
//! - 一步取胜/防守策略
//! - Minimax + Alpha-Beta 搜索
//! - 只看胜负的叶节点评估

mod evaluate;
mod search;
mod trial;

pub use evaluate::{Evaluator, WIN_SCORE};
pub use search::{AiConfig, AiEngine, DEFAULT_SEARCH_DEPTH};

// 重导出 Difficulty 以便外部使用
pub use protocol::Difficulty;
