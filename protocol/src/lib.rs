//! 四子棋共享协议库
//!
//! 包含:
//! - 棋盘、玩家等核心数据结构
//! - 规则判定（四连、满盘）
//! - 对局状态机 (GameState)
//! - 走法同步消息与单槽信箱
//! - 对端传输 (SyncListener, SyncChannel)

mod board;
mod constants;
mod error;
mod mailbox;
mod message;
mod player;
mod rules;
mod state;
mod transport;

pub use board::{Board, CellValue};
pub use constants::*;
pub use error::{GameError, ProtocolError, Result};
pub use mailbox::Mailbox;
pub use message::{Difficulty, SyncMessage};
pub use player::Player;
pub use rules::RuleEngine;
pub use state::{GameState, Outcome, Placement};
pub use transport::{NetworkConfig, Role, SyncChannel, SyncListener};
