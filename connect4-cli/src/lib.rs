//! 四子棋客户端
//!
//! 包含配置加载、对局会话（本地、人机、联机）以及基于 ratatui 的终端界面。

pub mod app;
pub mod config;
pub mod session;
pub mod ui;

pub use app::{App, CrosstermEvents, EventSource, Launch};
pub use config::{AppConfig, ConfigError};
pub use session::{Mode, Session, Status};
