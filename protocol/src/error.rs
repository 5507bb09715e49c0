//! 错误类型定义

use thiserror::Error;

/// 对局规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// 列号越界
    #[error("Column {col} is out of range")]
    ColumnOutOfRange { col: usize },

    /// 该列已满
    #[error("Column {col} is full")]
    ColumnFull { col: usize },

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,

    /// 无效的棋盘图示
    #[error("Invalid board diagram: {reason}")]
    InvalidDiagram { reason: String },
}

/// 协议错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 无法监听端口
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// 无法连接对端
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// 连接已关闭
    #[error("Connection closed")]
    ConnectionClosed,

    /// 无法解析的消息
    #[error("Invalid message: {raw:?}")]
    InvalidMessage { raw: String },
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_error_display() {
        let err = GameError::ColumnFull { col: 3 };
        assert_eq!(err.to_string(), "Column 3 is full");

        let err = GameError::ColumnOutOfRange { col: 9 };
        assert_eq!(err.to_string(), "Column 9 is out of range");
    }

    #[test]
    fn test_invalid_message_display() {
        let err = ProtocolError::InvalidMessage { raw: "x1".to_string() };
        assert_eq!(err.to_string(), "Invalid message: \"x1\"");
    }
}
