//! 协议常量定义

/// 棋盘行数
pub const ROWS: usize = 6;

/// 棋盘列数
pub const COLS: usize = 7;

/// 连成一线获胜所需的棋子数
pub const CONNECT: usize = 4;

/// 默认端口（主机可在启动时覆盖）
pub const DEFAULT_PORT: u16 = 5555;

/// 默认对端地址
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// 主机监听地址
pub const LISTEN_HOST: &str = "0.0.0.0";

/// 单次读取的最大字节数
pub const RECV_BUFFER_SIZE: usize = 1024;
