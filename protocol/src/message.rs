//! 消息类型定义
//!
//! 线上格式：每条消息是一个十进制列号的明文，没有长度前缀也没有分隔符。
//! 接收方把单次读取得到的全部字节当作一个整数解析；如果传输层把两条消息合并
//! 或拆开投递，解析结果就会出错。这是协议已知的缺陷，此处保留原样。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// AI 难度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 简单：随机落子
    Easy,
    /// 中等：一步取胜/一步防守，否则随机
    #[default]
    Medium,
    /// 困难：Alpha-Beta 剪枝的 Minimax
    Hard,
}

impl Difficulty {
    /// 循环切换到下一个难度
    pub fn next(&self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "unknown difficulty '{}' (expected easy, medium or hard)",
                other
            )),
        }
    }
}

/// 对端之间传递的走法消息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncMessage {
    column: usize,
}

impl SyncMessage {
    pub fn new(column: usize) -> Self {
        Self { column }
    }

    /// 列号
    pub fn column(&self) -> usize {
        self.column
    }

    /// 编码为十进制文本
    pub fn encode(&self) -> String {
        self.column.to_string()
    }

    /// 把单次读取到的字节解析为一条消息
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|_| ProtocolError::InvalidMessage {
            raw: String::from_utf8_lossy(bytes).into_owned(),
        })?;
        let column = text
            .trim()
            .parse::<usize>()
            .map_err(|_| ProtocolError::InvalidMessage {
                raw: text.to_string(),
            })?;
        Ok(Self { column })
    }
}
