//! 玩家定义

use std::fmt;

use serde::{Deserialize, Serialize};

/// 玩家
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// 先手（红）
    A,
    /// 后手（黄）
    B,
}

impl Player {
    /// 获取对手
    pub fn opponent(&self) -> Player {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// 显示名称
    pub fn name(&self) -> &'static str {
        match self {
            Player::A => "Red",
            Player::B => "Yellow",
        }
    }

    /// 棋盘图示中的字符
    pub fn to_char(&self) -> char {
        match self {
            Player::A => 'R',
            Player::B => 'Y',
        }
    }

    /// 从棋盘图示字符解析
    pub fn from_char(c: char) -> Option<Player> {
        match c {
            'R' | 'r' => Some(Player::A),
            'Y' | 'y' => Some(Player::B),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Player::A.opponent(), Player::B);
        assert_eq!(Player::B.opponent(), Player::A);
    }

    #[test]
    fn test_char_conversion() {
        for player in [Player::A, Player::B] {
            assert_eq!(Player::from_char(player.to_char()), Some(player));
        }
        assert_eq!(Player::from_char('.'), None);
    }
}
