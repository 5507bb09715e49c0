//! 对局会话
//!
//! 驱动循环的核心逻辑，不涉及任何输入输出：本地落子、电脑回合、
//! 从网络信箱取出对方走法，全部经由 `GameState::apply_move` 落子。

use std::fmt;

use connect4_ai::AiEngine;
use protocol::{Difficulty, GameState, Outcome, Player, Role, SyncChannel};
use tracing::{debug, info};

/// 游戏模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 本地双人（同一终端）
    Local,
    /// 人机对战：人类执先手，电脑执后手
    VsComputer(Difficulty),
    /// 联网对战：主机执先手，客机执后手
    Online(Role),
}

impl Mode {
    /// 是否是联网模式
    pub fn is_online(&self) -> bool {
        matches!(self, Mode::Online(_))
    }

    /// 本端操作的一方（本地双人时为 None，表示双方都由本端操作）
    pub fn local_player(&self) -> Option<Player> {
        match self {
            Mode::Local => None,
            Mode::VsComputer(_) | Mode::Online(Role::Host) => Some(Player::A),
            Mode::Online(Role::Guest) => Some(Player::B),
        }
    }
}

/// 状态栏
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 轮到某方（本端操作）
    Turn(Player),
    /// 电脑正在走
    ComputerThinking,
    /// 等待网络对手
    WaitingForOpponent,
    Won(Player),
    Draw,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Turn(player) => write!(f, "{}'s turn", player),
            Status::ComputerThinking => f.write_str("AI's turn"),
            Status::WaitingForOpponent => f.write_str("Waiting for opponent..."),
            Status::Won(player) => write!(f, "{} wins!", player),
            Status::Draw => f.write_str("It's a draw!"),
        }
    }
}

/// 对局会话
pub struct Session {
    state: GameState,
    mode: Mode,
    engine: AiEngine,
    channel: Option<SyncChannel>,
}

impl Session {
    /// 本地双人
    pub fn local() -> Self {
        Self {
            state: GameState::new(),
            mode: Mode::Local,
            engine: AiEngine::default(),
            channel: None,
        }
    }

    /// 人机对战
    pub fn vs_computer(difficulty: Difficulty, engine: AiEngine) -> Self {
        Self {
            state: GameState::new(),
            mode: Mode::VsComputer(difficulty),
            engine,
            channel: None,
        }
    }

    /// 联网对战，角色由通道决定
    pub fn online(channel: SyncChannel) -> Self {
        Self {
            state: GameState::new(),
            mode: Mode::Online(channel.role()),
            engine: AiEngine::default(),
            channel: Some(channel),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// 当前是否轮到本端输入
    pub fn is_local_turn(&self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        match self.mode.local_player() {
            None => true,
            Some(player) => player == self.state.current_turn(),
        }
    }

    /// 本端落子；联网模式下被接受的走法会发送给对方
    pub async fn play_local(&mut self, col: usize) -> bool {
        if !self.is_local_turn() {
            debug!(col, "not the local side's turn");
            return false;
        }
        if !self.state.apply_move(col) {
            return false;
        }

        if let Some(channel) = self.channel.as_mut() {
            channel.send(col).await;
        }
        self.on_move_applied();
        true
    }

    /// 处理一帧非本端的工作，返回本帧落下的列
    ///
    /// 人机模式下电脑回合会选列并落子；联网模式下取出信箱中的走法交给
    /// `apply_move`（不检查是否轮到对方，非法走法会被直接拒绝）。从不阻塞。
    pub fn tick(&mut self) -> Option<usize> {
        if self.state.is_terminal() {
            return None;
        }

        let col = match self.mode {
            Mode::Local => None,
            Mode::VsComputer(difficulty) => {
                if self.is_local_turn() {
                    None
                } else {
                    self.engine.choose_move(&self.state, difficulty)
                }
            }
            Mode::Online(_) => self.channel.as_ref().and_then(|c| c.poll_inbound()),
        }?;

        if !self.state.apply_move(col) {
            debug!(col, "incoming move rejected");
            return None;
        }
        self.on_move_applied();
        Some(col)
    }

    /// 状态栏内容
    pub fn status(&self) -> Status {
        match self.state.outcome() {
            Outcome::Won(player) => Status::Won(player),
            Outcome::Draw => Status::Draw,
            Outcome::Ongoing => {
                let turn = self.state.current_turn();
                match self.mode {
                    _ if self.is_local_turn() => Status::Turn(turn),
                    Mode::Online(_) => Status::WaitingForOpponent,
                    _ => Status::ComputerThinking,
                }
            }
        }
    }

    /// 联网对局不支持重开（没有重连）
    pub fn can_reset(&self) -> bool {
        !self.mode.is_online()
    }

    /// 重新开局，返回是否成功
    pub fn reset(&mut self) -> bool {
        if !self.can_reset() {
            return false;
        }
        self.state.reset();
        true
    }

    fn on_move_applied(&self) {
        if !self.state.is_terminal() {
            return;
        }
        info!(outcome = ?self.state.outcome(), moves = self.state.moves().len(), "game over");
        if let Some(channel) = &self.channel {
            channel.mark_game_over();
        }
    }
}
