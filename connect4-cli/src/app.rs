//! 交互式前端
//!
//! 单一的帧循环：每帧最多读取一个按键、推进一次会话（电脑落子或取出
//! 网络信箱）、重绘一次。任何画面下 Esc 都能返回菜单，网络连接的建立
//! 也在后台任务里进行，不会卡住界面。

use std::io;
use std::mem;
use std::time::{Duration, Instant};

use anyhow::Result;
use connect4_ai::AiEngine;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use protocol::{Difficulty, SyncChannel, COLS};
use ratatui::{backend::Backend, Frame, Terminal};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::session::{Mode, Session};
use crate::ui::{self, MenuChoice};

/// 帧间隔（约 60 帧）
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// 直接进入的对局类型（跳过菜单）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    Local,
    VsComputer(Difficulty),
    Host { port: u16 },
    Join { host: String, port: u16 },
}

/// 按键来源
pub trait EventSource {
    /// 最多等待 `timeout`，期间没有按键时返回 None
    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>>;
}

/// 从终端读取按键
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Some(key));
                }
            }
        }
        Ok(None)
    }
}

/// 对局中的界面状态
struct GameView {
    session: Session,
    selected_column: usize,
    /// 电脑预定的落子时刻
    ai_due: Option<Instant>,
}

impl GameView {
    fn new(session: Session) -> Self {
        Self {
            session,
            selected_column: COLS / 2,
            ai_due: None,
        }
    }
}

enum Screen {
    Menu { selected: usize },
    JoinPrompt { input: String },
    Connecting {
        label: String,
        failure: &'static str,
        task: JoinHandle<protocol::Result<SyncChannel>>,
    },
    Game(GameView),
}

pub struct App {
    config: AppConfig,
    runtime: Runtime,
    difficulty: Difficulty,
    screen: Screen,
    message: Option<String>,
    should_quit: bool,
}

impl App {
    /// 运行时必须是多线程的：接收任务要在主线程等待按键时继续读取
    pub fn new(config: AppConfig, runtime: Runtime) -> Self {
        let difficulty = config.difficulty;
        Self {
            config,
            runtime,
            difficulty,
            screen: Screen::Menu { selected: 0 },
            message: None,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// 主循环
    pub fn run<B: Backend, E: EventSource>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut E,
    ) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;
            let key = events.next_key(FRAME_INTERVAL)?;
            self.step(key);
        }
        Ok(())
    }

    /// 一帧：处理按键，再推进后台工作
    pub fn step(&mut self, key: Option<KeyEvent>) {
        if let Some(key) = key {
            self.handle_key(key);
        }
        self.update();
    }

    /// 离开菜单，进入对局或开始建立连接
    pub fn launch(&mut self, launch: Launch) {
        self.screen = match launch {
            Launch::Local => Screen::Game(GameView::new(Session::local())),
            Launch::VsComputer(difficulty) => Screen::Game(GameView::new(Session::vs_computer(
                difficulty,
                AiEngine::new(self.config.ai),
            ))),
            Launch::Host { port } => Screen::Connecting {
                label: format!("Waiting for opponent on port {}...", port),
                failure: "Could not host game!",
                task: self.runtime.spawn(SyncChannel::start_host(port)),
            },
            Launch::Join { host, port } => Screen::Connecting {
                label: format!("Connecting to {}:{}...", host, port),
                failure: "Connection failed!",
                task: self
                    .runtime
                    .spawn(async move { SyncChannel::connect(&host, port).await }),
            },
        };
    }

    pub fn render(&self, frame: &mut Frame) {
        let message = self.message.as_deref();
        match &self.screen {
            Screen::Menu { selected } => ui::render_menu(frame, self.difficulty, *selected, message),
            Screen::JoinPrompt { input } => ui::render_join_prompt(frame, input),
            Screen::Connecting { label, .. } => ui::render_connecting(frame, label),
            Screen::Game(view) => {
                ui::render_game(frame, &view.session, view.selected_column, message)
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.message = None;

        match mem::replace(&mut self.screen, Screen::Menu { selected: 0 }) {
            Screen::Menu { selected } => self.menu_key(selected, key.code),
            Screen::JoinPrompt { input } => self.join_prompt_key(input, key.code),
            Screen::Connecting { label, failure, task } => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => {
                    task.abort();
                    info!("Connection attempt cancelled");
                }
                _ => self.screen = Screen::Connecting { label, failure, task },
            },
            Screen::Game(view) => self.game_key(view, key.code),
        }
    }

    fn menu_key(&mut self, selected: usize, code: KeyCode) {
        let count = MenuChoice::ALL.len();
        let choice = match code {
            KeyCode::Up => {
                self.screen = Screen::Menu { selected: (selected + count - 1) % count };
                return;
            }
            KeyCode::Down => {
                self.screen = Screen::Menu { selected: (selected + 1) % count };
                return;
            }
            KeyCode::Enter => MenuChoice::ALL[selected],
            KeyCode::Esc => MenuChoice::Quit,
            KeyCode::Char(c) => match MenuChoice::from_hotkey(c) {
                Some(choice) => choice,
                None => {
                    self.screen = Screen::Menu { selected };
                    return;
                }
            },
            _ => {
                self.screen = Screen::Menu { selected };
                return;
            }
        };

        match choice {
            MenuChoice::Local => self.launch(Launch::Local),
            MenuChoice::VsComputer => self.launch(Launch::VsComputer(self.difficulty)),
            MenuChoice::Host => self.launch(Launch::Host {
                port: self.config.network.port,
            }),
            MenuChoice::Join => {
                self.screen = Screen::JoinPrompt {
                    input: String::new(),
                }
            }
            MenuChoice::CycleDifficulty => {
                self.difficulty = self.difficulty.next();
                self.screen = Screen::Menu { selected };
            }
            MenuChoice::Quit => self.should_quit = true,
        }
    }

    fn join_prompt_key(&mut self, mut input: String, code: KeyCode) {
        match code {
            KeyCode::Esc => {}
            KeyCode::Enter => {
                let host = match input.trim() {
                    "" => self.config.network.host.clone(),
                    h => h.to_string(),
                };
                let port = self.config.network.port;
                self.launch(Launch::Join { host, port });
            }
            KeyCode::Backspace => {
                input.pop();
                self.screen = Screen::JoinPrompt { input };
            }
            KeyCode::Char(c) if !c.is_control() => {
                input.push(c);
                self.screen = Screen::JoinPrompt { input };
            }
            _ => self.screen = Screen::JoinPrompt { input },
        }
    }

    fn game_key(&mut self, mut view: GameView, code: KeyCode) {
        match code {
            // 联网对局中途离开：对方的接收任务会在连接关闭后退出
            KeyCode::Esc | KeyCode::Char('q') => {
                info!(mode = ?view.session.mode(), "Left game");
                return;
            }
            KeyCode::Left => view.selected_column = view.selected_column.saturating_sub(1),
            KeyCode::Right => view.selected_column = (view.selected_column + 1).min(COLS - 1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let col = view.selected_column;
                self.drop_piece(&mut view, col);
            }
            KeyCode::Char(c @ '1'..='7') => {
                let col = c as usize - '1' as usize;
                view.selected_column = col;
                self.drop_piece(&mut view, col);
            }
            KeyCode::Char('r') => {
                if view.session.state().is_terminal() && view.session.reset() {
                    view.ai_due = None;
                    self.message = Some("New game started!".to_string());
                }
            }
            _ => {}
        }
        self.screen = Screen::Game(view);
    }

    fn drop_piece(&mut self, view: &mut GameView, col: usize) {
        let session = &mut view.session;
        if session.state().is_terminal() {
            let hint = if session.can_reset() {
                "Game over! Press R to restart."
            } else {
                "Game over! Press Esc for menu."
            };
            self.message = Some(hint.to_string());
            return;
        }
        if !session.is_local_turn() {
            self.message = Some("Not your turn!".to_string());
            return;
        }
        if !self.runtime.block_on(session.play_local(col)) {
            self.message = Some(format!("Column {} is full!", col + 1));
        }
    }

    /// 每帧的后台推进
    fn update(&mut self) {
        match mem::replace(&mut self.screen, Screen::Menu { selected: 0 }) {
            Screen::Connecting { label, failure, task } => {
                if !task.is_finished() {
                    self.screen = Screen::Connecting { label, failure, task };
                    return;
                }
                match self.runtime.block_on(task) {
                    Ok(Ok(channel)) => {
                        self.screen = Screen::Game(GameView::new(Session::online(channel)));
                    }
                    Ok(Err(e)) => {
                        warn!("{}: {}", failure, e);
                        self.message = Some(failure.to_string());
                    }
                    Err(e) => {
                        warn!("{}: {}", failure, e);
                        self.message = Some(failure.to_string());
                    }
                }
            }
            Screen::Game(mut view) => {
                self.advance(&mut view);
                self.screen = Screen::Game(view);
            }
            other => self.screen = other,
        }
    }

    fn advance(&self, view: &mut GameView) {
        let session = &mut view.session;
        if session.state().is_terminal() {
            return;
        }
        match session.mode() {
            Mode::VsComputer(_) if !session.is_local_turn() => {
                let due = *view
                    .ai_due
                    .get_or_insert_with(|| Instant::now() + self.config.ai_delay());
                if Instant::now() >= due {
                    view.ai_due = None;
                    session.tick();
                }
            }
            // 信箱每帧只看一次，空了就继续
            Mode::Online(_) => {
                session.tick();
            }
            _ => {}
        }
    }
}
