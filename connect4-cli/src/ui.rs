//! 终端界面绘制
//!
//! 每个画面一个 `render_*` 函数，只读取状态、不做任何修改。

use protocol::{Board, Difficulty, Player, Role, RuleEngine, COLS, ROWS};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::session::{Mode, Session, Status};

/// 主菜单选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Local,
    VsComputer,
    Host,
    Join,
    CycleDifficulty,
    Quit,
}

impl MenuChoice {
    /// 菜单中的显示顺序
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::Local,
        MenuChoice::VsComputer,
        MenuChoice::Host,
        MenuChoice::Join,
        MenuChoice::CycleDifficulty,
        MenuChoice::Quit,
    ];

    /// 快捷键
    pub fn hotkey(&self) -> char {
        match self {
            MenuChoice::Local => '1',
            MenuChoice::VsComputer => '2',
            MenuChoice::Host => '3',
            MenuChoice::Join => '4',
            MenuChoice::CycleDifficulty => '5',
            MenuChoice::Quit => 'q',
        }
    }

    pub fn from_hotkey(c: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|choice| choice.hotkey() == c.to_ascii_lowercase())
    }

    pub fn label(&self, difficulty: Difficulty) -> String {
        match self {
            MenuChoice::Local => "1 vs 1 (Local)".to_string(),
            MenuChoice::VsComputer => "1 vs Computer".to_string(),
            MenuChoice::Host => "Host Game".to_string(),
            MenuChoice::Join => "Join Game".to_string(),
            MenuChoice::CycleDifficulty => format!("AI Difficulty: {}", difficulty),
            MenuChoice::Quit => "Quit".to_string(),
        }
    }
}

fn player_color(player: Player) -> Color {
    match player {
        Player::A => Color::Red,
        Player::B => Color::Yellow,
    }
}

fn mode_label(mode: Mode) -> String {
    match mode {
        Mode::Local => "1 vs 1".to_string(),
        Mode::VsComputer(difficulty) => format!("vs Computer ({})", difficulty),
        Mode::Online(Role::Host) => "Online (host)".to_string(),
        Mode::Online(Role::Guest) => "Online (guest)".to_string(),
    }
}

/// 主菜单
pub fn render_menu(frame: &mut Frame, difficulty: Difficulty, selected: usize, message: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MenuChoice::ALL.len() as u16 + 2),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let lines: Vec<Line> = MenuChoice::ALL
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let text = format!("{}) {}", choice.hotkey(), choice.label(difficulty));
            if i == selected {
                Line::from(Span::styled(
                    format!("> {}", text),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!("  {}", text))
            }
        })
        .collect();

    let menu = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Connect 4"));
    frame.render_widget(menu, chunks[0]);

    render_message(frame, message, chunks[1]);
    render_controls(frame, "↑/↓: Select  |  Enter or 1-5: Choose  |  Q/Esc: Quit", chunks[2]);
}

/// 加入游戏时输入主机地址
pub fn render_join_prompt(frame: &mut Frame, input: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(3)])
        .split(frame.area());

    let prompt = Paragraph::new(vec![
        Line::from("Enter host IP:"),
        Line::from(Span::styled(
            format!("{}_", input),
            Style::default().fg(Color::Cyan),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Join Game"));
    frame.render_widget(prompt, chunks[0]);

    render_controls(frame, "Enter: Connect  |  Esc: Back", chunks[1]);
}

/// 等待连接建立
pub fn render_connecting(frame: &mut Frame, label: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(frame.area());

    let waiting = Paragraph::new(label.to_string())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Connect 4"));
    frame.render_widget(waiting, chunks[0]);

    render_controls(frame, "Esc: Cancel", chunks[1]);
}

/// 对局画面
pub fn render_game(frame: &mut Frame, session: &Session, selected_column: usize, message: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // 状态栏
            Constraint::Min(10),    // 棋盘
            Constraint::Length(3),  // 提示
            Constraint::Length(3),  // 操作说明
        ])
        .split(frame.area());

    render_header(frame, session, chunks[0]);
    render_board(frame, session.state().board(), selected_column, chunks[1]);
    render_message(frame, message, chunks[2]);

    let controls = if session.can_reset() {
        "←/→: Move  |  Enter or 1-7: Drop  |  R: Restart  |  Q/Esc: Menu"
    } else {
        "←/→: Move  |  Enter or 1-7: Drop  |  Q/Esc: Menu"
    };
    render_controls(frame, controls, chunks[3]);
}

fn render_header(frame: &mut Frame, session: &Session, area: Rect) {
    let status = session.status();
    let color = match status {
        Status::Turn(player) | Status::Won(player) => player_color(player),
        Status::ComputerThinking | Status::WaitingForOpponent => {
            player_color(session.state().current_turn())
        }
        Status::Draw => Color::White,
    };

    let header = Paragraph::new(format!("{}  |  {}", status, mode_label(session.mode())))
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Connect 4"));
    frame.render_widget(header, area);
}

/// 棋盘行，最上面是最高层；获胜的四子加下划线
pub fn board_lines(board: &Board, selected_column: usize) -> Vec<Line<'static>> {
    let winning: Vec<(usize, usize)> = [Player::A, Player::B]
        .into_iter()
        .find_map(|player| RuleEngine::winning_line(board, player))
        .map(|line| line.to_vec())
        .unwrap_or_default();

    let mut lines = Vec::with_capacity(ROWS + 3);

    let mut header = vec![Span::raw(" ")];
    for col in 0..COLS {
        let label = format!(" {} ", col + 1);
        if col == selected_column {
            header.push(Span::styled(
                label,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        } else {
            header.push(Span::raw(label));
        }
    }
    header.push(Span::raw(" "));
    lines.push(Line::from(header));

    lines.push(Line::from(format!("╔{}╗", "═".repeat(COLS * 3))));
    for row in (0..ROWS).rev() {
        let mut spans = vec![Span::raw("║")];
        for col in 0..COLS {
            let (symbol, mut style) = match board.cell(row, col) {
                None => (" . ", Style::default().fg(Color::DarkGray)),
                Some(player) => (" ● ", Style::default().fg(player_color(player))),
            };
            if winning.contains(&(row, col)) {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            spans.push(Span::styled(symbol, style));
        }
        spans.push(Span::raw("║"));
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(format!("╚{}╝", "═".repeat(COLS * 3))));

    let mut indicator = vec![Span::raw(" ")];
    for col in 0..COLS {
        if col == selected_column {
            indicator.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator.push(Span::raw("   "));
        }
    }
    indicator.push(Span::raw(" "));
    lines.push(Line::from(indicator));

    lines
}

fn render_board(frame: &mut Frame, board: &Board, selected_column: usize, area: Rect) {
    let widget = Paragraph::new(board_lines(board, selected_column)).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: Rect) {
    let widget = Paragraph::new(message.unwrap_or("").to_string())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, text: &str, area: Rect) {
    let widget = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));
    frame.render_widget(widget, area);
}
