use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use connect4_cli::{App, AppConfig, CrosstermEvents, Launch};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use protocol::Difficulty;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "connect4", about = "Connect Four: local, vs computer or over TCP")]
struct Cli {
    /// 配置文件路径（不存在时使用默认配置）
    #[arg(short, long, default_value = "connect4.json")]
    config: PathBuf,

    /// 日志文件（界面占用终端，日志不能写到屏幕上）
    #[arg(long, default_value = "connect4.log")]
    log_file: PathBuf,

    /// 不指定时进入主菜单
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 同屏双人
    Local,
    /// 人机对战
    Ai {
        /// easy / medium / hard
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
    },
    /// 建立主机并等待对方连接
    Host {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// 连接到主机
    Join {
        host: String,
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Command {
    fn into_launch(self, config: &AppConfig) -> Launch {
        match self {
            Command::Local => Launch::Local,
            Command::Ai { difficulty } => {
                Launch::VsComputer(difficulty.unwrap_or(config.difficulty))
            }
            Command::Host { port } => Launch::Host {
                port: port.unwrap_or(config.network.port),
            },
            Command::Join { host, port } => Launch::Join {
                host,
                port: port.unwrap_or(config.network.port),
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.log_file)
        .with_context(|| format!("failed to open log file {}", cli.log_file.display()))?;

    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(log_file))
            .with_ansi(false))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("connect4_cli=info".parse()?))
        .init();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    info!(difficulty = %config.difficulty, port = config.network.port, "Config loaded");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    let launch = cli.command.map(|command| command.into_launch(&config));
    let mut app = App::new(config, runtime);
    if let Some(launch) = launch {
        app.launch(launch);
    }

    // 进入终端界面
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = app.run(&mut terminal, &mut CrosstermEvents);

    // 无论成功与否都恢复终端
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result
}
