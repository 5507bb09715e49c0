//! 传输层
//!
//! 两个对端之间的双工走法通道。主机监听端口并只接受一个连接，客机主动拨号；
//! 建立连接后双方各启动一个后台接收任务，把收到的走法写入单槽信箱，
//! 主循环每帧轮询一次信箱，从不阻塞在网络 I/O 上。
//!
//! 连接建立与消息到达都没有超时，发送失败被吞掉，链路中断后接收任务静默退出。

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::constants::{DEFAULT_HOST, DEFAULT_PORT, LISTEN_HOST, RECV_BUFFER_SIZE};
use crate::error::{ProtocolError, Result};
use crate::mailbox::Mailbox;
use crate::message::SyncMessage;

/// 网络配置
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub host: String,
    pub port: u16,
}

impl NetworkConfig {
    /// `host:port`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// 本端角色
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// 监听并接受连接
    Host,
    /// 主动连接主机
    Guest,
}

/// 主机监听器
pub struct SyncListener {
    listener: tokio::net::TcpListener,
}

impl SyncListener {
    /// 在 `0.0.0.0:port` 上监听
    pub async fn bind(port: u16) -> Result<Self> {
        let addr = format!("{}:{}", LISTEN_HOST, port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| ProtocolError::Bind { addr: addr.clone(), source })?;
        info!("Listening on {}", addr);
        Ok(Self { listener })
    }

    /// 实际监听地址（绑定端口 0 时用于获取分配到的端口）
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr().ok()
    }

    /// 接受唯一的一个连接，之后不再监听
    pub async fn accept(self) -> Result<SyncChannel> {
        let (stream, addr) = self.listener.accept().await.map_err(ProtocolError::Io)?;
        info!("Connection from {}", addr);
        SyncChannel::from_stream(stream, Role::Host)
    }
}

/// 走法同步通道
pub struct SyncChannel {
    writer: Box<dyn AsyncWrite + Send + Unpin>,
    mailbox: Arc<Mailbox>,
    game_over: Arc<AtomicBool>,
    role: Role,
    peer_addr: Option<String>,
}

impl SyncChannel {
    /// 主机：监听端口，等待对端连接
    pub async fn start_host(port: u16) -> Result<Self> {
        SyncListener::bind(port).await?.accept().await
    }

    /// 客机：连接主机
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let addr = format!("{}:{}", host, port);
        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|source| ProtocolError::Connect { addr: addr.clone(), source })?;
        info!("Connected to {}", addr);
        Self::from_stream(stream, Role::Guest)
    }

    /// 从已建立的 TcpStream 创建
    fn from_stream(stream: TcpStream, role: Role) -> Result<Self> {
        stream.set_nodelay(true)?;
        let peer_addr = stream.peer_addr().ok().map(|a| a.to_string());
        let (read_half, write_half) = stream.into_split();

        let mut channel = Self::from_io(read_half, write_half, role);
        channel.peer_addr = peer_addr;
        Ok(channel)
    }

    /// 在任意读写端上建立通道，并启动后台接收任务
    ///
    /// 必须在 tokio 运行时内调用。接收任务不会被 join，随运行时结束而结束。
    pub fn from_io<R, W>(reader: R, writer: W, role: Role) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let mailbox = Arc::new(Mailbox::new());
        let game_over = Arc::new(AtomicBool::new(false));

        tokio::spawn(receive_loop(
            reader,
            Arc::clone(&mailbox),
            Arc::clone(&game_over),
        ));

        Self {
            writer: Box::new(writer),
            mailbox,
            game_over,
            role,
            peer_addr: None,
        }
    }

    /// 发送走法（尽力而为，失败只记录日志）
    pub async fn send(&mut self, col: usize) {
        let payload = SyncMessage::new(col).encode();
        let result = async {
            self.writer.write_all(payload.as_bytes()).await?;
            self.writer.flush().await
        }
        .await;

        match result {
            Ok(()) => debug!(col, "move sent"),
            Err(e) => warn!(col, "Failed to send move: {}", e),
        }
    }

    /// 取出最近收到的对方走法（非阻塞）
    pub fn poll_inbound(&self) -> Option<usize> {
        self.mailbox.take()
    }

    /// 标记对局结束，接收任务在下一次读取返回后退出
    pub fn mark_game_over(&self) {
        self.game_over.store(true, Ordering::Release);
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.load(Ordering::Acquire)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// 获取远端地址
    pub fn peer_addr(&self) -> Option<&str> {
        self.peer_addr.as_deref()
    }
}

/// 后台接收循环：每次阻塞读取一块数据，整块解析为一个列号
async fn receive_loop<R>(mut reader: R, mailbox: Arc<Mailbox>, game_over: Arc<AtomicBool>)
where
    R: AsyncRead + Unpin,
{
    let mut buffer = [0u8; RECV_BUFFER_SIZE];

    while !game_over.load(Ordering::Acquire) {
        let n = match reader.read(&mut buffer).await {
            Ok(0) => {
                debug!("{}", ProtocolError::ConnectionClosed);
                break;
            }
            Ok(n) => n,
            Err(e) => {
                warn!("Receive error: {}", e);
                break;
            }
        };

        match SyncMessage::decode(&buffer[..n]) {
            Ok(msg) => {
                if let Some(dropped) = mailbox.put(msg.column()) {
                    warn!(dropped, "Unconsumed inbound move overwritten");
                }
                debug!(col = msg.column(), "move received");
            }
            Err(e) => {
                warn!("{}", e);
                break;
            }
        }
    }

    debug!("Receive loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    /// 轮询信箱直到收到走法
    async fn wait_inbound(channel: &SyncChannel) -> usize {
        timeout(Duration::from_secs(5), async {
            loop {
                if let Some(col) = channel.poll_inbound() {
                    return col;
                }
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("no inbound move")
    }

    fn duplex_pair() -> (SyncChannel, SyncChannel) {
        let (a, b) = tokio::io::duplex(64);
        let (a_read, a_write) = tokio::io::split(a);
        let (b_read, b_write) = tokio::io::split(b);
        (
            SyncChannel::from_io(a_read, a_write, Role::Host),
            SyncChannel::from_io(b_read, b_write, Role::Guest),
        )
    }

    #[test]
    fn test_network_config_default() {
        let config = NetworkConfig::default();
        assert_eq!(config.port, 5555);
        assert_eq!(config.addr(), "127.0.0.1:5555");
    }

    #[tokio::test]
    async fn test_duplex_round_trip_in_order() {
        let (mut host, mut guest) = duplex_pair();

        for col in [3, 0, 6, 2, 2, 5] {
            host.send(col).await;
            assert_eq!(wait_inbound(&guest).await, col);

            guest.send(6 - col).await;
            assert_eq!(wait_inbound(&host).await, 6 - col);
        }
        assert_eq!(host.poll_inbound(), None);
        assert_eq!(guest.poll_inbound(), None);
    }

    #[tokio::test]
    async fn test_tcp_host_and_guest() {
        let listener = SyncListener::bind(0).await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let guest_handle =
            tokio::spawn(async move { SyncChannel::connect("127.0.0.1", port).await.unwrap() });

        let mut host = listener.accept().await.unwrap();
        let mut guest = guest_handle.await.unwrap();
        assert_eq!(host.role(), Role::Host);
        assert_eq!(guest.role(), Role::Guest);
        assert!(host.peer_addr().is_some());

        for col in [0, 1, 2, 3, 4, 5, 6] {
            guest.send(col).await;
            assert_eq!(wait_inbound(&host).await, col);
            host.send(col).await;
            assert_eq!(wait_inbound(&guest).await, col);
        }
    }

    #[tokio::test]
    async fn test_connect_failure_is_reported() {
        // 先占用再释放一个端口，确保没有人在监听
        let listener = SyncListener::bind(0).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = SyncChannel::connect("127.0.0.1", port).await;
        assert!(matches!(result, Err(ProtocolError::Connect { .. })));
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let listener = SyncListener::bind(0).await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let result = SyncListener::bind(port).await;
        assert!(matches!(result, Err(ProtocolError::Bind { .. })));
    }

    #[tokio::test]
    async fn test_malformed_message_stops_receiver() {
        let (a, b) = tokio::io::duplex(64);
        let (b_read, b_write) = tokio::io::split(b);
        let channel = SyncChannel::from_io(b_read, b_write, Role::Guest);
        let (_a_read, mut a_write) = tokio::io::split(a);

        a_write.write_all(b"x").await.unwrap();
        sleep(Duration::from_millis(50)).await;
        a_write.write_all(b"3").await.unwrap();
        sleep(Duration::from_millis(50)).await;

        assert_eq!(channel.poll_inbound(), None);
    }

    #[tokio::test]
    async fn test_game_over_stops_receiver_after_next_read() {
        let (mut host, guest) = duplex_pair();
        // 让接收任务先进入阻塞读取
        sleep(Duration::from_millis(20)).await;

        guest.mark_game_over();
        assert!(guest.is_game_over());

        // 接收任务正阻塞在读取上，这一条仍会送达
        host.send(2).await;
        assert_eq!(wait_inbound(&guest).await, 2);

        // 之后接收任务已退出
        host.send(4).await;
        sleep(Duration::from_millis(50)).await;
        assert_eq!(guest.poll_inbound(), None);
    }

    #[tokio::test]
    async fn test_send_after_peer_dropped_is_swallowed() {
        let (a, b) = tokio::io::duplex(64);
        let (a_read, a_write) = tokio::io::split(a);
        let mut host = SyncChannel::from_io(a_read, a_write, Role::Host);
        drop(b);

        // 写入已关闭的管道会失败，但错误被吞掉
        host.send(1).await;
        host.send(2).await;
    }
}
