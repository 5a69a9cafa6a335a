#![cfg(feature = "std")]

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::protocol::{Command, Event};
use crate::transport::Transport;

/// Longest line accepted from the server before the connection is dropped.
const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Newline-framed text transport over TCP.
///
/// Reads block indefinitely unless a read timeout was configured.
pub struct TcpTransport {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    read_timeout: Option<Duration>,
    line: String,
    last_recv: String,
    last_send: String,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        let (read, write) = stream.into_split();
        Self {
            reader: BufReader::new(read),
            writer: write,
            read_timeout: None,
            line: String::new(),
            last_recv: String::new(),
            last_send: String::new(),
        }
    }

    pub fn with_timeout(stream: TcpStream, read_timeout: Duration) -> Self {
        let mut transport = Self::new(stream);
        transport.read_timeout = Some(read_timeout);
        transport
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }

    pub fn set_read_timeout(&mut self, read_timeout: Option<Duration>) {
        self.read_timeout = read_timeout;
    }

    /// The last raw line received, for diagnostics.
    pub fn last_recv(&self) -> &str {
        &self.last_recv
    }

    pub fn last_send(&self) -> &str {
        &self.last_send
    }

    /// Read one raw line, without the trailing newline.
    pub async fn recv_line(&mut self) -> anyhow::Result<String> {
        self.line.clear();
        let read_timeout = self.read_timeout;
        let read_op = async {
            let mut limited = (&mut self.reader).take(MAX_LINE_LENGTH as u64 + 1);
            let n = limited.read_line(&mut self.line).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::ConnectionReset {
                    anyhow::anyhow!("Connection reset by peer")
                } else {
                    anyhow::anyhow!("Read error: {}", e)
                }
            })?;
            if n == 0 {
                return Err(anyhow::anyhow!("Connection closed by peer"));
            }
            if !self.line.ends_with('\n') && self.line.len() > MAX_LINE_LENGTH {
                return Err(anyhow::anyhow!(
                    "Line too long: {} bytes (max: {})",
                    self.line.len(),
                    MAX_LINE_LENGTH
                ));
            }
            anyhow::Ok(())
        };

        match read_timeout {
            Some(limit) => timeout(limit, read_op)
                .await
                .map_err(|_| anyhow::anyhow!("Receive timeout after {:?}", limit))??,
            None => read_op.await?,
        }

        let trimmed = self.line.trim_end_matches(['\r', '\n']).to_string();
        log::debug!("RECV: {}", trimmed);
        self.last_recv.clone_from(&trimmed);
        Ok(trimmed)
    }

    /// Write one raw line and flush it.
    pub async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        let mut data = String::with_capacity(line.len() + 1);
        data.push_str(line);
        data.push('\n');
        self.writer.write_all(data.as_bytes()).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::BrokenPipe
                || e.kind() == std::io::ErrorKind::ConnectionReset
            {
                anyhow::anyhow!("Connection closed by peer")
            } else {
                anyhow::anyhow!("Write error: {}", e)
            }
        })?;
        self.writer.flush().await?;
        log::debug!("SEND: {}", line);
        self.last_send = line.to_string();
        Ok(())
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, cmd: Command) -> anyhow::Result<()> {
        self.send_line(&cmd.to_string()).await
    }

    async fn recv(&mut self) -> anyhow::Result<Event> {
        let line = self.recv_line().await?;
        let event = Event::parse(&line)?;
        Ok(event)
    }
}
