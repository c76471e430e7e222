use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, trace};

use crate::error::{ClientError, ProtoError};
use crate::proto::varint::read_varint_async;
use crate::proto::{Framing, Serverbound, MAX_FRAME_LEN};

/// Server endpoint as configured.
#[derive(Clone, Debug)]
pub struct ServerInfo {
    pub host: String,
    pub port: u16,
}

impl ServerInfo {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ServerInfo {
            host: host.into(),
            port,
        }
    }

    /// Resolve the configured endpoint. Prefers IPv4 but falls back to IPv6
    /// if no IPv4 address is available.
    pub async fn addr(&self) -> Result<SocketAddr, ClientError> {
        let target = format!("{}:{}", self.host, self.port);
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&target).await?.collect();
        addrs
            .iter()
            .find(|a| a.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or(ClientError::AddressResolution(target))
    }
}

impl std::fmt::Display for ServerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Framed TCP connection to the server.
pub struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    framing: Framing,
}

impl Connection {
    pub async fn open(server: &ServerInfo) -> Result<Self, ClientError> {
        let addr = server.addr().await?;
        debug!(target: "net", "Opening TCP connection to {}", addr);
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        let (read_half, write_half) = stream.into_split();
        Ok(Connection {
            reader: BufReader::new(read_half),
            writer: write_half,
            framing: Framing::new(),
        })
    }

    pub fn enable_compression(&mut self, threshold: i32) {
        debug!(target: "net", "Compression enabled, threshold {} bytes", threshold);
        self.framing.enable_compression(threshold);
    }

    /// Read the next frame and return `(packet_id, packet_data)`.
    pub async fn read_frame(&mut self) -> Result<(i32, Vec<u8>), ProtoError> {
        let len = read_varint_async(&mut self.reader).await? as usize;
        if len > MAX_FRAME_LEN {
            return Err(ProtoError::FrameTooLarge(len));
        }
        let mut payload = vec![0u8; len];
        match self.reader.read_exact(&mut payload).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(ProtoError::ConnectionClosed);
            }
            Err(e) => return Err(e.into()),
        }
        let (packet_id, data) = self.framing.decode_payload(&payload)?;
        trace!(target: "net", "recv id=0x{:02X} len={}", packet_id, data.len());
        Ok((packet_id, data))
    }

    pub async fn send(&mut self, packet: &Serverbound) -> Result<(), ProtoError> {
        let body = packet.encode_body()?;
        let frame = self.framing.encode_frame(packet.packet_id(), &body)?;
        trace!(target: "net", "send id=0x{:02X} len={}", packet.packet_id(), body.len());
        self.writer.write_all(&frame).await?;
        self.writer.flush().await?;
        Ok(())
    }
}
