//! Mock camera peers for novacam tests.
//!
//! Simulated Nova cameras that speak just enough of the stream protocol to
//! exercise a real client over loopback sockets: announcement plus chunked
//! payload datagrams over UDP, prologue variants over TCP, and configurable
//! misbehavior (noise datagrams, corrupt trailers, silence).
//!
//! Each mock answers pings from a scripted queue, one script per ping, and
//! ignores pings once the queue is drained — which reads as a silent camera
//! and exercises the client's deadline handling.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};

use novacam_core::wire::{ANNOUNCEMENT_LEN, TCP_RECV_CHUNK, UDP_PAYLOAD_CHUNK};

/// Synthetic JPEG-shaped payload: SOI, deterministic filler, EOI.
///
/// Not decodable; meant for byte-exact reassembly checks. `len` must be at
/// least 4.
pub fn fake_jpeg(len: usize) -> Vec<u8> {
    assert!(len >= 4, "fake_jpeg needs room for both markers");
    let mut payload: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    payload[0] = 0xFF;
    payload[1] = 0xD8;
    payload[len - 2] = 0xFF;
    payload[len - 1] = 0xD9;
    payload
}

/// One scripted UDP frame response.
#[derive(Debug, Clone)]
pub struct UdpFrameScript {
    pub payload: Vec<u8>,
    /// Payload type in the announcement; 1 announces a frame.
    pub announce_type: u32,
    /// Declared length; defaults to the actual payload length.
    pub announced_len: Option<u32>,
    /// Datagram size for payload chunking.
    pub chunk: usize,
    /// Datagrams sent before the announcement (unrelated traffic).
    pub noise_before: Vec<Vec<u8>>,
    /// Swallow the ping without responding.
    pub silent: bool,
}

impl UdpFrameScript {
    pub fn frame(payload: Vec<u8>) -> Self {
        Self {
            payload,
            announce_type: 1,
            announced_len: None,
            chunk: UDP_PAYLOAD_CHUNK,
            noise_before: Vec::new(),
            silent: false,
        }
    }

    pub fn silent() -> Self {
        Self {
            silent: true,
            ..Self::frame(Vec::new())
        }
    }

    pub fn with_announce_type(mut self, announce_type: u32) -> Self {
        self.announce_type = announce_type;
        self
    }

    pub fn with_announced_len(mut self, len: u32) -> Self {
        self.announced_len = Some(len);
        self
    }

    pub fn with_chunk(mut self, chunk: usize) -> Self {
        self.chunk = chunk;
        self
    }

    pub fn with_noise(mut self, noise: Vec<Vec<u8>>) -> Self {
        self.noise_before = noise;
        self
    }
}

/// Scripted UDP camera on an ephemeral loopback port.
pub struct MockUdpCamera {
    pub addr: SocketAddr,
}

impl MockUdpCamera {
    pub async fn start(scripts: Vec<UdpFrameScript>) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        tokio::spawn(run_udp(socket, scripts.into()));
        Self { addr }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

async fn run_udp(socket: UdpSocket, mut scripts: VecDeque<UdpFrameScript>) {
    let mut buf = [0u8; 2048];
    let mut client: Option<SocketAddr> = None;

    loop {
        let Ok((len, from)) = socket.recv_from(&mut buf).await else {
            return;
        };
        let msg = &buf[..len];

        if msg.starts_with(b"CONNECT") {
            // The hello names the port replies should go to.
            let port = std::str::from_utf8(&msg[b"CONNECT ".len()..])
                .ok()
                .and_then(|p| p.parse().ok())
                .expect("malformed CONNECT");
            client = Some(SocketAddr::new(from.ip(), port));
        } else if msg == b"PING" {
            let Some(target) = client else { continue };
            let Some(script) = scripts.pop_front() else {
                continue;
            };
            if script.silent {
                continue;
            }

            for noise in &script.noise_before {
                socket.send_to(noise, target).await.unwrap();
            }

            let announced = script
                .announced_len
                .unwrap_or(script.payload.len() as u32);
            let mut header = [0u8; ANNOUNCEMENT_LEN];
            header[..4].copy_from_slice(&script.announce_type.to_be_bytes());
            header[4..8].copy_from_slice(&announced.to_be_bytes());
            socket.send_to(&header, target).await.unwrap();

            for chunk in script.payload.chunks(script.chunk) {
                socket.send_to(chunk, target).await.unwrap();
            }
        } else if msg == b"DISCONNECT" {
            // The device outlives sessions; forget the client and wait for
            // the next CONNECT.
            client = None;
        }
    }
}

/// One scripted TCP frame response.
///
/// The byte stream is always `[4-byte big-endian declared size][payload]`;
/// what varies is where the write boundaries fall. A bare length prefix is a
/// lone 4-byte write, the embedded variant glues prefix and payload into one
/// chunk train.
#[derive(Debug, Clone)]
pub struct TcpFrameScript {
    pub payload: Vec<u8>,
    /// Declared size; defaults to the actual payload length.
    pub declared: Option<u32>,
    /// Write segment lengths applied to the stream from the start; any
    /// remainder goes out as one final write.
    pub segments: Vec<usize>,
    /// Swallow the ping without responding.
    pub silent: bool,
}

impl TcpFrameScript {
    /// Lone 4-byte prefix write, then payload in protocol-sized chunks.
    pub fn bare_prefix(payload: Vec<u8>) -> Self {
        let mut segments = vec![4];
        segments.extend(std::iter::repeat(TCP_RECV_CHUNK).take(payload.len() / TCP_RECV_CHUNK));
        Self {
            payload,
            declared: None,
            segments,
            silent: false,
        }
    }

    /// Prefix glued to the front of the first payload chunk.
    pub fn embedded(payload: Vec<u8>) -> Self {
        Self {
            payload,
            declared: None,
            segments: vec![TCP_RECV_CHUNK],
            silent: false,
        }
    }

    pub fn silent() -> Self {
        Self {
            silent: true,
            ..Self::bare_prefix(Vec::new())
        }
    }

    pub fn with_declared(mut self, declared: u32) -> Self {
        self.declared = Some(declared);
        self
    }

    pub fn with_segments(mut self, segments: Vec<usize>) -> Self {
        self.segments = segments;
        self
    }

    fn stream_bytes(&self) -> Vec<u8> {
        let declared = self.declared.unwrap_or(self.payload.len() as u32);
        let mut stream = Vec::with_capacity(4 + self.payload.len());
        stream.extend_from_slice(&declared.to_be_bytes());
        stream.extend_from_slice(&self.payload);
        stream
    }
}

/// Scripted TCP camera on an ephemeral loopback port. Accepts one client.
pub struct MockTcpCamera {
    pub addr: SocketAddr,
}

impl MockTcpCamera {
    pub async fn start(scripts: Vec<TcpFrameScript>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(run_tcp(listener, scripts.into()));
        Self { addr }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

async fn run_tcp(listener: TcpListener, mut scripts: VecDeque<TcpFrameScript>) {
    let Ok((mut stream, _)) = listener.accept().await else {
        return;
    };
    stream.set_nodelay(true).unwrap();

    let mut ping = [0u8; 4];
    loop {
        if stream.read_exact(&mut ping).await.is_err() {
            return;
        }
        let Some(script) = scripts.pop_front() else {
            continue;
        };
        if script.silent {
            continue;
        }

        let bytes = script.stream_bytes();
        let mut offset = 0;
        for &segment in &script.segments {
            let end = (offset + segment).min(bytes.len());
            if offset >= end {
                break;
            }
            // The client may bail out mid-frame (that is the point of some
            // scripts); a failed write just ends the session.
            if stream.write_all(&bytes[offset..end]).await.is_err() {
                return;
            }
            let _ = stream.flush().await;
            // Give the client a chance to observe the boundary.
            tokio::time::sleep(Duration::from_millis(10)).await;
            offset = end;
        }
        if offset < bytes.len() {
            if stream.write_all(&bytes[offset..]).await.is_err() {
                return;
            }
            let _ = stream.flush().await;
        }
    }
}

/// Scripted command server: answers each request line with the next canned
/// response and records what it received.
pub struct MockCommandServer {
    pub addr: SocketAddr,
    received: tokio::sync::mpsc::UnboundedReceiver<String>,
}

impl MockCommandServer {
    pub async fn start(responses: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        tokio::spawn(async move {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let mut responses = VecDeque::from(responses);
            let mut buf = [0u8; 256];
            loop {
                let Ok(len) = stream.read(&mut buf).await else {
                    return;
                };
                if len == 0 {
                    return;
                }
                let line = String::from_utf8_lossy(&buf[..len])
                    .trim_end_matches("\r\n")
                    .to_string();
                let _ = tx.send(line);
                let response = responses.pop_front().unwrap_or_else(|| "200".to_string());
                if stream.write_all(response.as_bytes()).await.is_err() {
                    return;
                }
            }
        });

        Self { addr, received: rx }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Next request line the server saw, if any arrived yet.
    pub fn try_received(&mut self) -> Option<String> {
        self.received.try_recv().ok()
    }
}
