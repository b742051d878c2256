use crate::settings::{PeerEntry, Settings, WindowId};
use anyhow::Context;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// One decoded datagram, ready for the display state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub window: WindowId,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub listen: SocketAddr,
    pub downstream: SocketAddr,
    pub peers: Vec<PeerEntry>,
}

impl RelayConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            listen: SocketAddr::new(settings.listen_addr, settings.listen_port),
            downstream: SocketAddr::new(settings.downstream_addr, settings.downstream_port),
            peers: settings.peers.clone(),
        }
    }
}

/// Find the configured peer matching a datagram's sender, if any.
pub fn route(peers: &[PeerEntry], sender: SocketAddr) -> Option<&PeerEntry> {
    peers
        .iter()
        .find(|peer| peer.addr == sender.ip() && peer.port == sender.port())
}

/// Interval at which the receive loop re-checks its stop flag.
const READ_TIMEOUT: Duration = Duration::from_millis(250);

const RECV_BUFFER_LEN: usize = 2048;

/// Bind the listening socket. A failure here is fatal and must surface
/// before any window is created.
pub fn bind(config: &RelayConfig) -> anyhow::Result<UdpSocket> {
    let socket = UdpSocket::bind(config.listen)
        .with_context(|| format!("binding relay socket on {}", config.listen))?;
    socket
        .set_read_timeout(Some(READ_TIMEOUT))
        .context("setting relay read timeout")?;
    Ok(socket)
}

pub struct RelayHandle {
    stop: Arc<AtomicBool>,
    join: JoinHandle<()>,
}

impl RelayHandle {
    pub fn stop(self) {
        self.stop.store(true, Ordering::SeqCst);
        let _ = self.join.join();
    }
}

/// Run the receive loop on a worker thread. The loop ends when the handle
/// is stopped or the consuming side of `queue` goes away.
pub fn spawn(socket: UdpSocket, config: RelayConfig, queue: Sender<InboundMessage>) -> RelayHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let join = thread::spawn(move || run(socket, config, queue, flag));
    RelayHandle { stop, join }
}

fn run(socket: UdpSocket, config: RelayConfig, queue: Sender<InboundMessage>, stop: Arc<AtomicBool>) {
    let mut buf = [0u8; RECV_BUFFER_LEN];
    while !stop.load(Ordering::SeqCst) {
        let (len, sender) = match socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(err)
                if matches!(
                    err.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ) =>
            {
                continue;
            }
            Err(err) => {
                tracing::warn!(?err, "relay receive failed");
                continue;
            }
        };

        // Unknown senders are dropped without logging; anything on this
        // port that is not one of the four terminals is noise.
        let peer = match route(&config.peers, sender) {
            Some(peer) => peer,
            None => continue,
        };

        forward(&buf[..len], peer.forward_port, config.downstream);

        let text = match std::str::from_utf8(&buf[..len]) {
            Ok(text) => text.to_owned(),
            Err(err) => {
                tracing::debug!(%sender, ?err, "dropping undecodable datagram");
                continue;
            }
        };

        if queue
            .send(InboundMessage {
                window: peer.window,
                text,
            })
            .is_err()
        {
            break;
        }
    }
}

/// Pass the raw bytes on to the recorder from the peer's fixed source port.
/// Failures are logged and swallowed; forwarding never stalls the loop.
fn forward(payload: &[u8], source_port: u16, downstream: SocketAddr) {
    let bind_addr = SocketAddr::from(([0, 0, 0, 0], source_port));
    let socket = match UdpSocket::bind(bind_addr) {
        Ok(socket) => socket,
        Err(err) => {
            tracing::warn!(%bind_addr, ?err, "forward socket bind failed");
            return;
        }
    };
    if let Err(err) = socket.send_to(payload, downstream) {
        tracing::warn!(%downstream, ?err, "forward to recorder failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peers() -> Vec<PeerEntry> {
        vec![
            PeerEntry {
                addr: [10, 0, 0, 1].into(),
                port: 8080,
                forward_port: 8131,
                window: WindowId::A,
            },
            PeerEntry {
                addr: [10, 0, 0, 2].into(),
                port: 8080,
                forward_port: 8132,
                window: WindowId::B,
            },
        ]
    }

    #[test]
    fn route_matches_ip_and_port() {
        let peers = peers();
        let hit = route(&peers, SocketAddr::from(([10, 0, 0, 2], 8080)));
        assert_eq!(hit.map(|p| p.window), Some(WindowId::B));
    }

    #[test]
    fn route_requires_both_ip_and_port() {
        let peers = peers();
        assert!(route(&peers, SocketAddr::from(([10, 0, 0, 1], 9090))).is_none());
        assert!(route(&peers, SocketAddr::from(([10, 0, 0, 9], 8080))).is_none());
    }
}
