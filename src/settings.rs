use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Logical identifier for one of the four on-screen panes, independent of
/// any platform window handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowId {
    A,
    B,
    C,
    D,
}

impl WindowId {
    pub const ALL: [WindowId; 4] = [WindowId::A, WindowId::B, WindowId::C, WindowId::D];

    pub fn index(self) -> usize {
        match self {
            WindowId::A => 0,
            WindowId::B => 1,
            WindowId::C => 2,
            WindowId::D => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WindowId::A => "a",
            WindowId::B => "b",
            WindowId::C => "c",
            WindowId::D => "d",
        }
    }
}

/// One monitored point-of-sale terminal. Datagrams are matched against
/// `(addr, port)`; `forward_port` is the local source port used when the
/// relay passes this terminal's traffic on to the recorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerEntry {
    pub addr: IpAddr,
    pub port: u16,
    pub forward_port: u16,
    pub window: WindowId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Seconds without a fresh message before a monitored pane starts to
    /// blink.
    #[serde(default = "default_alert_timeout")]
    pub alert_timeout_secs: u64,
    /// 1 = primary display, 2 = secondary display.
    #[serde(default = "default_monitor")]
    pub monitor: u8,
    #[serde(default = "default_blink_interval")]
    pub blink_interval_ms: u64,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: IpAddr,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    /// DVR recorder that receives a copy of every accepted datagram.
    #[serde(default = "default_downstream_addr")]
    pub downstream_addr: IpAddr,
    #[serde(default = "default_listen_port")]
    pub downstream_port: u16,
    #[serde(default = "default_peers")]
    pub peers: Vec<PeerEntry>,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Directory for the per-pane transaction logs. Current directory if
    /// unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alert_timeout_secs: default_alert_timeout(),
            monitor: default_monitor(),
            blink_interval_ms: default_blink_interval(),
            listen_addr: default_listen_addr(),
            listen_port: default_listen_port(),
            downstream_addr: default_downstream_addr(),
            downstream_port: default_listen_port(),
            peers: default_peers(),
            debug_logging: false,
            log_dir: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        let settings: Settings = if content.is_empty() {
            Self::default()
        } else {
            serde_json::from_str(&content)?
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn alert_timeout(&self) -> Duration {
        Duration::from_secs(self.alert_timeout_secs)
    }

    pub fn blink_interval(&self) -> Duration {
        Duration::from_millis(self.blink_interval_ms)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let mut seen = [false; 4];
        for peer in &self.peers {
            let slot = &mut seen[peer.window.index()];
            if *slot {
                bail!("pane '{}' appears twice in the peer table", peer.window.label());
            }
            *slot = true;
        }
        Ok(())
    }
}

fn default_alert_timeout() -> u64 {
    8
}

fn default_monitor() -> u8 {
    2
}

fn default_blink_interval() -> u64 {
    1000
}

fn default_listen_addr() -> IpAddr {
    [0, 0, 0, 0].into()
}

fn default_listen_port() -> u16 {
    38800
}

fn default_downstream_addr() -> IpAddr {
    [192, 168, 101, 250].into()
}

fn default_peers() -> Vec<PeerEntry> {
    WindowId::ALL
        .iter()
        .enumerate()
        .map(|(i, &window)| PeerEntry {
            addr: [192, 168, 101, 131 + i as u8].into(),
            port: 8080,
            forward_port: 8131 + i as u16,
            window,
        })
        .collect()
}
