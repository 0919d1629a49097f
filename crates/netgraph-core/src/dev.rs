use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One network interface as reported by the router-control API.
///
/// Snapshots are produced fresh on every poll and never mutated in
/// place; the whole collection is replaced each cycle. `name` is the
/// durable identity — the kernel `index` may be recycled after an
/// interface is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub name: String,
    pub index: u32,
    #[serde(default)]
    pub mac: Option<MacAddr>,
    #[serde(default)]
    pub kind: DeviceKind,
    #[serde(default)]
    pub link_state: LinkState,
    #[serde(default)]
    pub zone: Zone,
    #[serde(default)]
    pub controller_name: Option<String>,
    #[serde(default)]
    pub controller_id: Option<u32>,
    #[serde(default)]
    pub peer_link_id: Option<u32>,
    #[serde(default)]
    pub wifi: Option<WifiRole>,
    #[serde(default)]
    pub carrier: bool,
}

impl DeviceSnapshot {
    pub fn is_loopback(&self) -> bool {
        matches!(self.kind, DeviceKind::Loopback)
    }

    pub fn is_down(&self) -> bool {
        matches!(self.link_state, LinkState::Down)
    }

    pub fn is_bridge(&self) -> bool {
        matches!(self.kind, DeviceKind::Bridge)
    }

    pub fn is_access_point(&self) -> bool {
        matches!(
            self.wifi,
            Some(WifiRole { mode: WifiMode::AccessPoint, .. })
        )
    }
}

/// Operational link state, mirroring the kernel operstate values.
/// `Other` holds codes newer than this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "t", content = "c")]
pub enum LinkState {
    #[default]
    Unknown,
    NotPresent,
    Down,
    LowerLayerDown,
    Testing,
    Dormant,
    Up,
    Other(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeviceKind {
    #[default]
    Physical,
    Bridge,
    Veth,
    Vlan,
    Bond,
    Tun,
    Ppp,
    Loopback,
    Dummy,
    Wireguard,
    Other(String),
}

/// Trust classification of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    #[default]
    Undefined,
    Wan,
    Lan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiRole {
    pub mode: WifiMode,
    #[serde(default)]
    pub band: WifiBand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WifiMode {
    Station,
    AccessPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WifiBand {
    #[default]
    Unknown,
    Band2G,
    Band5G,
    Band6G,
}

/// Hardware address, serialized as colon-separated hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddr(pub [u8; 6]);

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacAddrParseError;

impl fmt::Display for MacAddrParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected six colon-separated hex octets")
    }
}

impl std::error::Error for MacAddrParseError {}

impl FromStr for MacAddr {
    type Err = MacAddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.split(':');
        for slot in octets.iter_mut() {
            let part = parts.next().ok_or(MacAddrParseError)?;
            *slot = u8::from_str_radix(part, 16).map_err(|_| MacAddrParseError)?;
        }
        if parts.next().is_some() {
            return Err(MacAddrParseError);
        }
        Ok(MacAddr(octets))
    }
}

impl TryFrom<String> for MacAddr {
    type Error = MacAddrParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacAddr> for String {
    fn from(mac: MacAddr) -> Self {
        mac.to_string()
    }
}
