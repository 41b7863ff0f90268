//! Identifier newtypes and the seedable generator behind them.
//!
//! Using newtypes prevents accidentally mixing up different kinds of IDs
//! (e.g., writing a region ID where an asset ID is expected).

use rand::{rngs::StdRng, RngExt, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::color;

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const CONNECTION_ID_CHARS: usize = 8;

/// Identifier of an asset: 32 lowercase hex characters.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub String);

impl AssetId {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetId({})", self.0)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a region inside an asset.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub String);

impl RegionId {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionId({})", self.0)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Short hyphenated id used by project and connection objects, e.g. `aB3-x9Zq1`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub String);

impl ConnectionId {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionId({})", self.0)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of every random value in a conversion run.
///
/// A seeded generator makes ids and tag colors reproducible.
#[derive(Debug)]
pub struct IdGenerator {
    rng: StdRng,
}

impl IdGenerator {
    /// Generator seeded from the thread-local entropy source.
    pub fn from_entropy() -> Self {
        let seed: u64 = rand::rng().random();
        Self::seeded(seed)
    }

    /// Deterministic generator.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Version 4 UUID rendered without hyphens.
    fn unique_hex(&mut self) -> String {
        let bytes = self.rng.random::<u128>().to_le_bytes();
        uuid::Builder::from_random_bytes(bytes)
            .into_uuid()
            .simple()
            .to_string()
    }

    pub fn asset_id(&mut self) -> AssetId {
        AssetId(self.unique_hex())
    }

    pub fn region_id(&mut self) -> RegionId {
        RegionId(self.unique_hex())
    }

    /// Eight alphanumeric characters with a single hyphen at a uniform position in `[1, 8)`.
    pub fn connection_id(&mut self) -> ConnectionId {
        let hyphen_pos = self.rng.random_range(1..CONNECTION_ID_CHARS);
        let mut id = String::with_capacity(CONNECTION_ID_CHARS + 1);
        for idx in 0..CONNECTION_ID_CHARS {
            if idx == hyphen_pos {
                id.push('-');
            }
            let pick = self.rng.random_range(0..ALPHANUMERIC.len());
            id.push(char::from(ALPHANUMERIC[pick]));
        }
        ConnectionId(id)
    }

    /// `#rrggbb` color; `None` channels are drawn uniformly from `[0, 255]`.
    pub fn hex_color(&mut self, r: Option<i64>, g: Option<i64>, b: Option<i64>) -> String {
        let mut channel = |value: Option<i64>| match value {
            Some(value) => color::clamp_channel(value),
            None => self.rng.random_range(0..=255u8),
        };
        let (r, g, b) = (channel(r), channel(g), channel(b));
        color::format_hex(r, g, b)
    }

    /// Tag color with every channel drawn from `[40, 200]`.
    pub fn tag_color(&mut self) -> String {
        let r = self.rng.random_range(color::TAG_CHANNEL_RANGE);
        let g = self.rng.random_range(color::TAG_CHANNEL_RANGE);
        let b = self.rng.random_range(color::TAG_CHANNEL_RANGE);
        color::format_hex(r, g, b)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
