use std::fmt;
use std::str::FromStr;

use backend::{ComprMode, SchemeType, SecurityLevel};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeKind {
    /// Exact arithmetic modulo the plain modulus (BFV).
    #[default]
    #[serde(alias = "bfv")]
    Integer,
    /// Fixed-point real and complex arithmetic (CKKS).
    #[serde(alias = "ckks")]
    Approximate,
}

impl SchemeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemeKind::Integer => "integer",
            SchemeKind::Approximate => "approximate",
        }
    }

    pub(crate) fn scheme_type(self) -> SchemeType {
        match self {
            SchemeKind::Integer => SchemeType::Bfv,
            SchemeKind::Approximate => SchemeType::Ckks,
        }
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "integer" | "bfv" => Ok(SchemeKind::Integer),
            "approximate" | "ckks" => Ok(SchemeKind::Approximate),
            other => Err(Error::Config(format!("unknown scheme {:?}", other))),
        }
    }
}

/// Target security strength, serialized as its bit count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SecurityTier {
    #[default]
    Tc128,
    Tc192,
    Tc256,
}

impl SecurityTier {
    pub const ALL: [SecurityTier; 3] =
        [SecurityTier::Tc128, SecurityTier::Tc192, SecurityTier::Tc256];

    pub fn bits(self) -> u32 {
        match self {
            SecurityTier::Tc128 => 128,
            SecurityTier::Tc192 => 192,
            SecurityTier::Tc256 => 256,
        }
    }

    pub(crate) fn level(self) -> SecurityLevel {
        match self {
            SecurityTier::Tc128 => SecurityLevel::Tc128,
            SecurityTier::Tc192 => SecurityLevel::Tc192,
            SecurityTier::Tc256 => SecurityLevel::Tc256,
        }
    }
}

impl TryFrom<u32> for SecurityTier {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self> {
        match bits {
            128 => Ok(SecurityTier::Tc128),
            192 => Ok(SecurityTier::Tc192),
            256 => Ok(SecurityTier::Tc256),
            other => Err(Error::Config(format!(
                "security bits must be 128, 192 or 256, got {}",
                other
            ))),
        }
    }
}

impl From<SecurityTier> for u32 {
    fn from(tier: SecurityTier) -> u32 {
        tier.bits()
    }
}

impl FromStr for SecurityTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bits: u32 = s
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("invalid security bits {:?}", s)))?;
        SecurityTier::try_from(bits)
    }
}

impl fmt::Display for SecurityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tc{}", self.bits())
    }
}

/// Coarse stand-in for the depth of the intended computation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputationLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl ComputationLevel {
    pub const ALL: [ComputationLevel; 3] =
        [ComputationLevel::Low, ComputationLevel::Medium, ComputationLevel::High];

    pub fn as_str(self) -> &'static str {
        match self {
            ComputationLevel::Low => "low",
            ComputationLevel::Medium => "medium",
            ComputationLevel::High => "high",
        }
    }
}

impl fmt::Display for ComputationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComputationLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(ComputationLevel::Low),
            "medium" => Ok(ComputationLevel::Medium),
            "high" => Ok(ComputationLevel::High),
            other => Err(Error::Config(format!("unknown computation level {:?}", other))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMode {
    None,
    #[default]
    Deflate,
}

impl CompressionMode {
    pub(crate) fn compr_mode(self) -> ComprMode {
        match self {
            CompressionMode::None => ComprMode::None,
            CompressionMode::Deflate => ComprMode::Deflate,
        }
    }
}

impl From<ComprMode> for CompressionMode {
    fn from(mode: ComprMode) -> Self {
        match mode {
            ComprMode::None => CompressionMode::None,
            ComprMode::Deflate => CompressionMode::Deflate,
        }
    }
}

impl FromStr for CompressionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(CompressionMode::None),
            "deflate" | "zlib" => Ok(CompressionMode::Deflate),
            other => Err(Error::Config(format!("unknown compression mode {:?}", other))),
        }
    }
}
