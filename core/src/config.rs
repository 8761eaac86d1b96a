use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::advisor::{EncryptionParameterProfile, derive};
use crate::error::{Error, Result};
use crate::scheme::{CompressionMode, ComputationLevel, SchemeKind, SecurityTier};

/// Session options, read from TOML:
///
/// ```toml
/// computation_level = "medium"
/// security_bits = 192
/// scheme = "ckks"
/// compression = "none"
/// ```
///
/// Missing keys take their default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub computation_level: ComputationLevel,
    pub security_bits: SecurityTier,
    pub scheme: SchemeKind,
    pub compression: CompressionMode,
}

impl SessionConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents: String = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn profile(&self) -> EncryptionParameterProfile {
        derive(self.computation_level, self.security_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config: SessionConfig = SessionConfig::default();
        assert_eq!(config.computation_level, ComputationLevel::Low);
        assert_eq!(config.security_bits, SecurityTier::Tc128);
        assert_eq!(config.scheme, SchemeKind::Integer);
        assert_eq!(config.compression, CompressionMode::Deflate);
        assert_eq!(SessionConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn parse_toml() {
        let config: SessionConfig = SessionConfig::from_toml_str(
            r#"
            computation_level = "high"
            security_bits = 256
            scheme = "ckks"
            compression = "none"
            "#,
        )
        .unwrap();
        assert_eq!(config.computation_level, ComputationLevel::High);
        assert_eq!(config.security_bits, SecurityTier::Tc256);
        assert_eq!(config.scheme, SchemeKind::Approximate);
        assert_eq!(config.compression, CompressionMode::None);
        assert_eq!(config.profile().poly_modulus_degree, 16384);

        let text: String = config.to_toml_string().unwrap();
        assert_eq!(SessionConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn reject_invalid_values() {
        assert!(matches!(
            SessionConfig::from_toml_str("security_bits = 100"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            SessionConfig::from_toml_str("scheme = \"tfhe\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn load_missing_file() {
        assert!(matches!(
            SessionConfig::load("/nonexistent/morfix.toml"),
            Err(Error::Io(_))
        ));
    }
}
