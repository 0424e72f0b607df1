use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::packet::Packet;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Packet codec settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    /// Largest packet accepted or produced (default: 4096, RFC 2865 Section 3)
    #[serde(default = "default_max_packet_size")]
    pub max_packet_size: usize,

    /// Reject decoded requests that carry no Message-Authenticator
    /// (default: false; EAP requests always need one)
    #[serde(default)]
    pub require_message_authenticator: bool,
}

fn default_max_packet_size() -> usize {
    Packet::MAX_PACKET_SIZE
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            max_packet_size: default_max_packet_size(),
            require_message_authenticator: false,
        }
    }
}

impl CodecConfig {
    /// Upper bound imposed by the 16-bit length field
    pub const MAX_PACKET_SIZE_LIMIT: usize = 65535;

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: CodecConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(Packet::MIN_PACKET_SIZE..=Self::MAX_PACKET_SIZE_LIMIT).contains(&self.max_packet_size)
        {
            return Err(ConfigError::Invalid(format!(
                "max_packet_size must be between {} and {}, got {}",
                Packet::MIN_PACKET_SIZE,
                Self::MAX_PACKET_SIZE_LIMIT,
                self.max_packet_size
            )));
        }
        Ok(())
    }
}
