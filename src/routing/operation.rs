//! Shipment operations and their fixed inbound paths.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One of the three carrier operations the middleman forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Track,
    Label,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Create, Operation::Track, Operation::Label];

    /// Inbound path served for this operation.
    pub fn path(self) -> &'static str {
        match self {
            Operation::Create => "/shipment/create",
            Operation::Track => "/shipment/track",
            Operation::Label => "/shipment/label",
        }
    }

    /// Environment variable holding the upstream URL.
    pub fn env_key(self) -> &'static str {
        match self {
            Operation::Create => "CARRIER_CREATE_URL",
            Operation::Track => "CARRIER_TRACK_URL",
            Operation::Label => "CARRIER_LABEL_URL",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Track => "track",
            Operation::Label => "label",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown operation {0:?} (expected create, track or label)")]
pub struct UnknownOperation(String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Operation::Create),
            "track" => Ok(Operation::Track),
            "label" => Ok(Operation::Label),
            _ => Err(UnknownOperation(s.to_string())),
        }
    }
}

/// Endpoints advertised by the 404 handler.
pub const AVAILABLE_ENDPOINTS: [&str; 4] = [
    "POST /shipment/create",
    "POST /shipment/track",
    "POST /shipment/label",
    "GET /health",
];
