//! Domain types for network inventory analysis.
//!
//! These are the in-memory records the surrounding service hands to the
//! analysis core: resource identities, connection records and their
//! operational status.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Identity of a resource (a graph node).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(pub String);

impl NodeKey {
    /// Create a new node key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for NodeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Operational status of a connection or circuit.
///
/// Inventory records carry free-form status text. `up` and `down` are
/// recognized case-insensitively; anything else is kept verbatim and is
/// treated as "not up".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperationalStatus {
    /// Traversable
    #[default]
    Up,

    /// Not traversable
    Down,

    /// Unrecognized status text, treated as not traversable
    Other(String),
}

impl OperationalStatus {
    /// Returns `true` only for [`OperationalStatus::Up`].
    #[must_use]
    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Status of a record that carried no status text.
    #[must_use]
    pub fn unknown() -> Self {
        Self::Other(String::new())
    }

    /// Canonical text for this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Other(text) => text,
        }
    }
}

impl FromStr for OperationalStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(if trimmed.eq_ignore_ascii_case("up") {
            Self::Up
        } else if trimmed.eq_ignore_ascii_case("down") {
            Self::Down
        } else {
            Self::Other(s.to_string())
        })
    }
}

impl From<String> for OperationalStatus {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for OperationalStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<OperationalStatus> for String {
    fn from(status: OperationalStatus) -> Self {
        match status {
            OperationalStatus::Other(text) => text,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of edge traversal relative to the current node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Follow connections whose `from` is the current node
    #[default]
    Outbound,

    /// Follow connections whose `to` is the current node
    Inbound,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OUTBOUND" | "OUT" => Ok(Self::Outbound),
            "INBOUND" | "IN" => Ok(Self::Inbound),
            _ => Err(format!(
                "invalid direction '{s}', expected OUTBOUND or INBOUND"
            )),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outbound => write!(f, "OUTBOUND"),
            Self::Inbound => write!(f, "INBOUND"),
        }
    }
}

/// A connection between two resources, as fetched by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Origin resource
    pub from: NodeKey,

    /// Destination resource
    pub to: NodeKey,

    /// Connection label (typically the connection id)
    pub label: String,

    /// Operational status of the connection
    ///
    /// A record without a status is not traversable.
    #[serde(default = "OperationalStatus::unknown")]
    pub status: OperationalStatus,

    /// Ids of circuits whose path uses this connection
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub circuits: Vec<String>,
}

impl ConnectionRecord {
    /// Create a connection record that belongs to no circuit.
    pub fn new(
        from: impl Into<NodeKey>,
        to: impl Into<NodeKey>,
        label: impl Into<String>,
        status: impl Into<OperationalStatus>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: label.into(),
            status: status.into(),
            circuits: Vec::new(),
        }
    }

    /// Attach circuit membership to this record.
    #[must_use]
    pub fn with_circuits<I, S>(mut self, circuits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.circuits = circuits.into_iter().map(Into::into).collect();
        self
    }

    /// `true` when the record carried no status text.
    #[must_use]
    pub fn is_status_missing(&self) -> bool {
        matches!(&self.status, OperationalStatus::Other(text) if text.trim().is_empty())
    }
}
