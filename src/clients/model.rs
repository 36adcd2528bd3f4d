//! Client record models as persisted in the `clients` collection.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription tier of a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    #[default]
    Starter,
    Growth,
    Enterprise,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Starter, Tier::Growth, Tier::Enterprise];
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Starter => write!(f, "Starter"),
            Self::Growth => write!(f, "Growth"),
            Self::Enterprise => write!(f, "Enterprise"),
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|t| t.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tier {s:?} (expected Starter, Growth or Enterprise)"))
    }
}

/// Account status of a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientStatus {
    #[default]
    Active,
    Inactive,
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Inactive => write!(f, "Inactive"),
        }
    }
}

/// A postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub country: String,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        [&self.street, &self.city, &self.state, &self.zip, &self.country]
            .iter()
            .all(|part| part.trim().is_empty())
    }
}

impl std::fmt::Display for Address {
    /// Non-empty parts joined by ", ".
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<&str> = [&self.street, &self.city, &self.state, &self.zip, &self.country]
            .into_iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// A site operated by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "isPrimary", default)]
    pub is_primary: bool,
}

impl Location {
    pub fn new(name: impl Into<String>, address: Option<String>, is_primary: bool) -> Self {
        Self {
            name: name.into(),
            address,
            is_primary,
        }
    }
}

/// Secondary client details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDetails {
    #[serde(default)]
    pub hq_address: Address,
    /// Billing address. New clients are billed at their HQ address.
    #[serde(default)]
    pub billing: Address,
}

/// A committed client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: String,
    pub name: String,
    pub tier: Tier,
    pub timezone: String,
    pub status: ClientStatus,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub details: ClientDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ClientRecord {
    /// The location flagged primary, if any.
    pub fn primary_location(&self) -> Option<&Location> {
        self.locations.iter().find(|l| l.is_primary)
    }
}
