use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Unique identifier for a sequence record, e.g. `MN908947` or `LR757998.1`.
///
/// Manifest fields and storage-directory stems are taken as-is via [`new`];
/// the manifest declares what exists, so its identifiers are opaque strings.
/// `FromStr` is for CLI-typed arguments and only rejects values that could
/// not name an artifact file.
///
/// [`new`]: Accession::new
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Accession(String);

impl Accession {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the accession already carries a `.N` sequence-version suffix.
    pub fn has_version_suffix(&self) -> bool {
        self.0
            .rsplit_once('.')
            .map(|(_, version)| {
                !version.is_empty() && version.chars().all(|ch| ch.is_ascii_digit())
            })
            .unwrap_or(false)
    }
}

impl fmt::Display for Accession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Accession {
    type Err = FetchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_string();
        if normalized.is_empty()
            || normalized.chars().any(|ch| ch.is_whitespace())
            || normalized.contains(['/', '\\'])
        {
            return Err(FetchError::InvalidAccession(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

/// Classification label grouping accessions, e.g. `B.1.1.7`. Values read from
/// the manifest are opaque; `FromStr` guards CLI arguments against emptiness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Lineage(String);

impl Lineage {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Lineage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Lineage {
    type Err = FetchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_string();
        if normalized.is_empty() {
            return Err(FetchError::InvalidLineage(value.to_string()));
        }
        Ok(Self(normalized))
    }
}
