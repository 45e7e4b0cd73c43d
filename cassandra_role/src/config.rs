//! Run configuration and desired-state files.

pub mod role_file;

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::logging::LevelFilter;

pub use role_file::RoleFile;

/// Settings for one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Compute and report the plan without applying anything.
    #[serde(default)]
    pub dry_run: bool,
    /// How much detail to log and report.
    #[serde(default)]
    pub verbosity: Verbosity,
    /// Requested consistency level. See [`ConsistencyLevel::for_reads`] and
    /// [`ConsistencyLevel::for_writes`].
    #[serde(default)]
    pub consistency_level: ConsistencyLevel,
}

/// Output detail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Only failures.
    Quiet,
    /// Changes as they are applied.
    #[default]
    Normal,
    /// Every statement and decision, plus diagnostics in the run report.
    Debug,
}

impl Verbosity {
    /// The log level matching this verbosity, for [`crate::logging::setup`].
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::ERROR,
            Verbosity::Normal => LevelFilter::INFO,
            Verbosity::Debug => LevelFilter::DEBUG,
        }
    }
}

/// Cassandra consistency levels.
///
/// Not every level is accepted for both reads and writes, so the read and
/// write sessions are configured separately from one requested level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum ConsistencyLevel {
    Any,
    One,
    Two,
    Three,
    Quorum,
    All,
    LocalQuorum,
    EachQuorum,
    Serial,
    LocalSerial,
    #[default]
    LocalOne,
}

impl ConsistencyLevel {
    /// Every level, in driver order.
    pub const ALL_LEVELS: [ConsistencyLevel; 11] = [
        ConsistencyLevel::Any,
        ConsistencyLevel::One,
        ConsistencyLevel::Two,
        ConsistencyLevel::Three,
        ConsistencyLevel::Quorum,
        ConsistencyLevel::All,
        ConsistencyLevel::LocalQuorum,
        ConsistencyLevel::EachQuorum,
        ConsistencyLevel::Serial,
        ConsistencyLevel::LocalSerial,
        ConsistencyLevel::LocalOne,
    ];

    /// The level to read with. ANY and EACH_QUORUM are write-only and fall
    /// back to the default.
    pub fn for_reads(self) -> Self {
        match self {
            ConsistencyLevel::Any | ConsistencyLevel::EachQuorum => Self::default(),
            other => other,
        }
    }

    /// The level to write with. SERIAL and LOCAL_SERIAL are read-only and
    /// fall back to the default.
    pub fn for_writes(self) -> Self {
        match self {
            ConsistencyLevel::Serial | ConsistencyLevel::LocalSerial => Self::default(),
            other => other,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ConsistencyLevel::Any => "ANY",
            ConsistencyLevel::One => "ONE",
            ConsistencyLevel::Two => "TWO",
            ConsistencyLevel::Three => "THREE",
            ConsistencyLevel::Quorum => "QUORUM",
            ConsistencyLevel::All => "ALL",
            ConsistencyLevel::LocalQuorum => "LOCAL_QUORUM",
            ConsistencyLevel::EachQuorum => "EACH_QUORUM",
            ConsistencyLevel::Serial => "SERIAL",
            ConsistencyLevel::LocalSerial => "LOCAL_SERIAL",
            ConsistencyLevel::LocalOne => "LOCAL_ONE",
        }
    }
}

impl Display for ConsistencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ConsistencyLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_LEVELS
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("unknown consistency level: {s}"))
    }
}
