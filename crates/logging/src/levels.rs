//! crates/logging/src/levels.rs
//! Severity table: the ordered syslog-style level names and their ranks.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;

/// Severity of a log event.
///
/// Ranks run from `0` (most severe) to `7` (least severe) and follow the
/// syslog naming used by the rendered output. The derived ordering follows
/// the rank, so `Severity::Emerg < Severity::Debug`.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Severity {
    /// System is unusable.
    Emerg = 0,
    /// Action must be taken immediately.
    Alert = 1,
    /// Critical conditions.
    Crit = 2,
    /// Error conditions.
    Error = 3,
    /// Warning conditions.
    Warning = 4,
    /// Normal but significant condition.
    Notice = 5,
    /// Informational messages.
    Info = 6,
    /// Debug-level messages.
    Debug = 7,
}

impl Severity {
    /// Every severity in rank order, most severe first.
    pub const ALL: [Self; 8] = [
        Self::Emerg,
        Self::Alert,
        Self::Crit,
        Self::Error,
        Self::Warning,
        Self::Notice,
        Self::Info,
        Self::Debug,
    ];

    /// Numeric rank of the level.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Stable lowercase name of the level.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Emerg => "emerg",
            Self::Alert => "alert",
            Self::Crit => "crit",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Notice => "notice",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    /// Looks up the level carrying `rank`.
    #[must_use]
    pub const fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            0 => Some(Self::Emerg),
            1 => Some(Self::Alert),
            2 => Some(Self::Crit),
            3 => Some(Self::Error),
            4 => Some(Self::Warning),
            5 => Some(Self::Notice),
            6 => Some(Self::Info),
            7 => Some(Self::Debug),
            _ => None,
        }
    }

    /// Reports whether an event at this level passes `threshold`.
    #[must_use]
    pub const fn passes(self, threshold: Self) -> bool {
        is_enabled(self.rank(), threshold.rank())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = UnknownLevel;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.name() == name)
            .ok_or_else(|| UnknownLevel::new(name))
    }
}

/// A level name that is not part of the severity table.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {name:?}")]
pub struct UnknownLevel {
    name: String,
}

impl UnknownLevel {
    /// Creates the error for the rejected `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The rejected level name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Returns `true` when `candidate_rank` is at least as severe as `threshold_rank`.
#[must_use]
pub const fn is_enabled(candidate_rank: u8, threshold_rank: u8) -> bool {
    candidate_rank <= threshold_rank
}

/// Read-only view of the full name to rank mapping.
///
/// The table is fixed for the lifetime of the process, so two views always
/// compare equal. It serialises as a JSON object in rank order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelTable;

impl LevelTable {
    /// Iterates `(name, rank)` pairs in rank order.
    pub fn iter(self) -> impl Iterator<Item = (&'static str, u8)> {
        Severity::ALL
            .into_iter()
            .map(|level| (level.name(), level.rank()))
    }

    /// Rank for `name`, if it is a known level.
    #[must_use]
    pub fn get(self, name: &str) -> Option<u8> {
        name.parse::<Severity>().ok().map(Severity::rank)
    }

    /// Number of levels in the table.
    #[must_use]
    pub const fn len(self) -> usize {
        Severity::ALL.len()
    }

    /// Always `false`; present for symmetry with [`len`](Self::len).
    #[must_use]
    pub const fn is_empty(self) -> bool {
        false
    }
}

impl serde::Serialize for LevelTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, rank) in self.iter() {
            map.serialize_entry(name, &rank)?;
        }
        map.end()
    }
}

/// Returns the severity table.
#[must_use]
pub const fn levels() -> LevelTable {
    LevelTable
}
