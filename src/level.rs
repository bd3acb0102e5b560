use crate::{
    bitfield::{clear_bits, set_bits, test_bits},
    DebuggerError,
};
use std::{fmt, ops::BitOr, str::FromStr};

/// Severity of a log message.
///
/// The numeric rank doubles as a bit in [`Facilities`].
/// A smaller rank is more severe: `Error < Warn < Notice < Info < Trace`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum Severity {
    /// Something failed.
    Error = 0x01,
    /// Something looks wrong but processing continues.
    Warn = 0x02,
    /// Noteworthy, but normal.
    Notice = 0x04,
    /// Informational.
    Info = 0x08,
    /// Fine-grained tracing.
    Trace = 0x10,
}

/// All severity bits.
pub const SEVERITY_MASK: u32 = 0x1F;

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Severity; 5] = [
        Severity::Error,
        Severity::Warn,
        Severity::Notice,
        Severity::Info,
        Severity::Trace,
    ];

    /// The numeric rank.
    #[must_use]
    pub fn rank(self) -> u32 {
        self as u32
    }

    /// The fixed-width label that appears in log lines.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "ERROR ",
            Severity::Warn => "WARN  ",
            Severity::Notice => "NOTICE",
            Severity::Info => "INFO  ",
            Severity::Trace => "TRACE ",
        }
    }

    /// Returns the severity whose bit equals `rank`, if any.
    #[must_use]
    pub fn from_rank(rank: u32) -> Option<Severity> {
        Self::ALL.into_iter().find(|s| s.rank() == rank)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().trim_end())
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warn,
            log::Level::Info => Severity::Info,
            log::Level::Debug | log::Level::Trace => Severity::Trace,
        }
    }
}

/// A bitmask combining severity bits and destination bits.
///
/// Passed to [`Debugger::log`](crate::Debugger::log) with one severity bit,
/// and used as the configured level of a [`Debugger`](crate::Debugger),
/// where the destination bits decide which writers get attached.
///
/// ```rust
/// use sourcelog::Facilities;
///
/// let level: Facilities = "info, file, screen".parse().unwrap();
/// assert_eq!(level, Facilities::INFO | Facilities::FILE | Facilities::SCREEN);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "config_file",
    derive(serde_derive::Deserialize),
    serde(try_from = "String")
)]
pub struct Facilities(u32);

impl Facilities {
    /// No bits set.
    pub const NONE: Facilities = Facilities(0);
    /// Severity bit for errors.
    pub const ERROR: Facilities = Facilities(Severity::Error as u32);
    /// Severity bit for warnings.
    pub const WARN: Facilities = Facilities(Severity::Warn as u32);
    /// Severity bit for notices.
    pub const NOTICE: Facilities = Facilities(Severity::Notice as u32);
    /// Severity bit for infos.
    pub const INFO: Facilities = Facilities(Severity::Info as u32);
    /// Severity bit for traces.
    pub const TRACE: Facilities = Facilities(Severity::Trace as u32);
    /// Write to a log file.
    pub const FILE: Facilities = Facilities(0x0100);
    /// Write to the screen (stdout or stderr).
    pub const SCREEN: Facilities = Facilities(0x0200);
    /// Collect lines and send them by email at teardown.
    pub const EMAIL: Facilities = Facilities(0x0400);
    /// Delete an existing log file before logging to it.
    pub const TRUNCATE: Facilities = Facilities(0x0800);
    /// Persist lines as event records.
    pub const EVENT: Facilities = Facilities(0x1000);
    /// Resolve the level through the environment mapping.
    pub const FROM_ENV: Facilities = Facilities(0x8000);

    const NAMES: [(&'static str, Facilities); 12] = [
        ("error", Self::ERROR),
        ("warn", Self::WARN),
        ("notice", Self::NOTICE),
        ("info", Self::INFO),
        ("trace", Self::TRACE),
        ("file", Self::FILE),
        ("screen", Self::SCREEN),
        ("email", Self::EMAIL),
        ("truncate", Self::TRUNCATE),
        ("event", Self::EVENT),
        ("env", Self::FROM_ENV),
        ("none", Self::NONE),
    ];

    /// Constructs from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if any bit of `other` is set.
    #[must_use]
    pub fn test(self, other: Facilities) -> bool {
        test_bits(self.0, other.0)
    }

    /// Returns a copy with the bits of `other` set.
    #[must_use]
    pub fn set(self, other: Facilities) -> Self {
        Self(set_bits(self.0, other.0))
    }

    /// Returns a copy with the bits of `other` cleared.
    #[must_use]
    pub fn clear(self, other: Facilities) -> Self {
        Self(clear_bits(self.0, other.0))
    }

    /// The severity portion, as a number that can be compared by rank.
    #[must_use]
    pub fn severity_bits(self) -> u32 {
        self.0 & SEVERITY_MASK
    }

    /// The most severe severity that is contained, i.e. the lowest severity bit.
    ///
    /// This is the severity a message logged with these facilities is labeled with.
    #[must_use]
    pub fn severity(self) -> Option<Severity> {
        Severity::ALL
            .into_iter()
            .find(|s| test_bits(self.0, s.rank()))
    }

    /// The least severe severity that is contained, i.e. the highest severity bit.
    ///
    /// This is the threshold used for the writers attached by this level.
    #[must_use]
    pub fn threshold(self) -> Option<Severity> {
        Severity::ALL
            .into_iter()
            .rev()
            .find(|s| test_bits(self.0, s.rank()))
    }
}

impl From<Severity> for Facilities {
    fn from(severity: Severity) -> Self {
        Self(severity.rank())
    }
}

impl BitOr for Facilities {
    type Output = Facilities;
    fn bitor(self, rhs: Facilities) -> Facilities {
        self.set(rhs)
    }
}

impl BitOr<Facilities> for Severity {
    type Output = Facilities;
    fn bitor(self, rhs: Facilities) -> Facilities {
        Facilities::from(self).set(rhs)
    }
}

impl fmt::Debug for Facilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Facilities({self})")
    }
}

impl fmt::Display for Facilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, flag) in &Self::NAMES {
            if flag.0 != 0 && self.test(*flag) {
                if !first {
                    f.write_str(", ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}

impl FromStr for Facilities {
    type Err = DebuggerError;

    /// Parses a comma-separated list of flag names, e.g. `"warn, file, email"`.
    ///
    /// A plain number is taken as the raw bitmask.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(bits) = s.parse::<u32>() {
            return Ok(Self(bits));
        }
        let mut facilities = Facilities::NONE;
        for item in s.split([',', '|']).map(str::trim).filter(|i| !i.is_empty()) {
            let lower = item.to_lowercase();
            let flag = Self::NAMES
                .iter()
                .find(|(name, _)| *name == lower)
                .map(|(_, flag)| *flag)
                .ok_or_else(|| DebuggerError::Facilities(item.to_string()))?;
            facilities = facilities.set(flag);
        }
        Ok(facilities)
    }
}

impl TryFrom<String> for Facilities {
    type Error = DebuggerError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// The deployment environment, which decides the default level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "config_file",
    derive(serde_derive::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Environment {
    /// Development.
    Dev,
    /// Test or staging.
    Test,
    /// Production.
    Live,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Dev => "dev",
            Environment::Test => "test",
            Environment::Live => "live",
        })
    }
}

/// How a writer compares a message's severity with its threshold.
#[derive(Clone, Copy, Debug, Default)]
pub enum Comparison {
    /// Accept if the message is at least as severe as the threshold (`<=` by rank).
    #[default]
    LessOrEqual,
    /// Accept if the message is strictly more severe than the threshold.
    Less,
    /// Accept only messages of exactly the threshold severity.
    Equal,
    /// Accept all but the threshold severity.
    NotEqual,
    /// Accept if the message is at most as severe as the threshold.
    GreaterOrEqual,
    /// Accept if the message is strictly less severe than the threshold.
    Greater,
    /// Custom predicate, called with `(message severity, threshold)`.
    Custom(fn(Severity, Severity) -> bool),
}

impl Comparison {
    /// Applies the comparison.
    #[must_use]
    pub fn accepts(self, severity: Severity, threshold: Severity) -> bool {
        let (l, t) = (severity.rank(), threshold.rank());
        match self {
            Comparison::LessOrEqual => l <= t,
            Comparison::Less => l < t,
            Comparison::Equal => l == t,
            Comparison::NotEqual => l != t,
            Comparison::GreaterOrEqual => l >= t,
            Comparison::Greater => l > t,
            Comparison::Custom(predicate) => predicate(severity, threshold),
        }
    }
}

impl FromStr for Comparison {
    type Err = DebuggerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<=" => Ok(Comparison::LessOrEqual),
            "<" => Ok(Comparison::Less),
            "==" | "=" => Ok(Comparison::Equal),
            "!=" => Ok(Comparison::NotEqual),
            ">=" => Ok(Comparison::GreaterOrEqual),
            ">" => Ok(Comparison::Greater),
            other => Err(DebuggerError::Comparison(other.to_string())),
        }
    }
}
