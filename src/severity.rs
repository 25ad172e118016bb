use std::fmt::{Display, Formatter};
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use thiserror::Error;

/// Severity of a report line or a check result.
///
/// The discriminants are single bits so severities can be combined into a [`SeverityMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    #[default]
    Undefined = 0x00,
    Info = 0x01,
    Exclusion = 0x02,
    Action = 0x04,
    Warning = 0x08,
    Error = 0x10,
    Ignore = 0x20,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Info,
        Severity::Exclusion,
        Severity::Action,
        Severity::Warning,
        Severity::Error,
        Severity::Ignore,
    ];

    pub fn bits(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::Undefined => "undefined",
            Severity::Info => "info",
            Severity::Exclusion => "exclusion",
            Severity::Action => "action",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Ignore => "ignore",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeverityParseError {
    #[error("Unknown severity. name: '{0}'")]
    UnknownSeverity(String),
    #[error("Empty severity name in '{0}'")]
    EmptyName(String),
}

impl FromStr for Severity {
    type Err = SeverityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(SeverityParseError::EmptyName(s.to_string()));
        }

        match name.to_ascii_lowercase().as_str() {
            "undefined" => Ok(Severity::Undefined),
            "info" | "information" => Ok(Severity::Info),
            "exclusion" | "excluded" => Ok(Severity::Exclusion),
            "action" => Ok(Severity::Action),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "ignore" | "ignored" => Ok(Severity::Ignore),
            _ => Err(SeverityParseError::UnknownSeverity(name.to_string())),
        }
    }
}

/// A set of enabled severities.
///
/// Used to choose which check results a provider exposes and which report lines a panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SeverityMask(u32);

impl SeverityMask {
    pub const NONE: SeverityMask = SeverityMask(0);
    pub const ALL: SeverityMask = SeverityMask(0x3f);
    pub const ERRORS: SeverityMask = SeverityMask(Severity::Error as u32);
    pub const WARNINGS: SeverityMask = SeverityMask(Severity::Warning as u32);
    /// The default filter of a check dialog, errors and warnings.
    pub const ERRORS_AND_WARNINGS: SeverityMask = SeverityMask(Severity::Error as u32 | Severity::Warning as u32);

    /// Unknown bits are dropped.
    pub fn from_bits(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `Undefined` has no bit, so no mask contains it.
    pub fn contains(self, severity: Severity) -> bool {
        self.0 & severity.bits() != 0
    }

    pub fn with(self, severity: Severity) -> Self {
        Self(self.0 | severity.bits())
    }

    pub fn without(self, severity: Severity) -> Self {
        Self(self.0 & !severity.bits())
    }

    pub fn set(&mut self, severity: Severity, enabled: bool) {
        *self = match enabled {
            true => self.with(severity),
            false => self.without(severity),
        };
    }

    pub fn iter(self) -> impl Iterator<Item = Severity> {
        Severity::ALL
            .into_iter()
            .filter(move |severity| self.0 & severity.bits() != 0)
    }
}

impl From<Severity> for SeverityMask {
    fn from(value: Severity) -> Self {
        SeverityMask(value.bits())
    }
}

impl BitOr for SeverityMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        SeverityMask(self.0 | rhs.0)
    }
}

impl BitOr<Severity> for SeverityMask {
    type Output = Self;

    fn bitor(self, rhs: Severity) -> Self::Output {
        self.with(rhs)
    }
}

impl BitOr for Severity {
    type Output = SeverityMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        SeverityMask::from(self).with(rhs)
    }
}

impl BitOrAssign<Severity> for SeverityMask {
    fn bitor_assign(&mut self, rhs: Severity) {
        *self = self.with(rhs);
    }
}

/// Formats as `none`, `all`, or the enabled names joined with `|`, e.g. `warning|error`.
impl Display for SeverityMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        if *self == Self::ALL {
            return f.write_str("all");
        }

        let names: Vec<&str> = self.iter().map(Severity::name).collect();
        f.write_str(&names.join("|"))
    }
}

/// Accepts the [`Display`] form, plus `,` as an alternative separator.
impl FromStr for SeverityMask {
    type Err = SeverityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => return Ok(Self::NONE),
            "all" => return Ok(Self::ALL),
            _ => {}
        }

        s.split(['|', ','])
            .try_fold(Self::NONE, |mask, name| {
                let severity = name
                    .parse::<Severity>()
                    .map_err(|err| match err {
                        SeverityParseError::EmptyName(_) => SeverityParseError::EmptyName(s.to_string()),
                        other => other,
                    })?;
                Ok(mask.with(severity))
            })
    }
}
