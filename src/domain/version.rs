use crate::error::{UpdateCompatError, Result};
use std::fmt;
use std::str::FromStr;

/// Prefix of every compatibility shim module (`Coq812`)
pub const SHIM_PREFIX: &str = "Coq";

/// Major versions whose shim names can be read back
const SHIM_MAJORS: [&str; 2] = ["8", "9"];

/// Library path under which the shim modules live
pub const SHIM_LIBRARY: &str = "Coq.Compat";

/// A `major.minor` version accepted by the `-compat` flag
///
/// Ordering compares the numeric pair, so `9.2 < 10.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompatVersion {
    pub major: u32,
    pub minor: u32,
}

impl CompatVersion {
    /// Create a new version
    pub fn new(major: u32, minor: u32) -> Self {
        CompatVersion { major, minor }
    }

    /// Parse a dotted version string (e.g., "8.12" -> CompatVersion(8,12))
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 2 {
            return Err(UpdateCompatError::version(format!(
                "Invalid version format: '{}' - expected X.Y",
                s
            )));
        }

        let major = parse_component(parts[0], "major", s)?;
        let minor = parse_component(parts[1], "minor", s)?;

        Ok(CompatVersion { major, minor })
    }

    /// Parse a shim module or file name (e.g., "Coq812.v" -> 8.12)
    ///
    /// Only a major version of 8 or 9 followed by a one- or two-digit minor
    /// version reads back unambiguously; "Coq100" is an error.
    pub fn from_shim_name(name: &str) -> Result<Self> {
        let stem = name.strip_suffix(".v").unwrap_or(name);
        let digits = stem.strip_prefix(SHIM_PREFIX).ok_or_else(|| {
            UpdateCompatError::version(format!("Not a compatibility shim name: '{}'", name))
        })?;

        let well_formed = (2..=3).contains(&digits.len())
            && digits.chars().all(|c| c.is_ascii_digit())
            && SHIM_MAJORS.iter().any(|major| digits.starts_with(*major));
        if !well_formed {
            return Err(UpdateCompatError::version(format!(
                "Invalid compatibility shim name: '{}'",
                name
            )));
        }

        let (major, minor) = digits.split_at(1);
        Self::parse(&format!("{}.{}", major, minor))
    }

    /// Dotted form, as written on the command line ("8.12")
    pub fn dotted(&self) -> String {
        self.to_string()
    }

    /// Concatenated form used in identifiers and file names ("812")
    pub fn concatenated(&self) -> String {
        format!("{}{}", self.major, self.minor)
    }

    /// Shim module name ("Coq812")
    pub fn shim_name(&self) -> String {
        format!("{}{}", SHIM_PREFIX, self.concatenated())
    }

    /// Shim file name ("Coq812.v")
    pub fn shim_file_name(&self) -> String {
        format!("{}.v", self.shim_name())
    }

    /// Fully qualified shim module ("Coq.Compat.Coq812")
    pub fn shim_module(&self) -> String {
        format!("{}.{}", SHIM_LIBRARY, self.shim_name())
    }

    /// Identifier form used for version constructors ("V8_12")
    pub fn flag_ident(&self) -> String {
        format!("V{}_{}", self.major, self.minor)
    }
}

fn parse_component(part: &str, which: &str, original: &str) -> Result<u32> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(UpdateCompatError::version(format!(
            "Invalid {} version in '{}': '{}'",
            which, original, part
        )));
    }
    part.parse::<u32>().map_err(|_| {
        UpdateCompatError::version(format!(
            "Invalid {} version in '{}': '{}'",
            which, original, part
        ))
    })
}

impl FromStr for CompatVersion {
    type Err = UpdateCompatError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CompatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
