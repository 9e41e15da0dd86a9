//! Document version labels.
//!
//! A version label looks like `coreil-1.10` or `coreil-1.10.5`. Versions are
//! totally ordered component-wise, and every later version is a strict
//! superset of the earlier ones: nothing is ever removed or reinterpreted.

use std::fmt;

/// A parsed `coreil-MAJOR.MINOR[.PATCH]` label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u16,
    minor: u16,
    patch: u16,
}

impl Version {
    pub const V0_1: Version = Version::new(0, 1, 0);
    pub const V0_2: Version = Version::new(0, 2, 0);
    pub const V0_3: Version = Version::new(0, 3, 0);
    pub const V0_4: Version = Version::new(0, 4, 0);
    pub const V0_5: Version = Version::new(0, 5, 0);
    pub const V1_0: Version = Version::new(1, 0, 0);
    pub const V1_1: Version = Version::new(1, 1, 0);
    pub const V1_2: Version = Version::new(1, 2, 0);
    pub const V1_3: Version = Version::new(1, 3, 0);
    pub const V1_4: Version = Version::new(1, 4, 0);
    pub const V1_5: Version = Version::new(1, 5, 0);
    pub const V1_6: Version = Version::new(1, 6, 0);
    pub const V1_7: Version = Version::new(1, 7, 0);
    pub const V1_8: Version = Version::new(1, 8, 0);
    pub const V1_9: Version = Version::new(1, 9, 0);
    pub const V1_10: Version = Version::new(1, 10, 0);
    pub const V1_10_5: Version = Version::new(1, 10, 5);

    /// The newest label this workspace understands.
    pub const LATEST: Version = Version::V1_10_5;

    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Look up a label among the supported versions.
    ///
    /// Only exact spellings are accepted: `coreil-1.10` is supported,
    /// `coreil-1.10.0` and `1.10` are not.
    pub fn from_label(label: &str) -> Option<Version> {
        SUPPORTED_VERSIONS
            .iter()
            .copied()
            .find(|v| v.to_string() == label)
    }

    /// Sealed documents (0.5 and later) must use explicit primitives
    /// instead of the legacy helper calls.
    pub fn is_sealed(self) -> bool {
        self >= Version::V0_5
    }

    /// Negative `Index` literals became legal in 1.5.
    pub fn allows_negative_index(self) -> bool {
        self >= Version::V1_5
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "coreil-{}.{}", self.major, self.minor)?;
        if self.patch != 0 {
            write!(f, ".{}", self.patch)?;
        }
        Ok(())
    }
}

impl serde::Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Every accepted version label, oldest first.
pub const SUPPORTED_VERSIONS: &[Version] = &[
    Version::V0_1,
    Version::V0_2,
    Version::V0_3,
    Version::V0_4,
    Version::V0_5,
    Version::V1_0,
    Version::V1_1,
    Version::V1_2,
    Version::V1_3,
    Version::V1_4,
    Version::V1_5,
    Version::V1_6,
    Version::V1_7,
    Version::V1_8,
    Version::V1_9,
    Version::V1_10,
    Version::V1_10_5,
];

/// The violation text for a missing or unsupported version label.
pub fn unsupported_version_message() -> String {
    let labels: Vec<String> = SUPPORTED_VERSIONS
        .iter()
        .map(|v| format!("'{v}'"))
        .collect();
    format!("version must be one of: {}", labels.join(", "))
}
