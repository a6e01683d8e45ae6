use semver::Version;

/// Feature-gating metadata attached to a world, interface, type or function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stability {
    Unknown,
    Stable {
        since: Version,
        deprecated: Option<Version>,
    },
    Unstable {
        feature: String,
        deprecated: Option<Version>,
    },
}

impl Default for Stability {
    fn default() -> Self {
        Stability::Unknown
    }
}

impl Stability {
    pub fn is_deprecated(&self) -> bool {
        match self {
            Stability::Unknown => false,
            Stability::Stable { deprecated, .. } => deprecated.is_some(),
            Stability::Unstable { deprecated, .. } => deprecated.is_some(),
        }
    }
}
