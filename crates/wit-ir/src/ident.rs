//! Package identifiers: `namespace:name[/extension][@version]`.

use semver::Version;
use std::fmt;
use std::str::FromStr;

/// Why [`PackageIdent::parse`] rejected a string. The decoder attaches a
/// JSON path to these before surfacing them as a `DecodeError`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IdentParseError {
    #[error("malformed package identifier {0:?}, expected `ns:name[/ext][@version]`")]
    Malformed(String),
    #[error("invalid semver {0:?}")]
    BadVersion(String),
}

/// A fully-qualified package identifier, e.g. `wasi:clocks@0.2.0` or
/// `wasi:http/proxy`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageIdent {
    pub namespace: String,
    pub name: String,
    pub extension: Option<String>,
    pub version: Option<Version>,
}

impl PackageIdent {
    /// Parses `"ns:pkg[/ext][@ver]"`.
    pub fn parse(s: &str) -> Result<Self, IdentParseError> {
        let bad = || IdentParseError::Malformed(s.to_string());

        let (rest, version) = match s.split_once('@') {
            Some((rest, ver)) => {
                let version = Version::parse(ver).map_err(|_| IdentParseError::BadVersion(ver.to_string()))?;
                (rest, Some(version))
            }
            None => (s, None),
        };

        let (ns_name, extension) = match rest.split_once('/') {
            Some((ns_name, ext)) => {
                if ext.is_empty() {
                    return Err(bad());
                }
                (ns_name, Some(ext.to_string()))
            }
            None => (rest, None),
        };

        let (namespace, name) = ns_name.split_once(':').ok_or_else(bad)?;
        if namespace.is_empty() || name.is_empty() {
            return Err(bad());
        }
        if !is_valid_component(namespace) || !is_valid_component(name) {
            return Err(bad());
        }
        if let Some(ext) = &extension {
            if !is_valid_component(ext) {
                return Err(bad());
            }
        }

        Ok(PackageIdent {
            namespace: namespace.to_string(),
            name: name.to_string(),
            extension,
            version,
        })
    }
}

fn is_valid_component(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

impl fmt::Display for PackageIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)?;
        if let Some(ext) = &self.extension {
            write!(f, "/{ext}")?;
        }
        if let Some(v) = &self.version {
            write!(f, "@{v}")?;
        }
        Ok(())
    }
}

impl FromStr for PackageIdent {
    type Err = IdentParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackageIdent::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_namespace_and_name() {
        let id = PackageIdent::parse("wasi:clocks").unwrap();
        assert_eq!(id.namespace, "wasi");
        assert_eq!(id.name, "clocks");
        assert_eq!(id.extension, None);
        assert_eq!(id.version, None);
    }

    #[test]
    fn parses_version() {
        let id = PackageIdent::parse("wasi:clocks@0.2.0").unwrap();
        assert_eq!(id.version, Some(Version::new(0, 2, 0)));
    }

    #[test]
    fn parses_extension_and_version() {
        let id = PackageIdent::parse("wasi:http/proxy@1.0.0").unwrap();
        assert_eq!(id.extension.as_deref(), Some("proxy"));
        assert_eq!(id.version, Some(Version::new(1, 0, 0)));
    }

    #[test]
    fn rejects_missing_colon() {
        assert!(PackageIdent::parse("wasiclocks").is_err());
    }

    #[test]
    fn rejects_bad_version() {
        assert!(PackageIdent::parse("wasi:clocks@not-a-version").is_err());
    }

    #[test]
    fn display_round_trips() {
        let s = "wasi:http/proxy@1.0.0";
        let id = PackageIdent::parse(s).unwrap();
        assert_eq!(id.to_string(), s);
    }
}
