//! Namespaces in which slugs must be unique.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scope of a slug uniqueness constraint.
///
/// A slug issued for a link may coincide with a project slug; uniqueness is
/// only enforced within one namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugNamespace {
    #[default]
    Link,
    Project,
}

impl SlugNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for SlugNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SlugNamespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "link" => Ok(Self::Link),
            "project" => Ok(Self::Project),
            other => Err(format!("unknown slug namespace '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_round_trips_through_str() {
        assert_eq!("link".parse::<SlugNamespace>().unwrap(), SlugNamespace::Link);
        assert_eq!("PROJECT".parse::<SlugNamespace>().unwrap(), SlugNamespace::Project);
        assert!("user".parse::<SlugNamespace>().is_err());
    }

    #[test]
    fn test_namespace_serializes_lowercase() {
        let json = serde_json::to_string(&SlugNamespace::Project).unwrap();
        assert_eq!(json, "\"project\"");
    }
}
