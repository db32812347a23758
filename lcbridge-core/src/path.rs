//! Store paths scoped to the current event.

use crate::StoreError;
use std::fmt;
use std::str::FromStr;

/// Root of every event-scoped path.
pub const EVENT_ROOT: &str = "/Event";

/// Key under which the wrapped event is published.
pub const LC_EVENT_PATH: &str = "/Event/LCEvent";

/// Key under which the presence flag is published.
pub const LC_EVENT_STATUS_PATH: &str = "/Event/LCEventStatus";

/// A validated, absolute path below [`EVENT_ROOT`].
///
/// Relative paths are resolved under the root, so `"LCEvent"` and
/// `"/Event/LCEvent"` name the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorePath(String);

impl StorePath {
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let invalid = |reason: &str| StoreError::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("path is empty"));
        }

        let relative = if let Some(rest) = raw.strip_prefix('/') {
            match rest.strip_prefix(&EVENT_ROOT[1..]) {
                Some("") => return Err(invalid("the event root cannot hold an object")),
                Some(tail) => tail
                    .strip_prefix('/')
                    .ok_or_else(|| invalid("path must be rooted at /Event"))?,
                None => return Err(invalid("path must be rooted at /Event")),
            }
        } else {
            raw
        };

        for segment in relative.split('/') {
            if segment.is_empty() {
                return Err(invalid("path contains an empty segment"));
            }
            if segment.trim() != segment {
                return Err(invalid("path segment has surrounding whitespace"));
            }
        }

        Ok(Self(format!("{}/{}", EVENT_ROOT, relative)))
    }

    /// The slot holding the wrapped event.
    pub fn lc_event() -> Self {
        Self(LC_EVENT_PATH.to_string())
    }

    /// The slot holding the presence flag.
    pub fn lc_event_status() -> Self {
        Self(LC_EVENT_STATUS_PATH.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment of the path.
    pub fn leaf(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StorePath {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for StorePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_and_relative_paths_agree() {
        let absolute = StorePath::parse("/Event/LCEvent").unwrap();
        let relative = StorePath::parse("LCEvent").unwrap();
        assert_eq!(absolute, relative);
        assert_eq!(absolute, StorePath::lc_event());
        assert_eq!(absolute.leaf(), "LCEvent");
    }

    #[test]
    fn test_nested_path() {
        let path: StorePath = "Tracking/Tracks".parse().unwrap();
        assert_eq!(path.as_str(), "/Event/Tracking/Tracks");
        assert_eq!(path.leaf(), "Tracks");
    }

    #[test]
    fn test_fixed_keys_are_distinct() {
        assert_ne!(StorePath::lc_event(), StorePath::lc_event_status());
        assert_eq!(StorePath::lc_event_status().to_string(), LC_EVENT_STATUS_PATH);
    }

    #[test]
    fn test_rejects_invalid_paths() {
        for raw in [
            "",
            "/Event",
            "/Event/",
            "/Run/Header",
            "/EventStore/LCEvent",
            "Tracking//Tracks",
            "Tracking/ Tracks",
        ] {
            assert!(
                matches!(StorePath::parse(raw), Err(StoreError::InvalidPath { .. })),
                "expected {raw:?} to be rejected"
            );
        }
    }
}
