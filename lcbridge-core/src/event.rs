//! Decoded event types handed over by an event reader.
//!
//! The bridge treats the event as opaque. These types carry just enough
//! structure for readers to build events and for downstream algorithms to
//! inspect them.

use crate::EventError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Access mode requested when reading an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessMode {
    /// Event contents may not be modified
    #[default]
    Read,
    /// Collections and parameters may be added or removed
    Update,
}

/// A named collection of elements inside an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LcCollection {
    pub type_name: String,
    #[serde(default)]
    pub elements: Vec<serde_json::Value>,
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

impl LcCollection {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            elements: Vec::new(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_elements(mut self, elements: Vec<serde_json::Value>) -> Self {
        self.elements = elements;
        self
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// One decoded event.
///
/// Deliberately not `Clone`: an event has exactly one owner, which moves
/// from the reader into an [`crate::LcEventWrapper`] and from there into the
/// transient store.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LcEvent {
    run_number: i32,
    event_number: i32,
    #[serde(default)]
    detector_name: String,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    collections: BTreeMap<String, LcCollection>,
    #[serde(default)]
    parameters: BTreeMap<String, serde_json::Value>,
    #[serde(skip)]
    access: AccessMode,
}

impl LcEvent {
    pub fn new(run_number: i32, event_number: i32) -> Self {
        Self {
            run_number,
            event_number,
            detector_name: String::new(),
            timestamp: None,
            collections: BTreeMap::new(),
            parameters: BTreeMap::new(),
            access: AccessMode::Read,
        }
    }

    pub fn with_detector(mut self, detector_name: impl Into<String>) -> Self {
        self.detector_name = detector_name.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Attach a collection while building the event. Replaces any collection
    /// of the same name.
    pub fn with_collection(mut self, name: impl Into<String>, collection: LcCollection) -> Self {
        self.collections.insert(name.into(), collection);
        self
    }

    /// Set the access mode the event was handed out with.
    pub fn with_access(mut self, access: AccessMode) -> Self {
        self.access = access;
        self
    }

    pub fn run_number(&self) -> i32 {
        self.run_number
    }

    pub fn event_number(&self) -> i32 {
        self.event_number
    }

    pub fn detector_name(&self) -> &str {
        &self.detector_name
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn access(&self) -> AccessMode {
        self.access
    }

    pub fn is_read_only(&self) -> bool {
        self.access == AccessMode::Read
    }

    pub fn collection(&self, name: &str) -> Option<&LcCollection> {
        self.collections.get(name)
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    pub fn parameter(&self, name: &str) -> Option<&serde_json::Value> {
        self.parameters.get(name)
    }

    /// Add a collection to an update-capable event.
    pub fn add_collection(
        &mut self,
        name: impl Into<String>,
        collection: LcCollection,
    ) -> Result<(), EventError> {
        self.ensure_writable()?;
        let name = name.into();
        if self.collections.contains_key(&name) {
            return Err(EventError::DuplicateCollection { name });
        }
        self.collections.insert(name, collection);
        Ok(())
    }

    /// Remove a collection from an update-capable event.
    pub fn remove_collection(&mut self, name: &str) -> Result<LcCollection, EventError> {
        self.ensure_writable()?;
        self.collections
            .remove(name)
            .ok_or_else(|| EventError::CollectionNotFound {
                name: name.to_string(),
            })
    }

    pub fn set_parameter(
        &mut self,
        name: impl Into<String>,
        value: serde_json::Value,
    ) -> Result<(), EventError> {
        self.ensure_writable()?;
        self.parameters.insert(name.into(), value);
        Ok(())
    }

    fn ensure_writable(&self) -> Result<(), EventError> {
        if self.is_read_only() {
            return Err(EventError::ReadOnly {
                run: self.run_number,
                event: self.event_number,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hits() -> LcCollection {
        LcCollection::new("SimTrackerHit").with_elements(vec![json!({"cellID": 1})])
    }

    #[test]
    fn test_new_event_is_read_only() {
        let event = LcEvent::new(1, 2);
        assert_eq!(event.access(), AccessMode::Read);
        assert!(event.is_read_only());
    }

    #[test]
    fn test_read_only_event_rejects_mutation() {
        let mut event = LcEvent::new(1, 2);
        let err = event.add_collection("Hits", hits()).unwrap_err();
        assert_eq!(err, EventError::ReadOnly { run: 1, event: 2 });
        assert!(event.set_parameter("Energy", json!(250.0)).is_err());
        assert_eq!(event.collection_count(), 0);
    }

    #[test]
    fn test_update_event_accepts_mutation() {
        let mut event = LcEvent::new(1, 2).with_access(AccessMode::Update);
        event.add_collection("Hits", hits()).unwrap();
        event.set_parameter("Energy", json!(250.0)).unwrap();
        assert_eq!(event.collection("Hits").map(LcCollection::len), Some(1));
        assert_eq!(event.parameter("Energy"), Some(&json!(250.0)));

        let removed = event.remove_collection("Hits").unwrap();
        assert_eq!(removed.type_name, "SimTrackerHit");
        assert!(matches!(
            event.remove_collection("Hits"),
            Err(EventError::CollectionNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_collection_rejected() {
        let mut event = LcEvent::new(1, 2)
            .with_access(AccessMode::Update)
            .with_collection("Hits", hits());
        assert_eq!(
            event.add_collection("Hits", hits()),
            Err(EventError::DuplicateCollection {
                name: "Hits".to_string()
            })
        );
    }

    #[test]
    fn test_deserialize_minimal_event() {
        let event: LcEvent = serde_json::from_str(r#"{"run_number": 4, "event_number": 9}"#).unwrap();
        assert_eq!(event.run_number(), 4);
        assert_eq!(event.event_number(), 9);
        assert_eq!(event.detector_name(), "");
        assert!(event.timestamp().is_none());
        assert!(event.is_read_only());
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let parsed: Result<LcEvent, _> =
            serde_json::from_str(r#"{"run_number": 4, "event_number": 9, "weight": 1.0}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_collection_names_are_sorted() {
        let event = LcEvent::new(0, 0)
            .with_collection("Tracks", LcCollection::new("Track"))
            .with_collection("Clusters", LcCollection::new("Cluster"));
        let names: Vec<&str> = event.collection_names().collect();
        assert_eq!(names, vec!["Clusters", "Tracks"]);
    }
}
