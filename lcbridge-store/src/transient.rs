//! In-memory transient event store.

use crate::{EventStore, StoreResult};
use lcbridge_core::{DataObject, StoreError, StorePath};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// In-memory [`EventStore`] used by the host loop and in tests.
///
/// Besides the objects themselves it keeps a log of every successful
/// registration since the last [`EventStore::clear`], so callers can check
/// what a cycle wrote.
#[derive(Debug, Default)]
pub struct TransientEventStore {
    objects: RwLock<BTreeMap<StorePath, Box<dyn DataObject>>>,
    registrations: RwLock<Vec<StorePath>>,
}

impl TransientEventStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently held.
    pub fn len(&self) -> StoreResult<usize> {
        let objects = self.objects.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(objects.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Successful registrations since the last clear, in order.
    pub fn registrations(&self) -> StoreResult<Vec<StorePath>> {
        let log = self
            .registrations
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(log.clone())
    }

    /// How many times `path` was registered since the last clear.
    pub fn registration_count(&self, path: &StorePath) -> StoreResult<usize> {
        let log = self
            .registrations
            .read()
            .map_err(|_| StoreError::LockPoisoned)?;
        Ok(log.iter().filter(|p| *p == path).count())
    }
}

impl EventStore for TransientEventStore {
    fn register_object(&self, path: &StorePath, object: Box<dyn DataObject>) -> StoreResult<()> {
        let mut objects = self.objects.write().map_err(|_| StoreError::LockPoisoned)?;
        if objects.contains_key(path) {
            return Err(StoreError::AlreadyRegistered {
                path: path.to_string(),
            });
        }
        tracing::trace!(path = %path, class = object.class_name(), "Registered object");
        objects.insert(path.clone(), object);
        self.registrations
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .push(path.clone());
        Ok(())
    }

    fn unregister_object(&self, path: &StorePath) -> StoreResult<Option<Box<dyn DataObject>>> {
        let mut objects = self.objects.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(objects.remove(path))
    }

    fn inspect(
        &self,
        path: &StorePath,
        visit: &mut dyn FnMut(&dyn DataObject),
    ) -> StoreResult<bool> {
        let objects = self.objects.read().map_err(|_| StoreError::LockPoisoned)?;
        match objects.get(path) {
            Some(object) => {
                visit(&**object);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn inspect_mut(
        &self,
        path: &StorePath,
        visit: &mut dyn FnMut(&mut dyn DataObject),
    ) -> StoreResult<bool> {
        let mut objects = self.objects.write().map_err(|_| StoreError::LockPoisoned)?;
        match objects.get_mut(path) {
            Some(object) => {
                visit(&mut **object);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn contains(&self, path: &StorePath) -> StoreResult<bool> {
        let objects = self.objects.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(objects.contains_key(path))
    }

    fn paths(&self) -> StoreResult<Vec<StorePath>> {
        let objects = self.objects.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(objects.keys().cloned().collect())
    }

    fn clear(&self) -> StoreResult<usize> {
        let dropped = {
            let mut objects = self.objects.write().map_err(|_| StoreError::LockPoisoned)?;
            let dropped = objects.len();
            objects.clear();
            dropped
        };
        self.registrations
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .clear();
        tracing::debug!(dropped, "Cleared transient event store");
        Ok(dropped)
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use lcbridge_core::LcEventWrapperStatus;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// A path accepts one registration per cycle; clear drops exactly the
        /// distinct paths that were registered.
        #[test]
        fn prop_one_object_per_path(names in prop::collection::vec("[A-Za-z]{1,8}", 1..20)) {
            let store = TransientEventStore::new();
            let mut accepted = BTreeSet::new();

            for name in &names {
                let path = StorePath::parse(name).unwrap();
                let result = store.register_object(&path, Box::new(LcEventWrapperStatus::new(true)));
                if accepted.insert(path.clone()) {
                    prop_assert!(result.is_ok());
                } else {
                    let is_duplicate = matches!(result, Err(StoreError::AlreadyRegistered { .. }));
                    prop_assert!(is_duplicate);
                }
            }

            for path in &accepted {
                prop_assert_eq!(store.registration_count(path).unwrap(), 1);
            }
            prop_assert_eq!(store.clear().unwrap(), accepted.len());
        }
    }
}
