//! LCBRIDGE Store - Transient Event Store Trait and In-Memory Implementation
//!
//! The transient event store is a key-value store scoped to one processing
//! cycle. Algorithms publish objects under [`StorePath`] keys, downstream
//! algorithms read them back, and the host clears the store when the cycle
//! ends.

mod transient;

pub use transient::TransientEventStore;

use lcbridge_core::{DataObject, StoreError, StorePath};
use std::fmt;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Event-scoped object store.
///
/// Every registered object is owned by the store until it is unregistered or
/// the cycle is cleared. A path holds at most one object per cycle.
pub trait EventStore: Send + Sync + fmt::Debug {
    /// Publish `object` under `path`, transferring ownership to the store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyRegistered` if the path is occupied.
    fn register_object(&self, path: &StorePath, object: Box<dyn DataObject>) -> StoreResult<()>;

    /// Move the object at `path` out of the store.
    fn unregister_object(&self, path: &StorePath) -> StoreResult<Option<Box<dyn DataObject>>>;

    /// Borrow the object at `path`. Returns `false` if the path is empty.
    fn inspect(
        &self,
        path: &StorePath,
        visit: &mut dyn FnMut(&dyn DataObject),
    ) -> StoreResult<bool>;

    /// Mutably borrow the object at `path`. Returns `false` if the path is
    /// empty.
    fn inspect_mut(
        &self,
        path: &StorePath,
        visit: &mut dyn FnMut(&mut dyn DataObject),
    ) -> StoreResult<bool>;

    /// Check whether `path` currently holds an object.
    fn contains(&self, path: &StorePath) -> StoreResult<bool>;

    /// Paths currently holding an object, in sorted order.
    fn paths(&self) -> StoreResult<Vec<StorePath>>;

    /// End the cycle: drop every object. Returns how many were dropped.
    fn clear(&self) -> StoreResult<usize>;
}

/// Typed convenience methods over [`EventStore`].
pub trait EventStoreExt: EventStore {
    /// Borrow the object at `path` as a `T`.
    ///
    /// Returns `Ok(None)` when the path is empty and
    /// `StoreError::TypeMismatch` when it holds something else.
    fn with_object<T: DataObject, R>(
        &self,
        path: &StorePath,
        f: impl FnOnce(&T) -> R,
    ) -> StoreResult<Option<R>> {
        let mut f = Some(f);
        let mut out: Option<StoreResult<Option<R>>> = None;
        self.inspect(path, &mut |object| {
            out = Some(match object.as_any().downcast_ref::<T>() {
                Some(typed) => Ok(f.take().map(|f| f(typed))),
                None => Err(StoreError::TypeMismatch {
                    path: path.to_string(),
                    expected: short_type_name::<T>(),
                    found: object.class_name(),
                }),
            });
        })?;
        out.transpose().map(Option::flatten)
    }

    /// Mutably borrow the object at `path` as a `T`.
    fn with_object_mut<T: DataObject, R>(
        &self,
        path: &StorePath,
        f: impl FnOnce(&mut T) -> R,
    ) -> StoreResult<Option<R>> {
        let mut f = Some(f);
        let mut out: Option<StoreResult<Option<R>>> = None;
        self.inspect_mut(path, &mut |object| {
            let found = object.class_name();
            out = Some(match object.as_any_mut().downcast_mut::<T>() {
                Some(typed) => Ok(f.take().map(|f| f(typed))),
                None => Err(StoreError::TypeMismatch {
                    path: path.to_string(),
                    expected: short_type_name::<T>(),
                    found,
                }),
            });
        })?;
        out.transpose().map(Option::flatten)
    }

    /// Move the object at `path` out of the store as a `T`.
    ///
    /// On a type mismatch `StoreError::TypeMismatch` is returned and the
    /// object is put back. If the store refuses it, the failure is logged and
    /// the object is dropped.
    fn take<T: DataObject>(&self, path: &StorePath) -> StoreResult<Option<T>> {
        let Some(object) = self.unregister_object(path)? else {
            return Ok(None);
        };
        if !object.as_any().is::<T>() {
            let found = object.class_name();
            if let Err(e) = self.register_object(path, object) {
                tracing::error!(
                    path = %path,
                    class = found,
                    error = %e,
                    "Failed to put back mismatched object, it is dropped"
                );
            }
            return Err(StoreError::TypeMismatch {
                path: path.to_string(),
                expected: short_type_name::<T>(),
                found,
            });
        }
        object
            .into_any()
            .downcast::<T>()
            .map(|typed| Some(*typed))
            .map_err(|_| StoreError::TypeMismatch {
                path: path.to_string(),
                expected: short_type_name::<T>(),
                found: "unknown",
            })
    }
}

impl<S: EventStore + ?Sized> EventStoreExt for S {}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
