//! Objects published into the transient event store.

use crate::LcEvent;
use std::any::Any;
use std::fmt;

/// Anything that can be registered in the transient event store.
///
/// The store owns registered objects as `Box<dyn DataObject>`; readers get
/// them back through [`DataObject::as_any`] or [`DataObject::into_any`].
pub trait DataObject: Any + Send + Sync + fmt::Debug {
    /// Human-readable class name, used in logs and type-mismatch errors.
    fn class_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

macro_rules! impl_data_object {
    ($ty:ty, $name:literal) => {
        impl DataObject for $ty {
            fn class_name(&self) -> &'static str {
                $name
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }

            fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
                self
            }
        }
    };
}

/// Sole owner of one decoded event while it sits in the store.
#[derive(Debug)]
pub struct LcEventWrapper {
    event: LcEvent,
}

impl LcEventWrapper {
    /// Take ownership of `event`.
    pub fn new(event: LcEvent) -> Self {
        Self { event }
    }

    pub fn event(&self) -> &LcEvent {
        &self.event
    }

    pub fn event_mut(&mut self) -> &mut LcEvent {
        &mut self.event
    }

    /// Give the event back, consuming the wrapper.
    pub fn into_event(self) -> LcEvent {
        self.event
    }
}

impl_data_object!(LcEventWrapper, "LCEventWrapper");

/// Presence flag: whether this cycle produced a real event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcEventWrapperStatus {
    pub has_lc_event: bool,
}

impl LcEventWrapperStatus {
    pub fn new(has_lc_event: bool) -> Self {
        Self { has_lc_event }
    }
}

impl_data_object!(LcEventWrapperStatus, "LCEventWrapperStatus");
