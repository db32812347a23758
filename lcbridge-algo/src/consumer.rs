//! Downstream access to the event published by [`crate::LcioEventAlgo`].
//!
//! Consumers must check the presence flag before touching the wrapper. A
//! missing flag is treated like a `false` one.

use crate::{Algorithm, EventContext};
use lcbridge_core::{BridgeResult, LcEvent, LcEventWrapper, LcEventWrapperStatus, StorePath};
use lcbridge_store::{EventStore, EventStoreExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Whether the current cycle carries an event.
pub fn has_current_event(store: &dyn EventStore) -> BridgeResult<bool> {
    let flag = store.with_object::<LcEventWrapperStatus, _>(
        &StorePath::lc_event_status(),
        |status| status.has_lc_event,
    )?;
    Ok(flag.unwrap_or(false))
}

/// Borrow the current cycle's event, if the presence flag says there is one.
pub fn current_event<R>(
    store: &dyn EventStore,
    f: impl FnOnce(&LcEvent) -> R,
) -> BridgeResult<Option<R>> {
    if !has_current_event(store)? {
        return Ok(None);
    }
    let result =
        store.with_object::<LcEventWrapper, _>(&StorePath::lc_event(), |w| f(w.event()))?;
    Ok(result)
}

/// Mutably borrow the current cycle's event, if the presence flag says there
/// is one.
pub fn current_event_mut<R>(
    store: &dyn EventStore,
    f: impl FnOnce(&mut LcEvent) -> R,
) -> BridgeResult<Option<R>> {
    if !has_current_event(store)? {
        return Ok(None);
    }
    let result = store
        .with_object_mut::<LcEventWrapper, _>(&StorePath::lc_event(), |w| f(w.event_mut()))?;
    Ok(result)
}

/// Counters kept by [`EventSummary`].
#[derive(Debug, Default)]
pub struct SummaryStats {
    events: AtomicU64,
    empty_cycles: AtomicU64,
    collections: AtomicU64,
}

impl SummaryStats {
    pub fn events(&self) -> u64 {
        self.events.load(Ordering::SeqCst)
    }

    pub fn empty_cycles(&self) -> u64 {
        self.empty_cycles.load(Ordering::SeqCst)
    }

    pub fn collections(&self) -> u64 {
        self.collections.load(Ordering::SeqCst)
    }
}

/// Downstream algorithm logging the event of each cycle.
#[derive(Debug)]
pub struct EventSummary {
    store: Arc<dyn EventStore>,
    stats: Arc<SummaryStats>,
}

impl EventSummary {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            store,
            stats: Arc::new(SummaryStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<SummaryStats> {
        Arc::clone(&self.stats)
    }
}

impl Algorithm for EventSummary {
    fn name(&self) -> &str {
        "EventSummary"
    }

    fn initialize(&mut self) -> BridgeResult<()> {
        Ok(())
    }

    fn execute(&mut self, ctx: &EventContext) -> BridgeResult<()> {
        let seen = current_event(self.store.as_ref(), |event| {
            (
                event.run_number(),
                event.event_number(),
                event.detector_name().to_string(),
                event.collection_count(),
            )
        })?;

        match seen {
            Some((run, number, detector, collections)) => {
                self.stats.events.fetch_add(1, Ordering::SeqCst);
                self.stats
                    .collections
                    .fetch_add(collections as u64, Ordering::SeqCst);
                tracing::info!(
                    cycle = ctx.cycle(),
                    run,
                    event = number,
                    detector = %detector,
                    collections,
                    "Event summary"
                );
            }
            None => {
                self.stats.empty_cycles.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(cycle = ctx.cycle(), "No LCEvent in this cycle");
            }
        }
        Ok(())
    }

    fn finalize(&mut self) -> BridgeResult<()> {
        tracing::info!(
            events = self.stats.events(),
            empty_cycles = self.stats.empty_cycles(),
            collections = self.stats.collections(),
            "Event summary totals"
        );
        Ok(())
    }
}
