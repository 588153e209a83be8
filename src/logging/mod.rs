use crate::error::LogError;
use crate::types::{now_timestamp, EventId, ResourceId, Timestamp};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Lifetime events recorded by resources and scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceKind {
    /// Resource allocated under its first owner.
    Created,
    /// Exclusive ownership moved between handles.
    Transferred,
    /// A shared owner was added.
    Cloned,
    /// A shared owner gave up its share (drop or reset) without the
    /// resource dying.
    Released,
    /// The resource's storage was reclaimed. Exactly one per resource.
    Destroyed,
    /// An observer was bound to a live resource.
    Observed,
    /// An observer was upgraded to a temporary shared owner.
    Upgraded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub event_id: EventId,
    pub seq: u64,
    pub timestamp: Timestamp,
    pub kind: TraceKind,
    pub resource: ResourceId,
    /// Strong count observed right after the event, where meaningful.
    pub count: Option<usize>,
    pub prev_hash: [u8; 32],
    pub hash: [u8; 32],
}

/// Append-only, hash-chained log of lifetime events. Interior mutability so
/// resources can record their own destruction from `Drop`.
#[derive(Debug, Default)]
pub struct TraceLog {
    inner: Mutex<Vec<TraceEvent>>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, kind: TraceKind, resource: ResourceId, count: Option<usize>) -> EventId {
        let mut guard = self.inner.lock();
        let prev_hash = guard.last().map(|e| e.hash).unwrap_or([0u8; 32]);
        let mut event = TraceEvent {
            event_id: EventId::new(),
            seq: guard.len() as u64,
            timestamp: now_timestamp(),
            kind,
            resource,
            count,
            prev_hash,
            hash: [0u8; 32],
        };
        event.hash = compute_hash(&event);
        let id = event.event_id;
        tracing::debug!(?kind, %resource, ?count, seq = event.seq, "trace event");
        guard.push(event);
        id
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.inner.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Recompute the chain front to back.
    pub fn verify_integrity(&self) -> Result<(), LogError> {
        let guard = self.inner.lock();
        let mut prev = [0u8; 32];
        for (index, e) in guard.iter().enumerate() {
            if e.prev_hash != prev {
                return Err(LogError::IntegrityViolation { index });
            }
            if e.hash != compute_hash(e) {
                return Err(LogError::IntegrityViolation { index });
            }
            prev = e.hash;
        }
        Ok(())
    }

    /// How many `Destroyed` events a resource has. Anything but 1 for a
    /// resource that lived and died is a bug.
    pub fn destruction_count(&self, resource: ResourceId) -> usize {
        self.inner
            .lock()
            .iter()
            .filter(|e| e.kind == TraceKind::Destroyed && e.resource == resource)
            .count()
    }

    /// Resources in the order their `Destroyed` events were recorded.
    pub fn destruction_order(&self) -> Vec<ResourceId> {
        self.inner
            .lock()
            .iter()
            .filter(|e| e.kind == TraceKind::Destroyed)
            .map(|e| e.resource)
            .collect()
    }

    /// Test hook: overwrite one event without re-chaining, so integrity
    /// checking has something to catch.
    #[doc(hidden)]
    pub fn tamper_with(&self, index: usize, kind: TraceKind) {
        let mut guard = self.inner.lock();
        if let Some(e) = guard.get_mut(index) {
            e.kind = kind;
        }
    }
}

fn compute_hash(event: &TraceEvent) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(event.event_id.0.as_bytes());
    hasher.update(event.seq.to_le_bytes());
    hasher.update(event.timestamp.to_le_bytes());
    hasher.update([kind_tag(event.kind)]);
    hasher.update(event.resource.0.as_bytes());
    match event.count {
        Some(c) => {
            hasher.update([1]);
            hasher.update((c as u64).to_le_bytes());
        }
        None => hasher.update([0]),
    }
    hasher.update(event.prev_hash);
    hasher.finalize().into()
}

fn kind_tag(kind: TraceKind) -> u8 {
    match kind {
        TraceKind::Created => 0,
        TraceKind::Transferred => 1,
        TraceKind::Cloned => 2,
        TraceKind::Released => 3,
        TraceKind::Destroyed => 4,
        TraceKind::Observed => 5,
        TraceKind::Upgraded => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_verifies_and_tampering_is_detected() {
        let log = TraceLog::new();
        let r = ResourceId::new();
        log.record(TraceKind::Created, r, Some(1));
        log.record(TraceKind::Cloned, r, Some(2));
        log.record(TraceKind::Destroyed, r, Some(0));
        assert!(log.verify_integrity().is_ok());

        log.tamper_with(1, TraceKind::Released);
        assert_eq!(
            log.verify_integrity(),
            Err(LogError::IntegrityViolation { index: 1 })
        );
    }

    #[test]
    fn destruction_count_filters_by_resource() {
        let log = TraceLog::new();
        let a = ResourceId::new();
        let b = ResourceId::new();
        log.record(TraceKind::Created, a, Some(1));
        log.record(TraceKind::Created, b, Some(1));
        log.record(TraceKind::Destroyed, b, Some(0));
        assert_eq!(log.destruction_count(a), 0);
        assert_eq!(log.destruction_count(b), 1);
        assert_eq!(log.destruction_order(), vec![b]);
    }
}
