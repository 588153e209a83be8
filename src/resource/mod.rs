use crate::logging::{TraceKind, TraceLog};
use crate::types::ResourceId;
use std::sync::Arc;

/// A unit of allocated state whose only job is to make lifetime events
/// observable. Carries its identity and a handle to the trace log; dropping
/// it records exactly one `Destroyed` event.
#[derive(Debug)]
pub struct Resource {
    id: ResourceId,
    log: Arc<TraceLog>,
}

impl Resource {
    /// Allocate a fresh resource and record its creation.
    pub fn new(log: Arc<TraceLog>) -> Self {
        let id = ResourceId::new();
        log.record(TraceKind::Created, id, None);
        Self { id, log }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }
}

impl Drop for Resource {
    fn drop(&mut self) {
        self.log.record(TraceKind::Destroyed, self.id, Some(0));
    }
}
