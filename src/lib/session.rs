use super::error::ImportError;
use super::pipeline::ImportStage;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// What happens when an upload starts while another is still running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConcurrencyPolicy {
    /// The newer upload wins; the older one stops before its next commit.
    #[default]
    Supersede,
    /// The newer upload is refused until the running one finishes.
    Reject,
}

#[derive(Debug, Default)]
struct Slot {
    generation: AtomicU64,
    live: AtomicUsize,
}

/// Hands out one ticket per upload. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct ImportSession {
    policy: ConcurrencyPolicy,
    slot: Arc<Slot>,
}

impl ImportSession {
    pub fn new(policy: ConcurrencyPolicy) -> Self {
        ImportSession {
            policy,
            slot: Arc::default(),
        }
    }

    pub fn policy(&self) -> ConcurrencyPolicy {
        self.policy
    }

    pub fn begin(&self) -> Result<ImportTicket, ImportError> {
        match self.policy {
            ConcurrencyPolicy::Reject => {
                self.slot
                    .live
                    .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
                    .map_err(|_| ImportError::Busy)?;
            }
            ConcurrencyPolicy::Supersede => {
                self.slot.live.fetch_add(1, Ordering::AcqRel);
            }
        }
        let generation = self.slot.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(generation, "upload started");
        Ok(ImportTicket {
            generation,
            slot: Arc::clone(&self.slot),
        })
    }

    /// True while any ticket handed out by this session is alive.
    pub fn in_flight(&self) -> bool {
        self.slot.live.load(Ordering::Acquire) > 0
    }
}

#[derive(Debug)]
pub struct ImportTicket {
    generation: u64,
    slot: Arc<Slot>,
}

impl ImportTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.slot.generation.load(Ordering::Acquire) == self.generation
    }

    /// Fails with the stage the upload had reached once a newer one started.
    pub fn check(&self, stage: ImportStage) -> Result<(), ImportError> {
        if self.is_current() {
            Ok(())
        } else {
            Err(ImportError::Superseded { stage })
        }
    }
}

impl Drop for ImportTicket {
    fn drop(&mut self) {
        self.slot.live.fetch_sub(1, Ordering::AcqRel);
    }
}
