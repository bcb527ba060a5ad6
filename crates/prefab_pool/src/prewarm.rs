//! Prewarm scheduling
//!
//! Immediate descriptors are filled synchronously during initialization.
//! Incremental descriptors become [`PrewarmJob`]s that the host advances by
//! calling [`ObjectPool::prewarm_tick`] once per frame; each call constructs
//! one instance for every pending job. Cancelling simply drops the pending
//! jobs. A partially prewarmed pool keeps working, `get` constructs on demand.

use crate::host::PoolHost;
use crate::key::PoolKey;
use crate::registry::ObjectPool;

/// Resumable prewarm state for one incremental pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrewarmJob {
    key: PoolKey,
    target: usize,
    created: usize,
}

impl PrewarmJob {
    /// Job constructing `target` instances for the pool under `key`
    pub fn new(key: PoolKey, target: usize) -> Self {
        Self { key, target, created: 0 }
    }

    /// Pool being filled
    pub fn key(&self) -> &PoolKey {
        &self.key
    }

    /// Instances constructed so far
    pub fn created(&self) -> usize {
        self.created
    }

    /// Instances still to construct
    pub fn remaining(&self) -> usize {
        self.target.saturating_sub(self.created)
    }

    /// Whether the job reached its target
    pub fn is_done(&self) -> bool {
        self.created >= self.target
    }
}

/// Pending incremental prewarm jobs, in descriptor order
#[derive(Debug, Default)]
pub struct PrewarmQueue {
    jobs: Vec<PrewarmJob>,
}

impl PrewarmQueue {
    pub(crate) fn push(&mut self, job: PrewarmJob) {
        if !job.is_done() {
            self.jobs.push(job);
        }
    }

    /// Number of pending jobs
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Pending jobs
    pub fn jobs(&self) -> &[PrewarmJob] {
        &self.jobs
    }

    fn remaining_instances(&self) -> usize {
        self.jobs.iter().map(PrewarmJob::remaining).fold(0, usize::saturating_add)
    }
}

/// Summary of one prewarm tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrewarmProgress {
    /// Instances constructed during this tick
    pub constructed: usize,
    /// Jobs still pending after this tick
    pub pending_jobs: usize,
    /// Instances still to construct across all pending jobs
    pub remaining_instances: usize,
}

impl PrewarmProgress {
    /// Whether incremental prewarming has nothing left to do
    pub fn is_complete(&self) -> bool {
        self.pending_jobs == 0
    }
}

impl<H: PoolHost> ObjectPool<H> {
    /// Fill the pool under `key` with `count` instances in one step
    pub(crate) fn prewarm_immediate(&mut self, host: &mut H, key: &PoolKey, count: usize) {
        for _ in 0..count {
            if self.construct_inactive(host, key).is_none() {
                return;
            }
        }
        log::debug!("Prewarmed {} instances for {}", count, key);
    }

    /// Advance every pending incremental job by one instance
    pub fn prewarm_tick(&mut self, host: &mut H) -> PrewarmProgress {
        if self.prewarm.is_empty() {
            return PrewarmProgress::default();
        }

        let mut jobs = std::mem::take(&mut self.prewarm.jobs);
        let mut constructed = 0;
        for job in &mut jobs {
            let built = self.construct_inactive(host, &job.key).is_some();
            debug_assert!(built, "prewarm job for unregistered pool {}", job.key);
            job.created += 1;
            constructed += usize::from(built);
        }
        jobs.retain(|job| !job.is_done());
        self.prewarm.jobs = jobs;

        if self.prewarm.is_empty() {
            log::info!("Incremental prewarm finished");
        }

        PrewarmProgress {
            constructed,
            pending_jobs: self.prewarm.len(),
            remaining_instances: self.prewarm.remaining_instances(),
        }
    }

    /// Stop incremental prewarming, keeping what was already constructed
    ///
    /// Returns the number of instances that will not be prewarmed.
    pub fn cancel_prewarm(&mut self) -> usize {
        let skipped = self.prewarm.remaining_instances();
        if !self.prewarm.is_empty() {
            log::info!(
                "Incremental prewarm cancelled, {} instances across {} pools skipped",
                skipped,
                self.prewarm.len()
            );
        }
        self.prewarm.jobs.clear();
        skipped
    }

    /// Whether incremental prewarm jobs are still pending
    pub fn is_prewarming(&self) -> bool {
        !self.prewarm.is_empty()
    }

    /// Pending incremental prewarm jobs
    pub fn prewarm_queue(&self) -> &PrewarmQueue {
        &self.prewarm
    }
}
