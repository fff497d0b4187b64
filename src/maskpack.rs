use std::sync::Mutex;
use std::thread;

use scoped_threadpool::Pool;

use crate::engine::accessor::{MaskAccessor, ValueAccessor};
use crate::engine::compactor::{self, CoordBuffer};
use crate::engine::domain::Domain;
use crate::scheduler::Task;
use crate::CompactResult;

pub struct Options {
    /// Number of parallel workers per invocation. Fixed at engine
    /// construction, not configurable per call.
    pub threads: usize,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            threads: num_cpus::get(),
        }
    }
}

/// Compaction engine owning a fixed-size worker pool.
pub struct MaskPack {
    pool: Mutex<Pool>,
    threads: usize,
}

impl MaskPack {
    pub fn new(opts: &Options) -> MaskPack {
        let threads = opts.threads.max(1);
        info!("starting compaction engine with {} worker threads", threads);
        MaskPack {
            pool: Mutex::new(Pool::new(threads as u32)),
            threads,
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Selects the input elements flagged by the mask, preserving row-major
    /// scan order. Returns the packed buffer and the selected-element count.
    pub fn compact_values<T, A, M>(
        &self,
        input: &A,
        mask: &M,
        input_domain: &Domain,
        mask_domain: &Domain,
    ) -> CompactResult<(Vec<T>, usize)>
    where
        T: Copy + Default + Send,
        A: ValueAccessor<T>,
        M: MaskAccessor,
    {
        let mut pool = self.pool.lock().unwrap();
        compactor::compact_values(input, mask, input_domain, mask_domain, &mut pool)
    }

    /// Selects the input-domain coordinates flagged by the mask.
    pub fn compact_coords<M>(
        &self,
        mask: &M,
        input_domain: &Domain,
        mask_domain: &Domain,
    ) -> CompactResult<(CoordBuffer, usize)>
    where
        M: MaskAccessor,
    {
        let mut pool = self.pool.lock().unwrap();
        compactor::compact_coords(mask, input_domain, mask_domain, &mut pool)
    }

    /// Coordinates of all selected mask entries.
    pub fn nonzero<M>(
        &self,
        mask: &M,
        mask_domain: &Domain,
    ) -> CompactResult<(CoordBuffer, usize)>
    where
        M: MaskAccessor,
    {
        let mut pool = self.pool.lock().unwrap();
        compactor::nonzero(mask, mask_domain, &mut pool)
    }

    /// Task-style submission: the task runs to completion off the calling
    /// thread and delivers its result through its own sender. The thread is
    /// detached; if the task panics, its sender is dropped and the receiver
    /// observes cancellation instead of a result.
    pub fn schedule<T: Task + 'static>(&self, task: T) {
        thread::spawn(move || task.execute());
    }
}
