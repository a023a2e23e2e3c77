use std::collections::{HashMap, HashSet};

use super::Pid;

/// Per-process CPU counters from /proc/<pid>/stat, in clock ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessCpuSample {
    pub utime: u64,
    pub stime: u64,
    pub start_time: u64, // ticks after boot; distinguishes a reused pid
}

impl ProcessCpuSample {
    pub fn busy_ticks(&self) -> u64 {
        self.utime.saturating_add(self.stime)
    }
}

/// One process as seen by a single refresh
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRecord {
    pub pid: Pid,
    pub user: String,
    pub command: String, // raw cmdline, NUL separators included
    pub cpu_percent: f64,
}

/// Remembers the last sample of every live pid so the next refresh can take a delta.
#[derive(Debug, Default)]
pub struct ProcessCpuTracker {
    cache: HashMap<Pid, ProcessCpuSample>,
}

impl ProcessCpuTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// CPU percentage of `pid` over the last `elapsed_ticks` of global time.
    ///
    /// Returns 0.0 when there is no usable prior sample or no time has passed.
    /// `sample` always replaces the cached one, so the next call measures the
    /// next interval and not an average since process start.
    pub fn observe(&mut self, pid: Pid, sample: ProcessCpuSample, elapsed_ticks: u64) -> f64 {
        let prior = self
            .cache
            .insert(pid, sample)
            // A different start time means the pid was recycled
            .filter(|prev| prev.start_time == sample.start_time);

        match prior {
            Some(prev) if elapsed_ticks > 0 => {
                let (now, before) = (sample.busy_ticks(), prev.busy_ticks());
                if now < before {
                    return 0.0;
                }
                (now - before) as f64 / elapsed_ticks as f64 * 100.0
            }
            _ => 0.0,
        }
    }

    /// Forget every pid not in `live`
    pub fn retain_live(&mut self, live: &[Pid]) {
        let live: HashSet<Pid> = live.iter().copied().collect();
        self.cache.retain(|pid, _| live.contains(pid));
    }

    pub fn get(&self, pid: Pid) -> Option<&ProcessCpuSample> {
        self.cache.get(&pid)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
