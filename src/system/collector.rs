use tracing::{debug, trace};

use crate::error::SampleError;
use crate::system::cpu::{busy_percent, GlobalCpuSampler};
use crate::system::process::{ProcessCpuTracker, ProcessRecord};
use crate::system::procfs::ProcFs;
use crate::system::row::DisplayRow;
use crate::system::users::{SystemUsers, UserLookup};
use crate::system::Pid;

/// Result of one sampling pass, in enumeration order
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub records: Vec<ProcessRecord>,
    /// Pids listed this pass, including the ones that were skipped
    pub enumerated: usize,
    /// Global ticks since the previous pass (0 on the first)
    pub elapsed_ticks: u64,
    /// Whole-system busy percentage over the same interval
    pub cpu_busy_percent: f64,
}

impl Snapshot {
    pub fn rows(&self) -> Vec<DisplayRow> {
        self.records.iter().map(DisplayRow::from_record).collect()
    }
}

/// Owns all sampling state that must survive between refreshes
pub struct Collector<U: UserLookup = SystemUsers> {
    procfs: ProcFs<U>,
    global: GlobalCpuSampler,
    tracker: ProcessCpuTracker,
}

impl<U: UserLookup> Collector<U> {
    pub fn new(procfs: ProcFs<U>) -> Self {
        Self {
            procfs,
            global: GlobalCpuSampler::new(),
            tracker: ProcessCpuTracker::new(),
        }
    }

    /// Run one full sampling pass.
    ///
    /// Listing the process directory and reading the system-wide record must
    /// succeed; a process that fails any of its own reads is left out.
    pub fn refresh(&mut self) -> Result<Snapshot, SampleError> {
        let pids = self.procfs.list_pids()?;
        let sample = self.procfs.read_global_cpu_sample()?;
        let (elapsed_ticks, previous) = self.global.advance(sample);
        let cpu_busy_percent = previous
            .map(|prev| busy_percent(&prev, &sample))
            .unwrap_or(0.0);

        let mut records = Vec::with_capacity(pids.len());
        for &pid in &pids {
            match self.sample_process(pid, elapsed_ticks) {
                Ok(record) => records.push(record),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => trace!(pid, error = %e, "skipping process"),
            }
        }

        self.tracker.retain_live(&pids);

        debug!(
            enumerated = pids.len(),
            rows = records.len(),
            elapsed_ticks,
            cached = self.tracker.len(),
            "refresh complete"
        );

        Ok(Snapshot {
            records,
            enumerated: pids.len(),
            elapsed_ticks,
            cpu_busy_percent,
        })
    }

    fn sample_process(&mut self, pid: Pid, elapsed_ticks: u64) -> Result<ProcessRecord, SampleError> {
        let user = self.procfs.read_process_owner(pid)?;
        let command = self.procfs.read_command_line(pid)?;
        let stat = self.procfs.read_process_stat(pid)?;
        let cpu_percent = self.tracker.observe(pid, stat, elapsed_ticks);
        Ok(ProcessRecord {
            pid,
            user,
            command,
            cpu_percent,
        })
    }

    pub fn procfs(&self) -> &ProcFs<U> {
        &self.procfs
    }

    pub fn tracker(&self) -> &ProcessCpuTracker {
        &self.tracker
    }
}
