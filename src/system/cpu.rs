use tracing::warn;

use crate::error::SampleError;

/// Number of counters on the aggregate `cpu` line of /proc/stat
pub const CPU_COUNTERS: usize = 10;

const COUNTER_NAMES: [&str; CPU_COUNTERS] = [
    "user", "nice", "system", "idle", "iowait", "irq", "softirq", "steal", "guest", "guest_nice",
];

/// System-wide CPU counters, in clock ticks since boot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalCpuSample {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl GlobalCpuSample {
    /// busy + idle ticks; iowait, irq and softirq are not part of the total.
    /// Saturates at `u64::MAX` rather than wrapping.
    pub fn total_ticks(&self) -> u64 {
        [self.nice, self.system, self.idle, self.steal, self.guest, self.guest_nice]
            .iter()
            .fold(self.user, |acc, c| acc.saturating_add(*c))
    }

    /// Ticks spent doing work (total minus idle)
    pub fn busy_ticks(&self) -> u64 {
        self.total_ticks().saturating_sub(self.idle)
    }

    fn from_counters(c: [u64; CPU_COUNTERS]) -> Self {
        Self {
            user: c[0],
            nice: c[1],
            system: c[2],
            idle: c[3],
            iowait: c[4],
            irq: c[5],
            softirq: c[6],
            steal: c[7],
            guest: c[8],
            guest_nice: c[9],
        }
    }
}

/// Parse the first line of /proc/stat: `cpu` followed by exactly ten counters.
///
/// `resource` names the file in diagnostics.
pub fn parse_global_cpu_line(content: &str, resource: &str) -> Result<GlobalCpuSample, SampleError> {
    let parse_err = |detail: String| SampleError::Parse {
        resource: resource.to_string(),
        detail,
    };

    let line = content
        .lines()
        .next()
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| parse_err("file is empty".to_string()))?;

    let mut tokens = line.split_whitespace();
    match tokens.next() {
        Some("cpu") => {}
        Some(other) => {
            return Err(parse_err(format!("first line starts with {:?}, expected \"cpu\"", other)))
        }
        None => return Err(parse_err("first line is blank".to_string())),
    }

    let fields: Vec<&str> = tokens.collect();
    if fields.len() < CPU_COUNTERS {
        return Err(parse_err(format!(
            "expected {} counters, found {} (missing {})",
            CPU_COUNTERS,
            fields.len(),
            COUNTER_NAMES[fields.len()]
        )));
    }
    if fields.len() > CPU_COUNTERS {
        return Err(parse_err(format!(
            "expected {} counters, found {} (unexpected trailing field {:?})",
            CPU_COUNTERS,
            fields.len(),
            fields[CPU_COUNTERS]
        )));
    }

    let mut counters = [0u64; CPU_COUNTERS];
    for (i, raw) in fields.iter().enumerate() {
        counters[i] = raw.parse::<u64>().map_err(|_| {
            parse_err(format!("counter {} is not an unsigned integer: {:?}", COUNTER_NAMES[i], raw))
        })?;
    }

    Ok(GlobalCpuSample::from_counters(counters))
}

/// Holds the most recent system-wide sample and measures the interval between refreshes
#[derive(Debug, Default)]
pub struct GlobalCpuSampler {
    current: Option<GlobalCpuSample>,
}

impl GlobalCpuSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in `sample`, returning elapsed total ticks and the sample it replaced.
    /// The first call reports 0 elapsed ticks.
    pub fn advance(&mut self, sample: GlobalCpuSample) -> (u64, Option<GlobalCpuSample>) {
        let previous = self.current.replace(sample);
        let elapsed = match previous {
            Some(prev) => {
                let (now, before) = (sample.total_ticks(), prev.total_ticks());
                if now < before {
                    warn!(now, before, "global cpu counters went backwards");
                }
                now.saturating_sub(before)
            }
            None => 0,
        };
        (elapsed, previous)
    }

    pub fn current(&self) -> Option<&GlobalCpuSample> {
        self.current.as_ref()
    }
}

/// Overall CPU busy percentage between two samples
pub fn busy_percent(previous: &GlobalCpuSample, current: &GlobalCpuSample) -> f64 {
    let total = current.total_ticks().saturating_sub(previous.total_ticks());
    if total == 0 {
        return 0.0;
    }
    let busy = current.busy_ticks().saturating_sub(previous.busy_ticks());
    (busy as f64 / total as f64 * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "cpu  100 0 50 850 0 0 0 0 0 0\n\
cpu0 50 0 25 425 0 0 0 0 0 0\n\
intr 12345 0 0\n\
btime 1700000000\n";

    #[test]
    fn parses_counters_in_declared_order() {
        let s = parse_global_cpu_line("cpu  1 2 3 4 5 6 7 8 9 10\n", "stat").unwrap();
        assert_eq!(
            s,
            GlobalCpuSample {
                user: 1,
                nice: 2,
                system: 3,
                idle: 4,
                iowait: 5,
                irq: 6,
                softirq: 7,
                steal: 8,
                guest: 9,
                guest_nice: 10,
            }
        );
    }

    #[test]
    fn total_excludes_iowait_irq_softirq() {
        let s = parse_global_cpu_line(STAT, "stat").unwrap();
        assert_eq!(s.total_ticks(), 1000);

        let s = parse_global_cpu_line("cpu  1 2 3 4 100 200 300 8 9 10", "stat").unwrap();
        assert_eq!(s.total_ticks(), 1 + 2 + 3 + 4 + 8 + 9 + 10);
    }

    #[test]
    fn too_few_counters_is_an_error() {
        let err = parse_global_cpu_line("cpu  100 0 50 850 0", "/proc/stat").unwrap_err();
        let msg = err.to_string();
        assert!(err.is_fatal());
        assert!(msg.contains("found 5"), "{}", msg);
        assert!(msg.contains("irq"), "{}", msg);
    }

    #[test]
    fn extra_counters_are_rejected() {
        let err = parse_global_cpu_line("cpu  1 2 3 4 5 6 7 8 9 10 11", "stat").unwrap_err();
        assert!(err.to_string().contains("\"11\""));
    }

    #[test]
    fn non_numeric_counter_names_the_field() {
        let err = parse_global_cpu_line("cpu  1 2 x 4 5 6 7 8 9 10", "stat").unwrap_err();
        assert!(err.to_string().contains("system"));
    }

    #[test]
    fn wrong_leading_token_and_empty_file() {
        assert!(parse_global_cpu_line("cpu0 1 2 3 4 5 6 7 8 9 10", "stat").is_err());
        assert!(parse_global_cpu_line("", "stat").is_err());
        assert!(parse_global_cpu_line("\n", "stat").is_err());
    }

    #[test]
    fn first_advance_reports_zero_elapsed() {
        let mut sampler = GlobalCpuSampler::new();
        let s = parse_global_cpu_line(STAT, "stat").unwrap();
        let (elapsed, prev) = sampler.advance(s);
        assert_eq!(elapsed, 0);
        assert!(prev.is_none());
        assert_eq!(sampler.current(), Some(&s));
    }

    #[test]
    fn advance_reports_delta_and_previous() {
        let mut sampler = GlobalCpuSampler::new();
        let first = GlobalCpuSample { user: 100, idle: 900, ..Default::default() };
        let second = GlobalCpuSample { user: 150, idle: 1350, ..Default::default() };
        sampler.advance(first);
        let (elapsed, prev) = sampler.advance(second);
        assert_eq!(elapsed, 500);
        assert_eq!(prev, Some(first));
        assert!((busy_percent(&first, &second) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn counters_going_backwards_yield_zero() {
        let mut sampler = GlobalCpuSampler::new();
        sampler.advance(GlobalCpuSample { idle: 1000, ..Default::default() });
        let (elapsed, _) = sampler.advance(GlobalCpuSample { idle: 10, ..Default::default() });
        assert_eq!(elapsed, 0);
    }

    #[test]
    fn near_max_counters_saturate_instead_of_overflowing() {
        let first = parse_global_cpu_line("cpu 18446744073709551000 1 0 0 0 0 0 0 0 0", "stat").unwrap();
        let second = parse_global_cpu_line("cpu 18446744073709551615 1 0 0 0 0 0 0 0 0", "stat").unwrap();
        assert_eq!(second.total_ticks(), u64::MAX);

        let mut sampler = GlobalCpuSampler::new();
        sampler.advance(first);
        let (elapsed, _) = sampler.advance(second);
        assert_eq!(elapsed, 0);
        assert_eq!(busy_percent(&first, &second), 0.0);
    }
}
