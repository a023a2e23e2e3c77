//! Reader for the kernel's process pseudo-filesystem.
//!
//! Everything lives under a root directory (`/proc` on a real host) so the
//! same code can be pointed at a fabricated tree.

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::PathBuf;

use crate::error::SampleError;
use crate::system::cpu::{parse_global_cpu_line, GlobalCpuSample};
use crate::system::process::ProcessCpuSample;
use crate::system::users::{SystemUsers, UserLookup};
use crate::system::Pid;

pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Minimum tokens after the closing parenthesis of the comm field
const STAT_MIN_FIELDS: usize = 20;
const STAT_UTIME: usize = 11;
const STAT_STIME: usize = 12;
const STAT_START_TIME: usize = 19;

pub struct ProcFs<U: UserLookup = SystemUsers> {
    root: PathBuf,
    users: U,
}

impl ProcFs<SystemUsers> {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_users(root, SystemUsers::new())
    }
}

impl<U: UserLookup> ProcFs<U> {
    pub fn with_users(root: impl Into<PathBuf>, users: U) -> Self {
        Self {
            root: root.into(),
            users,
        }
    }

    /// Path of the system-wide stat record
    pub fn stat_path(&self) -> PathBuf {
        self.root.join("stat")
    }

    /// Fail early when the host does not expose the expected layout
    pub fn check_available(&self) -> Result<(), SampleError> {
        if !cfg!(target_os = "linux") {
            return Err(SampleError::UnsupportedPlatform(format!(
                "{} has no {}-style process accounting",
                std::env::consts::OS,
                DEFAULT_PROC_ROOT
            )));
        }
        let stat = self.stat_path();
        if !stat.is_file() {
            return Err(SampleError::UnsupportedPlatform(format!(
                "{} not found",
                stat.display()
            )));
        }
        Ok(())
    }

    /// Numeric entries of the root directory, in directory order
    pub fn list_pids(&self) -> Result<Vec<Pid>, SampleError> {
        let entries = fs::read_dir(&self.root).map_err(|source| SampleError::Enumeration {
            path: self.root.clone(),
            source,
        })?;

        let mut pids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SampleError::Enumeration {
                path: self.root.clone(),
                source,
            })?;
            if let Some(pid) = entry.file_name().to_str().and_then(parse_pid) {
                pids.push(pid);
            }
        }
        Ok(pids)
    }

    pub fn read_global_cpu_sample(&self) -> Result<GlobalCpuSample, SampleError> {
        let path = self.stat_path();
        let content = fs::read_to_string(&path).map_err(|source| SampleError::Read {
            path: path.clone(),
            source,
        })?;
        parse_global_cpu_line(&content, &path.display().to_string())
    }

    /// Login name of the process owner
    pub fn read_process_owner(&mut self, pid: Pid) -> Result<String, SampleError> {
        let meta = fs::metadata(self.pid_dir(pid)).map_err(|_| SampleError::NotFound {
            pid,
            what: "process directory",
        })?;
        self.users
            .username(meta.uid())
            .ok_or(SampleError::NotFound { pid, what: "owner name" })
    }

    /// Raw argument vector; may be empty for kernel threads
    pub fn read_command_line(&self, pid: Pid) -> Result<String, SampleError> {
        let bytes = fs::read(self.pid_dir(pid).join("cmdline"))
            .map_err(|_| SampleError::NotFound { pid, what: "cmdline" })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn read_process_stat(&self, pid: Pid) -> Result<ProcessCpuSample, SampleError> {
        let content = fs::read_to_string(self.pid_dir(pid).join("stat"))
            .map_err(|_| SampleError::NotFound { pid, what: "stat" })?;
        parse_process_stat(&content)
            .map_err(|detail| SampleError::ProcessParse { pid, detail })
    }

    fn pid_dir(&self, pid: Pid) -> PathBuf {
        self.root.join(pid.to_string())
    }
}

/// Accept only names made entirely of ASCII digits
fn parse_pid(name: &str) -> Option<Pid> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

/// Parse the content of /proc/<pid>/stat.
///
/// The comm field can hold spaces and parentheses, so fields are counted from
/// the last `)` in the record.
pub fn parse_process_stat(content: &str) -> Result<ProcessCpuSample, String> {
    let close = content
        .rfind(')')
        .ok_or_else(|| "no closing parenthesis after comm field".to_string())?;
    let rest = content[close + 1..]
        .strip_prefix(' ')
        .ok_or_else(|| "record ends after comm field".to_string())?;
    let fields: Vec<&str> = rest.trim_end_matches('\n').split(' ').collect();
    if fields.len() < STAT_MIN_FIELDS {
        return Err(format!(
            "expected at least {} fields after comm, found {}",
            STAT_MIN_FIELDS,
            fields.len()
        ));
    }

    let field = |idx: usize, name: &str| -> Result<u64, String> {
        fields[idx]
            .parse::<u64>()
            .map_err(|_| format!("{} (field {}) is not an unsigned integer: {:?}", name, idx, fields[idx]))
    };

    Ok(ProcessCpuSample {
        utime: field(STAT_UTIME, "utime")?,
        stime: field(STAT_STIME, "stime")?,
        start_time: field(STAT_START_TIME, "starttime")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASH_STAT: &str = "1234 (bash) S 1 1234 1234 34816 5678 4194304 2000 30000 0 3 \
105 55 70 20 20 0 1 0 98765 23000000 1200 18446744073709551615 1 1 0 0 0 0 65536 \
3670020 1266777851 0 0 0 17 2 0 0 0 0 0\n";

    #[test]
    fn parses_fields_after_comm() {
        let s = parse_process_stat(BASH_STAT).unwrap();
        assert_eq!(s.utime, 105);
        assert_eq!(s.stime, 55);
        assert_eq!(s.start_time, 98765);
    }

    #[test]
    fn comm_with_spaces_and_parens() {
        let stat = BASH_STAT.replace("(bash)", "(evil) (name 1)");
        let s = parse_process_stat(&stat).unwrap();
        assert_eq!((s.utime, s.stime, s.start_time), (105, 55, 98765));
    }

    #[test]
    fn exactly_twenty_fields_is_enough() {
        let stat = "7 (x) S 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19";
        let s = parse_process_stat(stat).unwrap();
        assert_eq!((s.utime, s.stime, s.start_time), (11, 12, 19));
    }

    #[test]
    fn short_record_is_rejected() {
        let err = parse_process_stat("7 (x) S 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17").unwrap_err();
        assert!(err.contains("found 18"), "{}", err);
    }

    #[test]
    fn bad_integer_names_the_field() {
        let stat = "7 (x) S 1 2 3 4 5 6 7 8 9 10 -3 12 13 14 15 16 17 18 19";
        let err = parse_process_stat(stat).unwrap_err();
        assert!(err.contains("utime"), "{}", err);
    }

    #[test]
    fn missing_parenthesis() {
        assert!(parse_process_stat("7 x S 1 2 3").is_err());
        assert!(parse_process_stat("7 (x)").is_err());
    }

    #[test]
    fn pid_names_are_strictly_numeric() {
        assert_eq!(parse_pid("42"), Some(42));
        assert_eq!(parse_pid("0"), Some(0));
        assert_eq!(parse_pid("self"), None);
        assert_eq!(parse_pid("+1"), None);
        assert_eq!(parse_pid("12a"), None);
        assert_eq!(parse_pid(""), None);
        assert_eq!(parse_pid("99999999999"), None);
    }
}
