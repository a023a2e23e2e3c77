use super::process::ProcessRecord;

/// Command characters kept before truncation
pub const MAX_COMMAND_CHARS: usize = 30;
pub const ELLIPSIS: &str = "...";

/// One table line, every column already rendered to text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub pid: String,
    pub user: String,
    pub cpu: String,
    pub command: String,
}

impl DisplayRow {
    pub fn from_record(record: &ProcessRecord) -> Self {
        Self {
            pid: record.pid.to_string(),
            user: record.user.clone(),
            cpu: format!("{:.6}", record.cpu_percent),
            command: format_command(&record.command),
        }
    }
}

fn strip_line_endings(s: &str) -> &str {
    s.trim_end_matches(['\r', '\n'])
}

/// Trim trailing CR/LF and cut to 30 characters, marking a cut with `...`.
pub fn format_command(raw: &str) -> String {
    let stripped = strip_line_endings(raw);
    match stripped.char_indices().nth(MAX_COMMAND_CHARS) {
        None => stripped.to_string(),
        Some((cut, _)) => {
            let mut out = strip_line_endings(&stripped[..cut]).to_string();
            out.push_str(ELLIPSIS);
            out
        }
    }
}
