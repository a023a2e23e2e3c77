pub mod collector;
pub mod cpu;
pub mod process;
pub mod procfs;
pub mod row;
pub mod users;

/// Kernel process identifier
pub type Pid = u32;
