pub mod config;
pub mod fd_limit;
pub mod logger;
pub mod sidecar;

pub use config::{default_config_filename, default_db_path, HashingConsts, ProgressConsts, WeaveConsts, WorkerThreadLimits};
pub use fd_limit::{max_open_fds, max_workers_by_fd_limit, FDS_PER_WORKER};
pub use logger::setup_logging;
pub use sidecar::{load_defaults, CliDefaults};
