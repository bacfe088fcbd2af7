pub mod config;
pub mod core;
pub mod utils;

pub use config::cli::{resolve as resolve_args, CommandLineOverrides};
pub use config::xml_config::{load_and_resolve, ConfigDocument, ConfigNode};
pub use config::{resolve_startup_config, ConfigField, ResolvedConfig};
pub use core::daemon::{terminate_daemon, TerminateOutcome};
pub use utils::error::{BootstrapError, Result};
