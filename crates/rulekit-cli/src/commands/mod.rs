//! Command implementations for rulekit-cli

pub mod install;
pub mod list;
pub mod remove;
pub mod transform;

pub use install::{run_install, run_install_all};
pub use list::{run_list, run_targets};
pub use remove::run_remove;
pub use transform::run_transform;
