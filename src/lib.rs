pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::PatchPlan, PatchTarget};
pub use core::{
    engine::PatchEngine,
    pipeline::{CollapsePipeline, ReplaceMethodPipeline},
    sequence::PatchSequence,
};
pub use utils::error::{PatchError, Result};
