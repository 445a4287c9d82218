pub mod builtin;
pub mod collapse;
pub mod engine;
pub mod method_span;
pub mod pipeline;
pub mod replacer;
pub mod sequence;

pub use crate::domain::model::{PatchOutcome, PatchReport, SourceDocument};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
