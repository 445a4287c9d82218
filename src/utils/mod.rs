pub mod diff;
pub mod error;
pub mod logger;
pub mod validation;
