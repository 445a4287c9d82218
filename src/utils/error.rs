use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("IO error on {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File {path} is not valid UTF-8: {source}")]
    EncodingError {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Method '{method}' not found in target")]
    MethodNotFound { method: String },

    #[error("Unbalanced braces in method '{method}' starting at byte {offset}")]
    UnbalancedBraces { method: String, offset: usize },

    #[error("Pattern error: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Step '{step}' failed: {source}")]
    StepError {
        step: String,
        #[source]
        source: Box<PatchError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Patch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PatchError {
    /// 為 IO 錯誤附上路徑
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            PatchError::IoError { .. } | PatchError::EncodingError { .. } => ErrorCategory::Io,
            PatchError::ConfigError { .. }
            | PatchError::InvalidConfigValueError { .. }
            | PatchError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PatchError::MethodNotFound { .. }
            | PatchError::UnbalancedBraces { .. }
            | PatchError::PatternError(_) => ErrorCategory::Patch,
            PatchError::StepError { source, .. } => source.category(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PatchError::MethodNotFound { .. } => ErrorSeverity::Medium,
            PatchError::ConfigError { .. }
            | PatchError::InvalidConfigValueError { .. }
            | PatchError::MissingConfigError { .. }
            | PatchError::UnbalancedBraces { .. } => ErrorSeverity::High,
            PatchError::StepError { source, .. } => source.severity(),
            PatchError::IoError { .. }
            | PatchError::EncodingError { .. }
            | PatchError::PatternError(_) => ErrorSeverity::Critical,
        }
    }

    /// 行程結束碼：1 設定錯誤、2 目標檔案問題、3 修補失敗
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 1,
            ErrorCategory::Io => 2,
            ErrorCategory::Patch => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PatchError::IoError { path, source } => match source.kind() {
                std::io::ErrorKind::NotFound => {
                    format!("Target file not found: {}", path.display())
                }
                std::io::ErrorKind::PermissionDenied => {
                    format!("Permission denied: {}", path.display())
                }
                _ => format!("Could not access {}: {}", path.display(), source),
            },
            PatchError::EncodingError { path, .. } => {
                format!("{} is not a UTF-8 text file", path.display())
            }
            PatchError::MethodNotFound { method } => {
                format!("Nothing to replace: '{}' does not occur in the target", method)
            }
            PatchError::UnbalancedBraces { method, .. } => {
                format!("The body of '{}' never closes; the file was left untouched", method)
            }
            PatchError::StepError { step, source } => {
                format!("Step '{}': {}", step, source.user_friendly_message())
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PatchError::IoError { .. } => {
                "Run from the project root or pass --target with the correct path"
            }
            PatchError::EncodingError { .. } => "Convert the target file to UTF-8 first",
            PatchError::ConfigError { .. }
            | PatchError::InvalidConfigValueError { .. }
            | PatchError::MissingConfigError { .. } => "Check the patch plan or CLI arguments",
            PatchError::MethodNotFound { .. } => {
                "Check the method name, or drop --strict to accept a no-op"
            }
            PatchError::UnbalancedBraces { .. } => {
                "Fix the braces in the target by hand or use the first-brace strategy"
            }
            PatchError::PatternError(_) => "Report this: the generated pattern is invalid",
            PatchError::StepError { source, .. } => source.recovery_suggestion(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PatchError>;
