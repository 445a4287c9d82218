use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 目標檔案的文字內容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub path: String,
    pub text: String,
}

impl SourceDocument {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// 依行切開並保留換行字元，`concat()` 後可還原原文
    pub fn lines(&self) -> Vec<&str> {
        self.text.split_inclusive('\n').collect()
    }
}

/// 單一步驟的轉換結果
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    pub path: String,
    pub original: String,
    pub patched: String,
    pub changes: usize,
}

impl PatchOutcome {
    pub fn is_modified(&self) -> bool {
        self.original != self.patched
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchReport {
    pub step: String,
    pub path: String,
    pub changes: usize,
    pub written: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
    pub finished_at: DateTime<Utc>,
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
