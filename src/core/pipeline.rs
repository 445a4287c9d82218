use crate::core::collapse::collapse_text;
use crate::core::replacer::MethodReplacer;
use crate::core::{ConfigProvider, PatchOutcome, PatchReport, Pipeline, SourceDocument, Storage};
use crate::utils::diff::unified_diff;
use crate::utils::error::{PatchError, Result};
use std::time::Duration;

async fn read_document<S: Storage>(storage: &S, path: &str) -> Result<SourceDocument> {
    tracing::debug!("Reading target: {}", path);
    let bytes = storage.read_file(path).await?;
    let text = String::from_utf8(bytes).map_err(|source| PatchError::EncodingError {
        path: path.into(),
        source,
    })?;
    Ok(SourceDocument::new(path, text))
}

async fn write_outcome<S: Storage, C: ConfigProvider>(
    storage: &S,
    config: &C,
    step: &str,
    outcome: PatchOutcome,
) -> Result<PatchReport> {
    let diff = if config.dry_run() {
        tracing::debug!("Dry run: skipping write of {}", outcome.path);
        Some(unified_diff(&outcome.path, &outcome.original, &outcome.patched))
    } else {
        // 與原腳本相同：即使內容沒變也整份寫回
        tracing::debug!("Writing {} bytes to {}", outcome.patched.len(), outcome.path);
        storage.write_file(&outcome.path, outcome.patched.as_bytes()).await?;
        None
    };

    Ok(PatchReport {
        step: step.to_string(),
        path: outcome.path,
        changes: outcome.changes,
        written: diff.is_none(),
        diff,
        duration: Duration::ZERO,
        finished_at: chrono::Utc::now(),
    })
}

/// 移除重複行的步驟
pub struct CollapsePipeline<S: Storage, C: ConfigProvider> {
    name: String,
    literal: String,
    storage: S,
    config: C,
    enabled: bool,
}

impl<S: Storage, C: ConfigProvider> CollapsePipeline<S, C> {
    pub fn new(name: impl Into<String>, literal: impl Into<String>, storage: S, config: C) -> Self {
        Self {
            name: name.into(),
            literal: literal.into(),
            storage,
            config,
            enabled: true,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CollapsePipeline<S, C> {
    async fn extract(&self) -> Result<SourceDocument> {
        read_document(&self.storage, self.config.target_path()).await
    }

    async fn transform(&self, document: SourceDocument) -> Result<PatchOutcome> {
        let (patched, removed) = collapse_text(&document.text, &self.literal);
        tracing::debug!("Collapsed {} duplicate '{}' line(s)", removed, self.literal.trim());

        Ok(PatchOutcome {
            path: document.path,
            original: document.text,
            patched,
            changes: removed,
        })
    }

    async fn load(&self, outcome: PatchOutcome) -> Result<PatchReport> {
        write_outcome(&self.storage, &self.config, &self.name, outcome).await
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// 替換方法主體的步驟
pub struct ReplaceMethodPipeline<S: Storage, C: ConfigProvider> {
    name: String,
    replacer: MethodReplacer,
    storage: S,
    config: C,
    strict: bool,
    enabled: bool,
}

impl<S: Storage, C: ConfigProvider> ReplaceMethodPipeline<S, C> {
    pub fn new(name: impl Into<String>, replacer: MethodReplacer, storage: S, config: C) -> Self {
        Self {
            name: name.into(),
            replacer,
            storage,
            config,
            strict: false,
            enabled: true,
        }
    }

    /// 找不到方法時回傳錯誤，而不是靜默寫回原文
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ReplaceMethodPipeline<S, C> {
    async fn extract(&self) -> Result<SourceDocument> {
        read_document(&self.storage, self.config.target_path()).await
    }

    async fn transform(&self, document: SourceDocument) -> Result<PatchOutcome> {
        let replacement = self.replacer.apply(&document.text)?;

        if replacement.count == 0 {
            if self.strict {
                return Err(PatchError::MethodNotFound {
                    method: self.replacer.method().to_string(),
                });
            }
            tracing::warn!(
                "⚠️ Method '{}' not found in {}, content left unchanged",
                self.replacer.method(),
                document.path
            );
        } else {
            tracing::debug!(
                "Replaced {} occurrence(s) of '{}' ({:?})",
                replacement.count,
                self.replacer.method(),
                self.replacer.strategy()
            );
        }

        Ok(PatchOutcome {
            path: document.path,
            original: document.text,
            patched: replacement.text,
            changes: replacement.count,
        })
    }

    async fn load(&self, outcome: PatchOutcome) -> Result<PatchReport> {
        write_outcome(&self.storage, &self.config, &self.name, outcome).await
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
