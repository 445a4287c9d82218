use crate::core::{PatchReport, Pipeline};
use crate::utils::error::Result;
use std::time::Instant;

pub struct PatchEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> PatchEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<PatchReport> {
        run_pipeline(&self.pipeline).await
    }
}

/// 依序執行 extract、transform、load，並記錄耗時
pub async fn run_pipeline(pipeline: &dyn Pipeline) -> Result<PatchReport> {
    let start = Instant::now();
    tracing::debug!("▶️ Running step: {}", pipeline.name());

    // Extract
    let document = pipeline.extract().await?;
    tracing::debug!("📥 Read {} bytes from {}", document.text.len(), document.path);

    // Transform
    let outcome = pipeline.transform(document).await?;
    tracing::debug!(
        "🔄 {} change(s), modified: {}",
        outcome.changes,
        outcome.is_modified()
    );

    // Load
    let mut report = pipeline.load(outcome).await?;
    report.duration = start.elapsed();
    tracing::info!(
        "✅ Step {} finished (changes: {}, written: {}, duration: {:?})",
        report.step,
        report.changes,
        report.written,
        report.duration
    );

    Ok(report)
}
