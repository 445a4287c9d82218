use crate::core::engine::run_pipeline;
use crate::core::{PatchReport, Pipeline};
use crate::utils::error::{PatchError, Result};
use std::collections::HashMap;

/// 依序執行多個修補步驟，每一步都重新讀取目標檔案
pub struct PatchSequence {
    steps: Vec<Box<dyn Pipeline>>,
    execution_id: String,
}

impl PatchSequence {
    pub fn new(execution_id: String) -> Self {
        Self {
            steps: Vec::new(),
            execution_id,
        }
    }

    pub fn add_step(&mut self, step: Box<dyn Pipeline>) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// 任一步驟失敗即停止，先前步驟已寫入的結果不會回復
    pub async fn execute_all(&self) -> Result<Vec<PatchReport>> {
        let mut reports = Vec::new();
        tracing::info!(
            "🚀 Running patch sequence {} ({} step(s))",
            self.execution_id,
            self.steps.len()
        );

        for step in &self.steps {
            if !step.is_enabled() {
                tracing::info!("⏭️ Skipping step: {} (disabled)", step.name());
                continue;
            }

            match run_pipeline(step.as_ref()).await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::error!("❌ Step {} failed: {}", step.name(), e);
                    return Err(PatchError::StepError {
                        step: step.name().to_string(),
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(reports)
    }

    /// 執行摘要
    pub fn get_execution_summary(reports: &[PatchReport]) -> HashMap<String, serde_json::Value> {
        let mut summary = HashMap::new();

        let total_changes: usize = reports.iter().map(|r| r.changes).sum();
        let total_duration: std::time::Duration = reports.iter().map(|r| r.duration).sum();
        let unchanged: Vec<serde_json::Value> = reports
            .iter()
            .filter(|r| r.changes == 0)
            .map(|r| serde_json::Value::String(r.step.clone()))
            .collect();

        summary.insert("total_steps".to_string(), serde_json::Value::Number(reports.len().into()));
        summary.insert("total_changes".to_string(), serde_json::Value::Number(total_changes.into()));
        summary.insert(
            "total_duration_ms".to_string(),
            serde_json::Value::Number((total_duration.as_millis() as u64).into()),
        );

        let step_names: Vec<serde_json::Value> = reports
            .iter()
            .map(|r| serde_json::Value::String(r.step.clone()))
            .collect();
        summary.insert("executed_steps".to_string(), serde_json::Value::Array(step_names));
        summary.insert("unchanged_steps".to_string(), serde_json::Value::Array(unchanged));

        summary
    }
}
