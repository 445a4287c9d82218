pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;

#[cfg(feature = "cli")]
pub use args::CliConfig;

/// 單一目標檔案的設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchTarget {
    pub path: String,
    pub dry_run: bool,
}

impl PatchTarget {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl ConfigProvider for PatchTarget {
    fn target_path(&self) -> &str {
        &self.path
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

#[cfg(feature = "cli")]
mod args {
    use super::toml_config::{PatchPlan, StepDefinition, StepKind};
    use crate::core::builtin::BuiltinMethod;
    use crate::core::method_span::{MatchStrategy, ReplaceScope};
    use crate::utils::error::Result;
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "api-patcher")]
    #[command(about = "Collapse duplicate lines and replace method bodies in apiService.js")]
    pub struct CliConfig {
        /// Target file (default: plan target, then src/services/apiService.js)
        #[arg(long)]
        pub target: Option<String>,

        /// TOML patch plan to run. `${VAR}` is expanded from the environment
        /// everywhere except inline `replacement` blocks
        #[arg(long, conflicts_with_all = ["collapse", "builtin"])]
        pub plan: Option<String>,

        /// Collapse immediate duplicates of this line
        #[arg(long, value_name = "LITERAL")]
        pub collapse: Vec<String>,

        /// Replace a method with one of the built-in v7.1 blocks
        #[arg(long, value_enum)]
        pub builtin: Vec<BuiltinMethod>,

        /// How the end of a method body is found
        #[arg(long, value_enum)]
        pub strategy: Option<MatchStrategy>,

        /// Replace only the first occurrence instead of every one
        #[arg(long)]
        pub first: bool,

        /// Fail when a method to replace is not found
        #[arg(long)]
        pub strict: bool,

        /// Print a diff instead of writing the file
        #[arg(long)]
        pub dry_run: bool,

        /// Emit logs as JSON
        #[arg(long)]
        pub json_logs: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        /// 由參數組出計畫；沒有指定任何步驟時使用原本三個腳本
        pub fn to_plan(&self) -> Result<PatchPlan> {
            let mut plan = match &self.plan {
                Some(path) => PatchPlan::from_file(path)?,
                None if self.collapse.is_empty() && self.builtin.is_empty() => {
                    PatchPlan::default_plan()
                }
                None => {
                    let mut plan = PatchPlan::default_plan();
                    plan.plan.name = "command line".to_string();
                    plan.plan.description = None;
                    plan.steps = self
                        .collapse
                        .iter()
                        .enumerate()
                        .map(|(i, literal)| StepDefinition::collapse(format!("collapse_{}", i + 1), literal))
                        .chain(self.builtin.iter().map(|b| StepDefinition::builtin(*b)))
                        .collect();
                    plan
                }
            };

            self.apply_overrides(&mut plan);
            Ok(plan)
        }

        fn apply_overrides(&self, plan: &mut PatchPlan) {
            if let Some(target) = &self.target {
                plan.plan.target = Some(target.clone());
            }

            for step in plan.steps.iter_mut().filter(|s| s.kind == StepKind::ReplaceMethod) {
                if let Some(strategy) = self.strategy {
                    step.options.strategy = Some(strategy);
                }
                if self.first {
                    step.options.scope = Some(ReplaceScope::First);
                }
                if self.strict {
                    step.options.strict = Some(true);
                }
            }
        }
    }

}
