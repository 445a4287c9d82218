use crate::config::PatchTarget;
use crate::core::builtin::{BuiltinMethod, DEFAULT_TARGET, DUPLICATE_RETURN_LINE};
use crate::core::method_span::{MatchStrategy, ReplaceScope};
use crate::core::pipeline::{CollapsePipeline, ReplaceMethodPipeline};
use crate::core::replacer::MethodReplacer;
use crate::core::sequence::PatchSequence;
use crate::core::Storage;
use crate::utils::error::{PatchError, Result};
use crate::utils::validation::{
    validate_identifier, validate_non_empty_string, validate_path, validate_required_field,
    validate_unique_names, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchPlan {
    pub plan: PlanInfo,
    #[serde(default)]
    pub steps: Vec<StepDefinition>,
    /// 相對路徑的 replacement_file 以此為基準
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanInfo {
    pub name: String,
    pub description: Option<String>,
    pub target: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Collapse,
    ReplaceMethod,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepOptions {
    pub enabled: Option<bool>,
    pub strategy: Option<MatchStrategy>,
    pub scope: Option<ReplaceScope>,
    pub strict: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDefinition {
    pub name: String,
    pub kind: StepKind,
    pub literal: Option<String>,
    pub method: Option<String>,
    pub builtin: Option<BuiltinMethod>,
    pub replacement: Option<String>,
    pub replacement_file: Option<String>,
    #[serde(flatten)]
    pub options: StepOptions,
}

impl StepDefinition {
    pub fn collapse(name: impl Into<String>, literal: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StepKind::Collapse,
            literal: Some(literal.into()),
            method: None,
            builtin: None,
            replacement: None,
            replacement_file: None,
            options: StepOptions::default(),
        }
    }

    pub fn builtin(builtin: BuiltinMethod) -> Self {
        Self {
            name: builtin.step_name().to_string(),
            kind: StepKind::ReplaceMethod,
            literal: None,
            method: None,
            builtin: Some(builtin),
            replacement: None,
            replacement_file: None,
            options: StepOptions::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.options.enabled.unwrap_or(true)
    }

    fn validate_step(&self) -> Result<()> {
        let field = |name: &str| format!("steps.{}.{}", self.name, name);
        validate_non_empty_string("steps.name", &self.name)?;

        match self.kind {
            StepKind::Collapse => {
                let literal = validate_required_field(&field("literal"), &self.literal)?;
                validate_non_empty_string(&field("literal"), literal)?;
            }
            StepKind::ReplaceMethod => {
                if self.builtin.is_some() {
                    if self.method.is_some()
                        || self.replacement.is_some()
                        || self.replacement_file.is_some()
                    {
                        return Err(PatchError::ConfigError {
                            message: format!(
                                "step '{}': builtin cannot be combined with method or replacement",
                                self.name
                            ),
                        });
                    }
                } else {
                    let method = validate_required_field(&field("method"), &self.method)?;
                    validate_identifier(&field("method"), method)?;

                    match (&self.replacement, &self.replacement_file) {
                        (Some(replacement), None) => {
                            validate_non_empty_string(&field("replacement"), replacement)?
                        }
                        (None, Some(file)) => validate_path(&field("replacement_file"), file)?,
                        (None, None) => {
                            return Err(PatchError::MissingConfigError {
                                field: field("replacement"),
                            })
                        }
                        (Some(_), Some(_)) => {
                            return Err(PatchError::ConfigError {
                                message: format!(
                                    "step '{}': set either replacement or replacement_file, not both",
                                    self.name
                                ),
                            })
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl PatchPlan {
    /// 從 TOML 檔案載入
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| PatchError::io(path, e))?;
        let mut plan = Self::from_toml_str(&content)?;
        plan.base_dir = path.parent().map(Path::to_path_buf);
        Ok(plan)
    }

    /// 從 TOML 字串解析
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let parse_error = |e: toml::de::Error| PatchError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        };

        let table: toml::Table = toml::from_str(content).map_err(parse_error)?;
        let mut value = toml::Value::Table(table);

        // 處理環境變數替換
        let re = regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")?;
        Self::substitute_env_vars(&mut value, &re);

        value.try_into().map_err(parse_error)
    }

    /// 原本三個腳本的執行順序
    pub fn default_plan() -> Self {
        Self {
            plan: PlanInfo {
                name: "apiService v7.1".to_string(),
                description: Some("Collapse duplicate returns, then update both push methods".to_string()),
                target: Some(DEFAULT_TARGET.to_string()),
            },
            steps: vec![
                StepDefinition::collapse("fix_api_syntax", DUPLICATE_RETURN_LINE),
                StepDefinition::builtin(BuiltinMethod::SendWebPushToStore),
                StepDefinition::builtin(BuiltinMethod::SendCustomWebPushWithUrl),
            ],
            base_dir: None,
        }
    }

    /// 替換環境變數 (例如 ${METHOD_NAME})
    ///
    /// `replacement` 是 JS 原文，裡面的 `${...}` 屬於模板字串，不做替換
    fn substitute_env_vars(value: &mut toml::Value, re: &regex::Regex) {
        match value {
            toml::Value::String(s) => {
                let replaced = re
                    .replace_all(s, |caps: &regex::Captures| {
                        let var_name = &caps[1];
                        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
                    })
                    .into_owned();
                *s = replaced;
            }
            toml::Value::Array(items) => {
                for item in items {
                    Self::substitute_env_vars(item, re);
                }
            }
            toml::Value::Table(table) => {
                for (key, item) in table.iter_mut() {
                    if key != "replacement" {
                        Self::substitute_env_vars(item, re);
                    }
                }
            }
            _ => {}
        }
    }

    pub fn target(&self) -> &str {
        self.plan.target.as_deref().unwrap_or(DEFAULT_TARGET)
    }

    pub fn enabled_steps(&self) -> impl Iterator<Item = &StepDefinition> {
        self.steps.iter().filter(|s| s.is_enabled())
    }

    fn load_replacement(&self, step: &StepDefinition) -> Result<(String, String)> {
        if let Some(builtin) = step.builtin {
            return Ok((builtin.method_name().to_string(), builtin.replacement().to_string()));
        }

        let method = validate_required_field("method", &step.method)?.clone();
        let replacement = match (&step.replacement, &step.replacement_file) {
            (Some(replacement), _) => replacement.clone(),
            (None, Some(file)) => {
                let path = match &self.base_dir {
                    Some(base) => base.join(file),
                    None => PathBuf::from(file),
                };
                let content = std::fs::read_to_string(&path).map_err(|e| PatchError::io(&path, e))?;
                content.trim_end_matches(&['\r', '\n'][..]).to_string()
            }
            (None, None) => {
                return Err(PatchError::MissingConfigError {
                    field: format!("steps.{}.replacement", step.name),
                })
            }
        };
        Ok((method, replacement))
    }

    /// 依步驟建立執行序列；停用的步驟也會放入，由序列略過
    pub fn build_sequence<S>(&self, storage: S, target: PatchTarget) -> Result<PatchSequence>
    where
        S: Storage + Clone + 'static,
    {
        let mut sequence = PatchSequence::new(self.plan.name.clone());

        for step in &self.steps {
            match step.kind {
                StepKind::Collapse => {
                    let literal = validate_required_field("literal", &step.literal)?;
                    let pipeline = CollapsePipeline::new(
                        step.name.clone(),
                        literal.clone(),
                        storage.clone(),
                        target.clone(),
                    )
                    .with_enabled(step.is_enabled());
                    sequence.add_step(Box::new(pipeline));
                }
                StepKind::ReplaceMethod => {
                    let (method, replacement) = self.load_replacement(step)?;
                    let replacer = MethodReplacer::new(method, replacement)
                        .with_strategy(step.options.strategy.unwrap_or_default())
                        .with_scope(step.options.scope.unwrap_or_default());
                    let pipeline = ReplaceMethodPipeline::new(
                        step.name.clone(),
                        replacer,
                        storage.clone(),
                        target.clone(),
                    )
                    .with_strict(step.options.strict.unwrap_or(false))
                    .with_enabled(step.is_enabled());
                    sequence.add_step(Box::new(pipeline));
                }
            }
        }

        Ok(sequence)
    }
}

impl Validate for PatchPlan {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("plan.name", &self.plan.name)?;
        validate_path("plan.target", self.target())?;

        if self.steps.is_empty() {
            return Err(PatchError::MissingConfigError {
                field: "steps".to_string(),
            });
        }

        validate_unique_names("steps.name", self.steps.iter().map(|s| s.name.as_str()))?;
        for step in &self.steps {
            step.validate_step()?;
        }
        Ok(())
    }
}
