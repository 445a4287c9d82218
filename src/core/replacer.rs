use crate::core::method_span::{find_method_spans, MatchStrategy, ReplaceScope};
use crate::utils::error::Result;

/// 將 `async <method>(...) { ... }` 整段換成固定內容（後面補一個逗號）
#[derive(Debug, Clone)]
pub struct MethodReplacer {
    method: String,
    replacement: String,
    strategy: MatchStrategy,
    scope: ReplaceScope,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub text: String,
    pub count: usize,
}

impl MethodReplacer {
    pub fn new(method: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            replacement: replacement.into(),
            strategy: MatchStrategy::default(),
            scope: ReplaceScope::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_scope(mut self, scope: ReplaceScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// 找不到方法時原文不變，`count` 為 0
    pub fn apply(&self, text: &str) -> Result<Replacement> {
        let spans = find_method_spans(text, &self.method, self.strategy, self.scope)?;
        if spans.is_empty() {
            return Ok(Replacement {
                text: text.to_string(),
                count: 0,
            });
        }

        let mut patched = String::with_capacity(text.len() + self.replacement.len() * spans.len());
        let mut last = 0;
        for span in &spans {
            patched.push_str(&text[last..span.start]);
            patched.push_str(&self.replacement);
            patched.push(',');
            last = span.end;
        }
        patched.push_str(&text[last..]);

        Ok(Replacement {
            text: patched,
            count: spans.len(),
        })
    }
}
