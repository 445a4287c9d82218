use crate::utils::error::{PatchError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// 決定方法主體的結尾
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// `async name(...) {` 之後遇到的第一個 `}`，巢狀大括號會被截斷
    #[default]
    FirstBrace,
    /// 依括號深度掃描，略過字串、模板字串與註解
    Balanced,
}

/// 替換全部（預設，與 `re.sub` 相同）或只換第一個出現的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceScope {
    First,
    #[default]
    All,
}

/// 找出方法定義的位元組範圍，範圍包含緊接在後的一個逗號
pub fn find_method_spans(
    text: &str,
    method: &str,
    strategy: MatchStrategy,
    scope: ReplaceScope,
) -> Result<Vec<Range<usize>>> {
    match strategy {
        MatchStrategy::FirstBrace => first_brace_spans(text, method, scope),
        MatchStrategy::Balanced => balanced_spans(text, method, scope),
    }
}

/// `(?s)async NAME\(.*?\) \{[^}]*\},?`
pub fn first_brace_pattern(method: &str) -> Result<Regex> {
    let pattern = String::from(r"(?s)async ") + &regex::escape(method) + r"\(.*?\) \{[^}]*\},?";
    Ok(Regex::new(&pattern)?)
}

fn first_brace_spans(text: &str, method: &str, scope: ReplaceScope) -> Result<Vec<Range<usize>>> {
    let re = first_brace_pattern(method)?;
    let spans = match scope {
        ReplaceScope::First => re.find(text).map(|m| m.range()).into_iter().collect(),
        ReplaceScope::All => re.find_iter(text).map(|m| m.range()).collect(),
    };
    Ok(spans)
}

fn balanced_spans(text: &str, method: &str, scope: ReplaceScope) -> Result<Vec<Range<usize>>> {
    let needle = format!("async {}(", method);
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find(&needle) {
        let start = cursor + found;
        let paren = start + needle.len() - 1;
        let unbalanced = || PatchError::UnbalancedBraces {
            method: method.to_string(),
            offset: start,
        };

        let close_paren = matching_close(bytes, paren).ok_or_else(unbalanced)?;
        let mut body = close_paren + 1;
        while body < bytes.len() && bytes[body].is_ascii_whitespace() {
            body += 1;
        }

        // 不是方法定義（例如字串裡的文字），繼續往後找
        if bytes.get(body) != Some(&b'{') {
            cursor = start + needle.len();
            continue;
        }

        let close_brace = matching_close(bytes, body).ok_or_else(unbalanced)?;
        let mut end = close_brace + 1;
        if bytes.get(end) == Some(&b',') {
            end += 1;
        }

        spans.push(start..end);
        if scope == ReplaceScope::First {
            break;
        }
        cursor = end;
    }

    Ok(spans)
}

/// 回傳與 `open` 位置的 `(` 或 `{` 對應的結尾索引
fn matching_close(bytes: &[u8], open: usize) -> Option<usize> {
    let (open_ch, close_ch) = match bytes.get(open)? {
        b'(' => (b'(', b')'),
        b'{' => (b'{', b'}'),
        _ => return None,
    };

    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' => i = skip_quoted(bytes, i),
            b'`' => i = skip_template(bytes, i)?,
            b'/' if bytes.get(i + 1) == Some(&b'/') => i = skip_line_comment(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(bytes, i)?,
            c if c == open_ch => {
                depth += 1;
                i += 1;
            }
            c if c == close_ch => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

// 未結束的字串在換行處結束
fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn skip_template(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return Some(i + 1),
            b'$' if bytes.get(i + 1) == Some(&b'{') => i = matching_close(bytes, i + 1)? + 1,
            _ => i += 1,
        }
    }
    None
}

fn skip_line_comment(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |offset| start + offset)
}

fn skip_block_comment(bytes: &[u8], start: usize) -> Option<usize> {
    bytes[start + 2..]
        .windows(2)
        .position(|w| w == b"*/")
        .map(|offset| start + 2 + offset + 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"const apiService = {
  async getStore(id) {
    const response = await api.get(`/stores/${id}`);
    return response.data;
  },

  async sendWebPushToStore(storeId, notification) {
    const response = await api.post(`/stores/${storeId}/push`, {
      ...notification,
      data: { link: '}' }
    });
    return response.data;
  },

  async other() {
    return null;
  }
};
"#;

    fn spans(strategy: MatchStrategy, scope: ReplaceScope) -> Vec<Range<usize>> {
        find_method_spans(SOURCE, "sendWebPushToStore", strategy, scope).unwrap()
    }

    #[test]
    fn test_first_brace_stops_at_first_closing_brace() {
        let found = spans(MatchStrategy::FirstBrace, ReplaceScope::First);
        assert_eq!(found.len(), 1);
        let matched = &SOURCE[found[0].clone()];
        assert!(matched.starts_with("async sendWebPushToStore(storeId, notification) {"));
        // `${storeId}` 的 `}` 就結束了
        assert!(matched.ends_with("/stores/${storeId}"));
    }

    #[test]
    fn test_balanced_covers_whole_method_and_comma() {
        let found = spans(MatchStrategy::Balanced, ReplaceScope::First);
        assert_eq!(found.len(), 1);
        let matched = &SOURCE[found[0].clone()];
        assert!(matched.starts_with("async sendWebPushToStore("));
        assert!(matched.ends_with("return response.data;\n  },"));
        assert!(matched.contains("link: '}'"));
    }

    #[test]
    fn test_missing_method_has_no_spans() {
        for strategy in [MatchStrategy::FirstBrace, MatchStrategy::Balanced] {
            let found = find_method_spans(SOURCE, "sendCustomWebPushWithUrl", strategy, ReplaceScope::All).unwrap();
            assert!(found.is_empty());
        }
    }

    #[test]
    fn test_method_name_is_escaped() {
        let text = "async a.b(x) { return 1; }";
        let found = find_method_spans(text, "a.b", MatchStrategy::FirstBrace, ReplaceScope::First).unwrap();
        assert_eq!(found, vec![0..text.len()]);

        let other = "async axb(x) { }";
        let found = find_method_spans(other, "a.b", MatchStrategy::FirstBrace, ReplaceScope::First).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_all_scope_finds_every_occurrence() {
        let text = "async ping() { return 1; },\nasync ping() { return 2; },\n";
        for strategy in [MatchStrategy::FirstBrace, MatchStrategy::Balanced] {
            let found = find_method_spans(text, "ping", strategy, ReplaceScope::All).unwrap();
            assert_eq!(found.len(), 2);
            assert_eq!(&text[found[1].clone()], "async ping() { return 2; },");
        }
    }

    #[test]
    fn test_first_brace_spans_lines_with_dotall() {
        let text = "async ping(\n  a,\n  b\n) {\n  return a;\n}";
        let found = find_method_spans(text, "ping", MatchStrategy::FirstBrace, ReplaceScope::First).unwrap();
        assert_eq!(found, vec![0..text.len()]);
    }

    #[test]
    fn test_balanced_skips_comments_and_templates() {
        let text = "async ping() {\n  // }\n  /* } */\n  return `${ {a: 1}.a }}`;\n}\nrest";
        let found = find_method_spans(text, "ping", MatchStrategy::Balanced, ReplaceScope::First).unwrap();
        assert_eq!(&text[found[0].clone()], &text[..text.len() - "\nrest".len()]);
    }

    #[test]
    fn test_balanced_unterminated_body_is_an_error() {
        let text = "async ping() {\n  if (x) {\n    return 1;\n  }\n";
        let err = find_method_spans(text, "ping", MatchStrategy::Balanced, ReplaceScope::First).unwrap_err();
        assert!(matches!(err, PatchError::UnbalancedBraces { offset: 0, .. }));
    }

    #[test]
    fn test_balanced_ignores_non_definitions() {
        let text = "log('async ping(x) is slow');\nasync ping(x) { return x; }";
        let found = find_method_spans(text, "ping", MatchStrategy::Balanced, ReplaceScope::All).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].clone()], "async ping(x) { return x; }");
    }
}
