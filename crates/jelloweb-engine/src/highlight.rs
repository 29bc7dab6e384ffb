//! HTML syntax highlighting for JSON documents and schema listings.
//!
//! Text is tokenised with syntect's bundled grammars and every token is
//! tagged with a pygments class so a standard pygments stylesheet colours
//! the output: `nt` object keys, `s2` strings, `m` numbers, `kc`
//! `true`/`false`/`null`, `nv` names, `p` punctuation, `c1` comments.

use std::sync::OnceLock;

use minijinja::HtmlEscape;
use syntect::parsing::{ParseState, Scope, ScopeStack, SyntaxSet};

use crate::error::{EngineError, Result};

/// Which bundled grammar tokenises the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Json,
    /// `_.foo[0] = 1;  // (number)` statements read as JavaScript.
    Schema,
}

impl Grammar {
    fn extension(self) -> &'static str {
        match self {
            Grammar::Json => "json",
            Grammar::Schema => "js",
        }
    }
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Highlight `text`. In mono mode the text is only escaped.
pub fn highlight(text: &str, grammar: Grammar, mono: bool) -> Result<String> {
    if mono {
        return Ok(HtmlEscape(text).to_string());
    }

    let syntaxes = syntax_set();
    let syntax = syntaxes
        .find_syntax_by_extension(grammar.extension())
        .unwrap_or_else(|| syntaxes.find_syntax_plain_text());

    let mut state = ParseState::new(syntax);
    let mut stack = ScopeStack::new();
    let mut out = Spans::default();

    for line in text.split_inclusive('\n') {
        let ops = state
            .parse_line(line, syntaxes)
            .map_err(|e| EngineError::Highlight(e.to_string()))?;
        let mut pos = 0;
        for (at, op) in ops {
            if at > pos {
                out.push(pygments_class(&stack), &line[pos..at]);
                pos = at;
            }
            stack
                .apply(&op)
                .map_err(|e| EngineError::Highlight(e.to_string()))?;
        }
        out.push(pygments_class(&stack), &line[pos..]);
    }

    Ok(out.finish())
}

/// Map the innermost meaningful scope to a pygments token class.
fn pygments_class(stack: &ScopeStack) -> Option<&'static str> {
    let scopes: Vec<String> = stack.as_slice().iter().map(|s: &Scope| s.build_string()).collect();
    let has = |prefix: &str| scopes.iter().any(|s| s.starts_with(prefix));

    if has("comment") {
        Some("c1")
    } else if has("string") {
        let key = scopes.iter().any(|s| s.contains(".key.") || s.contains("property-name"));
        Some(if key { "nt" } else { "s2" })
    } else if has("constant.numeric") || has("meta.number") {
        Some("m")
    } else if has("constant.language") {
        Some("kc")
    } else if has("punctuation") || has("keyword.operator") {
        Some("p")
    } else if has("variable") || has("meta.property") || has("support") {
        Some("nv")
    } else {
        None
    }
}

/// Accumulates output, merging neighbouring runs of the same class.
#[derive(Default)]
struct Spans {
    html: String,
    class: Option<&'static str>,
    run: String,
}

impl Spans {
    fn push(&mut self, class: Option<&'static str>, text: &str) {
        if text.is_empty() {
            return;
        }
        if class != self.class {
            self.flush();
            self.class = class;
        }
        self.run.push_str(text);
    }

    fn flush(&mut self) {
        if self.run.is_empty() {
            return;
        }
        let text = HtmlEscape(&self.run).to_string();
        match self.class {
            Some(class) => self.html.push_str(&format!(r#"<span class="{}">{}</span>"#, class, text)),
            None => self.html.push_str(&text),
        }
        self.run.clear();
    }

    fn finish(mut self) -> String {
        self.flush();
        self.html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(text: &str) -> String {
        highlight(text, Grammar::Json, false).unwrap()
    }

    #[test]
    fn test_keys_and_values_classes() {
        let html = json(r#"{"a": "b", "n": 15, "t": null}"#);
        assert!(html.starts_with(r#"<span class="p">{</span>"#));
        assert!(html.contains(r#"<span class="nt">&quot;a&quot;</span><span class="p">:</span>"#));
        assert!(html.contains(r#"<span class="s2">&quot;b&quot;</span>"#));
        assert!(html.contains(r#"<span class="m">15</span>"#));
        assert!(html.contains(r#"<span class="kc">null</span>"#));
    }

    #[test]
    fn test_whitespace_is_left_bare() {
        let html = json("[\n  1\n]");
        assert_eq!(
            html,
            "<span class=\"p\">[</span>\n  <span class=\"m\">1</span>\n<span class=\"p\">]</span>"
        );
    }

    #[test]
    fn test_markup_inside_strings_is_escaped() {
        let html = json(r#"["<script>"]"#);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_schema_comment_and_number() {
        let html = highlight("_.a = 1;  // (number)", Grammar::Schema, false).unwrap();
        assert!(html.contains(r#"<span class="m">1</span>"#));
        assert!(html.contains(r#"<span class="c1">&#x2f;&#x2f; (number)</span>"#));
    }

    #[test]
    fn test_mono_only_escapes() {
        let html = highlight(r#"{"a": "<b>"}"#, Grammar::Json, true).unwrap();
        assert_eq!(html, "{&quot;a&quot;: &quot;&lt;b&gt;&quot;}");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(json(""), "");
    }
}
