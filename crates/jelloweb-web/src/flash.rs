//! One-shot messages shown above the form in the same response.

use jelloweb_engine::EngineError;
use minijinja::HtmlEscape;
use serde::Serialize;

pub const LOAD_FAILED: &str = "Jello could not read the input. Is it JSON or JSON Lines?";
pub const QUERY_FAILED: &str = "Jello ran into the following exception when running your query:";
pub const PARSE_FAILED: &str = "jc ran into the following exception when parsing your input:";

#[derive(Debug, Clone, Serialize)]
pub struct Flash {
    /// Bootstrap alert category.
    pub category: &'static str,
    /// Pre-escaped HTML.
    pub message: String,
}

impl Flash {
    /// Lead sentence, error kind, and the escaped error text with newlines as `<br>`.
    pub fn exception(lead: &str, err: &EngineError) -> Self {
        let text = HtmlEscape(&err.to_string()).to_string().replace('\n', "<br>");
        Self {
            category: "danger",
            message: format!(
                "<p>{}</p><p><strong>{}:</strong></p><p>{}</p>",
                HtmlEscape(lead),
                err.kind(),
                text
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_message_is_escaped() {
        let err = EngineError::Key("'<b>'\nnext".to_string());
        let flash = Flash::exception(QUERY_FAILED, &err);
        assert_eq!(flash.category, "danger");
        assert_eq!(
            flash.message,
            "<p>Jello ran into the following exception when running your query:</p>\
             <p><strong>KeyError:</strong></p>\
             <p>&#x27;&lt;b&gt;&#x27;<br>next</p>"
        );
    }
}
