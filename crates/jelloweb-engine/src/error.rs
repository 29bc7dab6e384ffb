use thiserror::Error;

/// Errors raised while loading, querying, parsing or rendering.
///
/// `kind()` is the short name shown to users next to the message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("{0}")]
    Decode(String),

    #[error("{0}")]
    Syntax(String),

    #[error("{0}")]
    Attribute(String),

    #[error("{0}")]
    Key(String),

    #[error("{0}")]
    Index(String),

    #[error("{0}")]
    Type(String),

    #[error("A reserved key name with dotted notation was used in the query: '{0}'. Please use python bracket dict notation to access this key.")]
    ReservedKey(String),

    #[error("{0}")]
    Parser(String),

    #[error("unknown parser '{0}'")]
    UnknownParser(String),

    #[error("{0}")]
    Serialize(String),

    #[error("{0}")]
    Highlight(String),
}

impl EngineError {
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Decode(_)        => "DecodeError",
            EngineError::Syntax(_)        => "QuerySyntaxError",
            EngineError::Attribute(_)     => "AttributeError",
            EngineError::Key(_)           => "KeyError",
            EngineError::Index(_)         => "IndexError",
            EngineError::Type(_)          => "TypeError",
            EngineError::ReservedKey(_)   => "ReservedKeyError",
            EngineError::Parser(_)        => "ParserError",
            EngineError::UnknownParser(_) => "UnknownParserError",
            EngineError::Serialize(_)     => "SerializeError",
            EngineError::Highlight(_)     => "HighlightError",
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Serialize(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
