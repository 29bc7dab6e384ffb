//! Tokenizer for path queries.

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    Dot,
    Comma,
    Colon,
    LBracket,
    RBracket,
    LParen,
    RParen,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "{}", s),
            Token::Str(s)   => write!(f, "{:?}", s),
            Token::Int(n)   => write!(f, "{}", n),
            Token::Float(n) => write!(f, "{}", n),
            Token::Dot      => f.write_str("."),
            Token::Comma    => f.write_str(","),
            Token::Colon    => f.write_str(":"),
            Token::LBracket => f.write_str("["),
            Token::RBracket => f.write_str("]"),
            Token::LParen   => f.write_str("("),
            Token::RParen   => f.write_str(")"),
        }
    }
}

/// A token and the char offset it starts at.
pub type Spanned = (Token, usize);

pub fn tokenize(src: &str) -> Result<Vec<Spanned>> {
    let chars: Vec<char> = src.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;
        match c {
            c if c.is_whitespace() => { i += 1; continue; }
            '.' if !chars.get(i + 1).is_some_and(|d| d.is_ascii_digit()) => {
                out.push((Token::Dot, start));
                i += 1;
            }
            ',' => { out.push((Token::Comma, start)); i += 1; }
            ':' => { out.push((Token::Colon, start)); i += 1; }
            '[' => { out.push((Token::LBracket, start)); i += 1; }
            ']' => { out.push((Token::RBracket, start)); i += 1; }
            '(' => { out.push((Token::LParen, start)); i += 1; }
            ')' => { out.push((Token::RParen, start)); i += 1; }
            '"' | '\'' => {
                let (s, next) = lex_string(&chars, i)?;
                out.push((Token::Str(s), start));
                i = next;
            }
            c if c.is_ascii_digit() || c == '-' || c == '.' => {
                let (tok, next) = lex_number(&chars, i)?;
                out.push((tok, start));
                i = next;
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut j = i;
                while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_') {
                    j += 1;
                }
                out.push((Token::Ident(chars[i..j].iter().collect()), start));
                i = j;
            }
            other => {
                return Err(EngineError::Syntax(format!(
                    "invalid character '{}' at position {}",
                    other, start
                )));
            }
        }
    }
    Ok(out)
}

fn lex_string(chars: &[char], start: usize) -> Result<(String, usize)> {
    let quote = chars[start];
    let mut s = String::new();
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => {
                let esc = chars.get(i + 1).ok_or_else(|| unterminated(start))?;
                s.push(match esc {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    other => *other,
                });
                i += 2;
            }
            c if c == quote => return Ok((s, i + 1)),
            c => { s.push(c); i += 1; }
        }
    }
    Err(unterminated(start))
}

fn unterminated(start: usize) -> EngineError {
    EngineError::Syntax(format!("unterminated string literal starting at position {}", start))
}

fn lex_number(chars: &[char], start: usize) -> Result<(Token, usize)> {
    let mut i = start;
    if chars[i] == '-' {
        i += 1;
    }
    let digits_start = i;
    let mut is_float = false;
    while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.' || chars[i] == '_') {
        if chars[i] == '.' {
            if is_float {
                break;
            }
            is_float = true;
        }
        i += 1;
    }
    if i == digits_start {
        return Err(EngineError::Syntax(format!(
            "expected a number after '-' at position {}",
            start
        )));
    }
    let text: String = chars[start..i].iter().filter(|c| **c != '_').collect();
    let tok = if is_float {
        text.parse::<f64>().map(Token::Float).ok()
    } else {
        text.parse::<i64>().map(Token::Int).ok()
    };
    tok.map(|t| (t, i)).ok_or_else(|| {
        EngineError::Syntax(format!("invalid number literal '{}' at position {}", text, start))
    })
}
