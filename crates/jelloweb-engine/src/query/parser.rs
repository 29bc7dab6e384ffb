//! Recursive-descent parser producing the query AST.

use serde_json::Value;

use super::lexer::{tokenize, Spanned, Token};
use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `_`
    Root,
    Literal(Value),
    /// `obj.name`
    Attr(Box<Expr>, String),
    /// `obj.name(args)`
    Method(Box<Expr>, String, Vec<Expr>),
    /// `name(args)`
    Call(String, Vec<Expr>),
    /// `obj[...]`
    Subscript(Box<Expr>, Subscript),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Subscript {
    Key(String),
    Index(i64),
    Slice(Option<i64>, Option<i64>),
}

/// Deepest expression tree accepted. Evaluation recurses once per level.
pub const MAX_DEPTH: usize = 128;

fn too_deep() -> EngineError {
    EngineError::Syntax("query is nested too deeply".to_string())
}

pub fn parse(src: &str) -> Result<Expr> {
    let tokens = tokenize(src)?;
    if tokens.is_empty() {
        return Err(EngineError::Syntax("empty query".to_string()));
    }
    let mut p = Parser { tokens, pos: 0, depth: 0 };
    let (expr, _) = p.expr()?;
    if let Some((tok, at)) = p.tokens.get(p.pos) {
        return Err(EngineError::Syntax(format!(
            "unexpected '{}' at position {}",
            tok, at
        )));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    /// Current recursion depth of `expr`.
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, want: Token) -> Result<()> {
        match self.tokens.get(self.pos) {
            Some((tok, _)) if *tok == want => {
                self.pos += 1;
                Ok(())
            }
            Some((tok, at)) => Err(EngineError::Syntax(format!(
                "expected '{}' but found '{}' at position {}",
                want, tok, at
            ))),
            None => Err(EngineError::Syntax(format!(
                "expected '{}' but the query ended",
                want
            ))),
        }
    }

    /// Parse one expression, returning it with the height of its tree.
    fn expr(&mut self) -> Result<(Expr, usize)> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(too_deep());
        }
        let parsed = self.chain();
        self.depth -= 1;
        parsed
    }

    fn chain(&mut self) -> Result<(Expr, usize)> {
        let (mut expr, mut height) = self.primary()?;
        loop {
            match self.peek() {
                Some(Token::Dot) => {
                    self.pos += 1;
                    let name = match self.next() {
                        Some(Token::Ident(name)) => name,
                        Some(other) => {
                            return Err(EngineError::Syntax(format!(
                                "expected a name after '.', found '{}'",
                                other
                            )))
                        }
                        None => {
                            return Err(EngineError::Syntax(
                                "expected a name after '.'".to_string(),
                            ))
                        }
                    };
                    if self.peek() == Some(&Token::LParen) {
                        let (args, args_height) = self.args()?;
                        height = height.max(args_height) + 1;
                        expr = Expr::Method(Box::new(expr), name, args);
                    } else {
                        height += 1;
                        expr = Expr::Attr(Box::new(expr), name);
                    }
                }
                Some(Token::LBracket) => {
                    self.pos += 1;
                    let sub = self.subscript()?;
                    self.expect(Token::RBracket)?;
                    height += 1;
                    expr = Expr::Subscript(Box::new(expr), sub);
                }
                _ => return Ok((expr, height)),
            }
            if height > MAX_DEPTH {
                return Err(too_deep());
            }
        }
    }

    fn primary(&mut self) -> Result<(Expr, usize)> {
        let leaf = |expr: Expr| -> Result<(Expr, usize)> { Ok((expr, 1)) };
        match self.next() {
            Some(Token::Ident(name)) => match name.as_str() {
                "_" => leaf(Expr::Root),
                "True" => leaf(Expr::Literal(Value::Bool(true))),
                "False" => leaf(Expr::Literal(Value::Bool(false))),
                "None" => leaf(Expr::Literal(Value::Null)),
                _ if self.peek() == Some(&Token::LParen) => {
                    let (args, args_height) = self.args()?;
                    Ok((Expr::Call(name, args), args_height + 1))
                }
                _ => Err(EngineError::Syntax(format!(
                    "name '{}' is not defined; queries start with '_'",
                    name
                ))),
            },
            Some(Token::Str(s)) => leaf(Expr::Literal(Value::String(s))),
            Some(Token::Int(n)) => leaf(Expr::Literal(Value::from(n))),
            Some(Token::Float(n)) => leaf(Expr::Literal(Value::from(n))),
            Some(other) => Err(EngineError::Syntax(format!("unexpected '{}'", other))),
            None => Err(EngineError::Syntax("unexpected end of query".to_string())),
        }
    }

    /// Parenthesised arguments and the height of the tallest one.
    fn args(&mut self) -> Result<(Vec<Expr>, usize)> {
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        let mut height = 0;
        if self.peek() == Some(&Token::RParen) {
            self.pos += 1;
            return Ok((args, height));
        }
        loop {
            let (arg, arg_height) = self.expr()?;
            height = height.max(arg_height);
            args.push(arg);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok((args, height)),
                Some(other) => {
                    return Err(EngineError::Syntax(format!(
                        "expected ',' or ')' in argument list, found '{}'",
                        other
                    )))
                }
                None => return Err(EngineError::Syntax("unclosed argument list".to_string())),
            }
        }
    }

    fn subscript(&mut self) -> Result<Subscript> {
        if let Some(Token::Str(s)) = self.peek().cloned() {
            self.pos += 1;
            return Ok(Subscript::Key(s));
        }
        let start = self.opt_int()?;
        if self.peek() == Some(&Token::Colon) {
            self.pos += 1;
            let end = self.opt_int()?;
            return Ok(Subscript::Slice(start, end));
        }
        start.map(Subscript::Index).ok_or_else(|| {
            EngineError::Syntax("expected an index, key or slice inside '[ ]'".to_string())
        })
    }

    fn opt_int(&mut self) -> Result<Option<i64>> {
        match self.peek() {
            Some(Token::Int(n)) => {
                let n = *n;
                self.pos += 1;
                Ok(Some(n))
            }
            Some(Token::Float(_)) => Err(EngineError::Type(
                "indices must be integers or slices, not float".to_string(),
            )),
            _ => Ok(None),
        }
    }
}
