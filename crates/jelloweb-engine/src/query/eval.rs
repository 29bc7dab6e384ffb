//! AST evaluation against a JSON value.

use std::cmp::Ordering;

use serde_json::Value;

use super::parser::{Expr, Subscript};
use super::RESERVED_NAMES;
use crate::error::{EngineError, Result};
use crate::type_name;

pub fn eval(expr: &Expr, root: &Value) -> Result<Value> {
    match expr {
        Expr::Root => Ok(root.clone()),
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Attr(obj, name) => attr(eval(obj, root)?, name),
        Expr::Subscript(obj, sub) => subscript(eval(obj, root)?, sub),
        Expr::Method(obj, name, args) => {
            let target = eval(obj, root)?;
            let args = args.iter().map(|a| eval(a, root)).collect::<Result<Vec<_>>>()?;
            method(target, name, args)
        }
        Expr::Call(name, args) => {
            let args = args.iter().map(|a| eval(a, root)).collect::<Result<Vec<_>>>()?;
            builtin(name, args)
        }
    }
}

fn attr(target: Value, name: &str) -> Result<Value> {
    match target {
        Value::Object(mut map) => {
            // A dotted reserved name would resolve to the wrapper's method, never the key.
            if RESERVED_NAMES.contains(&name) {
                return Err(EngineError::ReservedKey(name.to_string()));
            }
            map.remove(name).ok_or_else(|| {
                EngineError::Attribute(format!("object has no attribute '{}'", name))
            })
        }
        other => Err(EngineError::Attribute(format!(
            "{} value has no attribute '{}'",
            type_name(&other),
            name
        ))),
    }
}

fn subscript(target: Value, sub: &Subscript) -> Result<Value> {
    match (target, sub) {
        (Value::Object(mut map), Subscript::Key(key)) => map
            .remove(key.as_str())
            .ok_or_else(|| EngineError::Key(format!("'{}'", key))),
        (Value::Array(mut items), Subscript::Index(i)) => {
            let idx = resolve_index(*i, items.len())
                .ok_or_else(|| EngineError::Index("list index out of range".to_string()))?;
            Ok(items.swap_remove(idx))
        }
        (Value::String(s), Subscript::Index(i)) => {
            let chars: Vec<char> = s.chars().collect();
            let idx = resolve_index(*i, chars.len())
                .ok_or_else(|| EngineError::Index("string index out of range".to_string()))?;
            Ok(Value::String(chars[idx].to_string()))
        }
        (Value::Array(items), Subscript::Slice(start, end)) => {
            let (a, b) = slice_bounds(*start, *end, items.len());
            Ok(Value::Array(items[a..b].to_vec()))
        }
        (Value::String(s), Subscript::Slice(start, end)) => {
            let chars: Vec<char> = s.chars().collect();
            let (a, b) = slice_bounds(*start, *end, chars.len());
            Ok(Value::String(chars[a..b].iter().collect()))
        }
        (Value::Array(_), Subscript::Key(_)) | (Value::String(_), Subscript::Key(_)) => Err(
            EngineError::Type("indices must be integers or slices, not str".to_string()),
        ),
        (Value::Object(_), _) => Err(EngineError::Type(
            "object keys must be strings; slicing an object is not supported".to_string(),
        )),
        (other, _) => Err(EngineError::Type(format!(
            "{} value is not subscriptable",
            type_name(&other)
        ))),
    }
}

fn resolve_index(i: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let idx = if i < 0 { len + i } else { i };
    (0..len).contains(&idx).then_some(idx as usize)
}

fn slice_bounds(start: Option<i64>, end: Option<i64>, len: usize) -> (usize, usize) {
    let clamp = |v: i64| -> usize {
        let len = len as i64;
        let v = if v < 0 { len + v } else { v };
        v.clamp(0, len) as usize
    };
    let a = start.map(clamp).unwrap_or(0);
    let b = end.map(clamp).unwrap_or(len);
    (a, b.max(a))
}

fn method(target: Value, name: &str, args: Vec<Value>) -> Result<Value> {
    match (&target, name) {
        (Value::Object(map), "keys") => {
            no_args(name, &args)?;
            Ok(Value::Array(map.keys().cloned().map(Value::String).collect()))
        }
        (Value::Object(map), "values") => {
            no_args(name, &args)?;
            Ok(Value::Array(map.values().cloned().collect()))
        }
        (Value::Object(map), "items") => {
            no_args(name, &args)?;
            Ok(Value::Array(
                map.iter()
                    .map(|(k, v)| Value::Array(vec![Value::String(k.clone()), v.clone()]))
                    .collect(),
            ))
        }
        (Value::Object(map), "get") => {
            let (key, default) = match args.as_slice() {
                [Value::String(k)] => (k, Value::Null),
                [Value::String(k), d] => (k, d.clone()),
                _ => {
                    return Err(EngineError::Type(
                        "get() expects a string key and an optional default".to_string(),
                    ))
                }
            };
            Ok(map.get(key.as_str()).cloned().unwrap_or(default))
        }
        (Value::Object(_), m) if RESERVED_NAMES.contains(&m) => Err(EngineError::Type(format!(
            "method '{}' would modify the data and is not supported",
            m
        ))),
        (Value::String(s), "upper") => {
            no_args(name, &args)?;
            Ok(Value::String(s.to_uppercase()))
        }
        (Value::String(s), "lower") => {
            no_args(name, &args)?;
            Ok(Value::String(s.to_lowercase()))
        }
        (Value::String(s), "strip") => {
            no_args(name, &args)?;
            Ok(Value::String(s.trim().to_string()))
        }
        (Value::String(s), "split") => {
            let parts: Vec<Value> = match args.as_slice() {
                [] => s.split_whitespace().map(|p| Value::String(p.to_string())).collect(),
                [Value::String(sep)] if !sep.is_empty() => {
                    s.split(sep.as_str()).map(|p| Value::String(p.to_string())).collect()
                }
                _ => {
                    return Err(EngineError::Type(
                        "split() expects an optional non-empty string separator".to_string(),
                    ))
                }
            };
            Ok(Value::Array(parts))
        }
        _ => Err(EngineError::Attribute(format!(
            "{} value has no method '{}'",
            type_name(&target),
            name
        ))),
    }
}

fn no_args(name: &str, args: &[Value]) -> Result<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(EngineError::Type(format!(
            "{}() takes no arguments ({} given)",
            name,
            args.len()
        )))
    }
}

const BUILTINS: &[&str] = &["len", "sorted", "sum"];

fn builtin(name: &str, args: Vec<Value>) -> Result<Value> {
    if !BUILTINS.contains(&name) {
        return Err(EngineError::Syntax(format!("name '{}' is not defined", name)));
    }
    let arg = match <[Value; 1]>::try_from(args) {
        Ok([arg]) => arg,
        Err(args) => {
            return Err(EngineError::Type(format!(
                "{}() takes exactly one argument ({} given)",
                name,
                args.len()
            )))
        }
    };

    match name {
        "len" => match &arg {
            Value::Array(a) => Ok(Value::from(a.len())),
            Value::Object(m) => Ok(Value::from(m.len())),
            Value::String(s) => Ok(Value::from(s.chars().count())),
            other => Err(EngineError::Type(format!(
                "{} value has no len()",
                type_name(other)
            ))),
        },
        "sorted" => {
            let mut items = match arg {
                Value::Array(a) => a,
                Value::Object(m) => m.keys().cloned().map(Value::String).collect(),
                other => {
                    return Err(EngineError::Type(format!(
                        "{} value is not iterable",
                        type_name(&other)
                    )))
                }
            };
            let mut err = None;
            items.sort_by(|a, b| {
                compare(a, b).unwrap_or_else(|e| {
                    err.get_or_insert(e);
                    Ordering::Equal
                })
            });
            match err {
                Some(e) => Err(e),
                None => Ok(Value::Array(items)),
            }
        }
        "sum" => {
            let items = match arg {
                Value::Array(a) => a,
                other => {
                    return Err(EngineError::Type(format!(
                        "{} value is not iterable",
                        type_name(&other)
                    )))
                }
            };
            sum(&items)
        }
        other => Err(EngineError::Syntax(format!("name '{}' is not defined", other))),
    }
}

fn compare(a: &Value, b: &Value) -> Result<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            Ok(x.partial_cmp(&y).unwrap_or(Ordering::Equal))
        }
        (Value::String(x), Value::String(y)) => Ok(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Ok(x.cmp(y)),
        _ => Err(EngineError::Type(format!(
            "'<' not supported between {} and {} values",
            type_name(a),
            type_name(b)
        ))),
    }
}

fn sum(items: &[Value]) -> Result<Value> {
    let mut int_total: i64 = 0;
    let mut float_total: f64 = 0.0;
    let mut is_float = false;

    for item in items {
        let n = match item {
            Value::Number(n) => n,
            other => {
                return Err(EngineError::Type(format!(
                    "unsupported operand type for +: {} value",
                    type_name(other)
                )))
            }
        };
        match n.as_i64() {
            Some(i) if !is_float => match int_total.checked_add(i) {
                Some(t) => int_total = t,
                None => {
                    is_float = true;
                    float_total = int_total as f64 + i as f64;
                }
            },
            _ => {
                if !is_float {
                    is_float = true;
                    float_total = int_total as f64;
                }
                float_total += n.as_f64().unwrap_or(0.0);
            }
        }
    }

    Ok(if is_float { Value::from(float_total) } else { Value::from(int_total) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse;
    use serde_json::json;

    fn run(data: Value, q: &str) -> Result<Value> {
        eval(&parse(q)?, &data)
    }

    fn sample() -> Value {
        json!({"foo": {"bar": [1, 2, 3]}, "name": "Jello", "items": ["x", "y"]})
    }

    #[test]
    fn test_negative_index_and_slices() {
        assert_eq!(run(sample(), "_.foo.bar[-1]").unwrap(), json!(3));
        assert_eq!(run(sample(), "_.foo.bar[1:]").unwrap(), json!([2, 3]));
        assert_eq!(run(sample(), "_.foo.bar[:-1]").unwrap(), json!([1, 2]));
        assert_eq!(run(sample(), "_.foo.bar[5:9]").unwrap(), json!([]));
        assert_eq!(run(sample(), "_.name[1:3]").unwrap(), json!("el"));
    }

    #[test]
    fn test_reserved_names_as_methods() {
        assert_eq!(run(sample(), "_.foo.keys()").unwrap(), json!(["bar"]));
        assert_eq!(run(sample(), "len(_.values())").unwrap(), json!(3));
        assert_eq!(run(json!({"a": 1}), "_.items()").unwrap(), json!([["a", 1]]));
        assert_eq!(run(sample(), r#"_.get("missing", 0)"#).unwrap(), json!(0));

        let err = run(sample(), "_.pop()").unwrap_err();
        assert_eq!(err.kind(), "TypeError");
    }

    #[test]
    fn test_missing_key_and_index() {
        assert_eq!(run(sample(), "_.nope").unwrap_err().kind(), "AttributeError");
        assert_eq!(run(sample(), r#"_["nope"]"#).unwrap_err().kind(), "KeyError");
        assert_eq!(run(sample(), "_.foo.bar[3]").unwrap_err().kind(), "IndexError");
    }

    #[test]
    fn test_type_errors() {
        assert_eq!(run(sample(), "_.foo.bar.baz").unwrap_err().kind(), "AttributeError");
        assert_eq!(run(sample(), r#"_.foo.bar["x"]"#).unwrap_err().kind(), "TypeError");
        assert_eq!(run(sample(), "_.foo.bar[0][0]").unwrap_err().kind(), "TypeError");
        assert_eq!(run(json!([1, "a"]), "sorted(_)").unwrap_err().kind(), "TypeError");
    }

    #[test]
    fn test_builtins() {
        assert_eq!(run(sample(), "len(_.name)").unwrap(), json!(5));
        assert_eq!(run(json!([3, 1, 2]), "sorted(_)").unwrap(), json!([1, 2, 3]));
        assert_eq!(run(json!({"b": 1, "a": 2}), "sorted(_)").unwrap(), json!(["a", "b"]));
        assert_eq!(run(json!([1, 2, 3]), "sum(_)").unwrap(), json!(6));
        assert_eq!(run(json!([1, 2.5]), "sum(_)").unwrap(), json!(3.5));
        assert_eq!(run(sample(), "nope(_)").unwrap_err().kind(), "QuerySyntaxError");
    }

    #[test]
    fn test_string_methods() {
        assert_eq!(run(json!(" a b "), "_.strip().upper()").unwrap(), json!("A B"));
        assert_eq!(run(json!("a,b"), r#"_.split(",")"#).unwrap(), json!(["a", "b"]));
        assert_eq!(run(json!("a  b"), "_.split()").unwrap(), json!(["a", "b"]));
    }

    #[test]
    fn test_resolve_index_extremes() {
        assert_eq!(resolve_index(0, 3), Some(0));
        assert_eq!(resolve_index(-3, 3), Some(0));
        assert_eq!(resolve_index(-4, 3), None);
        assert_eq!(resolve_index(3, 3), None);
        assert_eq!(resolve_index(i64::MIN, 3), None);
        assert_eq!(resolve_index(i64::MAX, 3), None);
        assert_eq!(resolve_index(0, 0), None);
    }

    #[test]
    fn test_slice_bounds_clamp() {
        assert_eq!(slice_bounds(None, None, 3), (0, 3));
        assert_eq!(slice_bounds(Some(i64::MIN), Some(i64::MAX), 3), (0, 3));
        assert_eq!(slice_bounds(Some(i64::MAX), Some(i64::MIN), 3), (3, 3));
        assert_eq!(slice_bounds(Some(-1), None, 3), (2, 3));
        assert_eq!(slice_bounds(Some(2), Some(1), 3), (2, 2));
        assert_eq!(slice_bounds(None, Some(-10), 0), (0, 0));
    }

    #[test]
    fn test_extreme_literal_indices() {
        assert_eq!(run(sample(), "_.foo.bar[-9223372036854775807:]").unwrap(), json!([1, 2, 3]));
        assert_eq!(run(sample(), "_.foo.bar[9223372036854775807]").unwrap_err().kind(), "IndexError");
    }
}
