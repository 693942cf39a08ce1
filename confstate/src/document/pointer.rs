use crate::error::SchemaError;
use serde_json::{Map, Value};
use std::fmt;

/// Largest array index a pointer may name. Matches the longest list a store
/// can persist, and keeps `create` from growing an array without bound.
pub const MAX_INDEX: usize = u16::MAX as usize;

/// A parsed JSON pointer (RFC 6901), resolved against a document tree.
///
/// The empty pointer addresses the root itself. Parsing happens once at
/// schema construction; lookups and creation only walk the token list.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPointer {
    raw: String,
    tokens: Vec<String>,
}

impl JsonPointer {
    /// The pointer that addresses the root value.
    pub fn root() -> Self {
        JsonPointer::default()
    }

    pub fn parse(raw: &str) -> Result<Self, SchemaError> {
        if raw.is_empty() {
            return Ok(JsonPointer::root());
        }

        let invalid = |reason: &str| SchemaError::InvalidPointer {
            pointer: raw.to_string(),
            reason: reason.to_string(),
        };

        let rest = raw
            .strip_prefix('/')
            .ok_or_else(|| invalid("must be empty or start with '/'"))?;

        let mut tokens = Vec::new();
        for segment in rest.split('/') {
            let mut token = String::with_capacity(segment.len());
            let mut chars = segment.chars();
            while let Some(c) = chars.next() {
                if c == '~' {
                    match chars.next() {
                        Some('0') => token.push('~'),
                        Some('1') => token.push('/'),
                        _ => return Err(invalid("'~' must be followed by '0' or '1'")),
                    }
                } else {
                    token.push(c);
                }
            }
            if parse_index(&token).is_some_and(|i| i > MAX_INDEX) {
                return Err(invalid("array index too large"));
            }
            tokens.push(token);
        }

        Ok(JsonPointer {
            raw: raw.to_string(),
            tokens,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Look up the value at this pointer. Absent paths yield `None`.
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.tokens.iter().try_fold(root, |current, token| match current {
            Value::Object(map) => map.get(token),
            Value::Array(items) => parse_index(token).and_then(|i| items.get(i)),
            _ => None,
        })
    }

    pub fn get_mut<'a>(&self, root: &'a mut Value) -> Option<&'a mut Value> {
        self.tokens.iter().try_fold(root, |current, token| match current {
            Value::Object(map) => map.get_mut(token),
            Value::Array(items) => parse_index(token).and_then(move |i| items.get_mut(i)),
            _ => None,
        })
    }

    /// Resolve this pointer, creating every missing container on the way.
    ///
    /// Numeric tokens address (and grow) arrays, `-` appends to an array, any
    /// other token addresses an object member. A scalar standing where a
    /// container is needed is replaced.
    pub fn create<'a>(&self, root: &'a mut Value) -> &'a mut Value {
        let mut current = root;
        for token in &self.tokens {
            current = step_create(current, token);
        }
        current
    }
}

fn step_create<'a>(current: &'a mut Value, token: &str) -> &'a mut Value {
    let index = parse_index(token);
    let as_array = match current {
        Value::Array(_) => token == "-" || index.is_some(),
        Value::Object(_) => false,
        _ => index.is_some(),
    };

    if as_array && !current.is_array() {
        *current = Value::Array(Vec::new());
    } else if !as_array && !current.is_object() {
        *current = Value::Object(Map::new());
    }

    match current {
        Value::Array(items) => {
            // `-` has no index and appends
            let i = index.unwrap_or(items.len());
            if i >= items.len() {
                items.resize(i + 1, Value::Null);
            }
            &mut items[i]
        }
        Value::Object(map) => map.entry(token.to_string()).or_insert(Value::Null),
        other => other,
    }
}

/// Array index per RFC 6901: decimal digits without leading zeros.
fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty()
        || !token.bytes().all(|b| b.is_ascii_digit())
        || (token.len() > 1 && token.starts_with('0'))
    {
        return None;
    }
    token.parse().ok()
}

impl fmt::Debug for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonPointer({:?})", self.raw)
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
