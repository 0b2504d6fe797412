//! Matching collections by the parameters they were fetched with.

use serde_json::{Number, Value};
use sha2::{Digest, Sha256};

use crate::store::CollectionEntry;

/// Recursive structural equality over JSON values.
///
/// Arrays compare element by element in order, objects compare by key set
/// regardless of insertion order, and numbers compare by value so `1` and
/// `1.0` are the same parameter.
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
  match (a, b) {
    (Value::Null, Value::Null) => true,
    (Value::Bool(x), Value::Bool(y)) => x == y,
    (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
    (Value::String(x), Value::String(y)) => x == y,
    (Value::Array(xs), Value::Array(ys)) => {
      xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| structurally_equal(x, y))
    }
    (Value::Object(xs), Value::Object(ys)) => {
      xs.len() == ys.len()
        && xs
          .iter()
          .all(|(key, x)| ys.get(key).is_some_and(|y| structurally_equal(x, y)))
    }
    _ => false,
  }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
  if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
    return a == b;
  }
  if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
    return a == b;
  }
  match (x.as_f64(), y.as_f64()) {
    (Some(a), Some(b)) => a == b,
    _ => false,
  }
}

/// First collection, in stored order, whose params structurally equal `params`.
pub fn find_collection<'a>(
  collections: &'a [CollectionEntry],
  params: &Value,
) -> Option<&'a CollectionEntry> {
  collections
    .iter()
    .find(|collection| structurally_equal(&collection.params, params))
}

/// Stable identifier for a parameter set.
///
/// SHA-256 over a canonical rendering (sorted keys, integral floats written
/// as integers), so structurally equal params always share a fingerprint.
pub fn fingerprint(params: &Value) -> String {
  let mut canonical = String::new();
  write_canonical(params, &mut canonical);

  let mut hasher = Sha256::new();
  hasher.update(canonical.as_bytes());
  hex::encode(hasher.finalize())
}

fn write_canonical(value: &Value, out: &mut String) {
  match value {
    Value::Null => out.push_str("null"),
    Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
    Value::Number(n) => out.push_str(&canonical_number(n)),
    Value::String(s) => out.push_str(&Value::String(s.clone()).to_string()),
    Value::Array(items) => {
      out.push('[');
      for (i, item) in items.iter().enumerate() {
        if i > 0 {
          out.push(',');
        }
        write_canonical(item, out);
      }
      out.push(']');
    }
    Value::Object(map) => {
      let mut keys: Vec<&String> = map.keys().collect();
      keys.sort();
      out.push('{');
      for (i, key) in keys.into_iter().enumerate() {
        if i > 0 {
          out.push(',');
        }
        out.push_str(&Value::String(key.clone()).to_string());
        out.push(':');
        write_canonical(&map[key], out);
      }
      out.push('}');
    }
  }
}

fn canonical_number(n: &Number) -> String {
  if n.is_i64() || n.is_u64() {
    return n.to_string();
  }
  match n.as_f64() {
    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (f as i64).to_string(),
    _ => n.to_string(),
  }
}
