//! 树遍历：深度优先访问 JSON 中的每个字符串叶子

use serde_json::Value;

/// 对每个字符串叶子调用 visitor；数字、布尔、空值忽略
pub fn walk_strings<F>(root: &Value, visitor: &mut F)
where
    F: FnMut(&str),
{
    match root {
        Value::Object(map) => {
            for child in map.values() {
                walk_strings(child, visitor);
            }
        }
        Value::Array(arr) => {
            for child in arr {
                walk_strings(child, visitor);
            }
        }
        Value::String(s) => visitor(s),
        Value::Number(_) | Value::Bool(_) | Value::Null => {}
    }
}

/// 与 [`walk_strings`] 相同，但同时给出叶子的 RFC 9535 JSONPath
pub fn walk_strings_with_path<F>(root: &Value, visitor: &mut F)
where
    F: FnMut(&str, &str),
{
    fn walk<F: FnMut(&str, &str)>(v: &Value, path: &str, visitor: &mut F) {
        match v {
            Value::Object(map) => {
                for (k, child) in map {
                    walk(child, &field_path(path, k), visitor);
                }
            }
            Value::Array(arr) => {
                for (idx, child) in arr.iter().enumerate() {
                    walk(child, &format!("{}[{}]", path, idx), visitor);
                }
            }
            Value::String(s) => visitor(path, s),
            _ => {}
        }
    }

    walk(root, "$", visitor);
}

/// 字段含特殊字符时使用 bracket-notation
fn field_path(parent: &str, key: &str) -> String {
    if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        format!("{}.{}", parent, key)
    } else {
        format!("{}['{}']", parent, key.replace('\'', "\\'"))
    }
}
