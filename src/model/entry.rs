//! 条目复合键：(name, source)，区分大小写

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntryKey {
    pub name: String,
    pub source: String,
}

impl EntryKey {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// 读取源条目自身的 `name` / `source`
    pub fn of_entry(entry: &Map<String, Value>) -> Option<Self> {
        Self::from_fields(entry, "name", "source")
    }

    /// 读取字典条目指向的 `origin_name` / `origin_source`
    pub fn of_override(entry: &Map<String, Value>) -> Option<Self> {
        Self::from_fields(entry, "origin_name", "origin_source")
    }

    fn from_fields(entry: &Map<String, Value>, name_field: &str, source_field: &str) -> Option<Self> {
        let name = entry.get(name_field)?.as_str()?;
        let source = entry.get(source_field)?.as_str()?;
        Some(Self::new(name, source))
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.name, self.source)
    }
}
