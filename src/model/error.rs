//! TranslateError：加载、合并、写出阶段的致命错误

use std::path::PathBuf;

use thiserror::Error;

use crate::model::entry::EntryKey;

/// 重复键出现的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    Source,
    Dictionary,
}

impl std::fmt::Display for KeyOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyOrigin::Source => f.write_str("源文件"),
            KeyOrigin::Dictionary => f.write_str("字典"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("IO失败 {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON解析失败 {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("JSON序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("源文件根节点不是对象")]
    SourceNotObject,
    #[error("源文件缺少 '{key}' 字段")]
    MissingCollection { key: String },
    #[error("源文件 '{key}' 字段不是数组")]
    CollectionNotArray { key: String },
    #[error("{origin}中存在重复键: {key}")]
    DuplicateKey { origin: KeyOrigin, key: EntryKey },
    #[error("配置错误: {0}")]
    Config(String),
}

impl TranslateError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse { path: path.into(), source }
    }
}
