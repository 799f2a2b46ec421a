//! 合并诊断：逐条目问题只记录，不中断流程

use std::fmt;
use std::path::PathBuf;

use crate::model::entry::EntryKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotAnObject,
    MissingIdentity,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAnObject => f.write_str("不是对象"),
            SkipReason::MissingIdentity => f.write_str("缺少字符串类型的标识字段"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// 字典文件无法读取或解析（仅在允许跳过时出现）
    UnreadableDictionary { file: PathBuf, reason: String },
    SkippedOverride { file: PathBuf, position: usize, reason: SkipReason },
    SkippedSourceEntry { position: usize, reason: SkipReason },
    /// 后出现的字典条目覆盖了先前同键条目
    DuplicateOverride { key: EntryKey, file: PathBuf },
    /// 源文件同键条目，保留第一个
    DuplicateSource { key: EntryKey, position: usize },
    NoMatch { key: EntryKey },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnreadableDictionary { file, reason } => {
                write!(f, "跳过无法读取的字典文件 {}: {}", file.display(), reason)
            }
            Diagnostic::SkippedOverride { file, position, reason } => {
                write!(f, "跳过字典条目 {}#{}: {}", file.display(), position, reason)
            }
            Diagnostic::SkippedSourceEntry { position, reason } => {
                write!(f, "跳过源条目 #{}: {}", position, reason)
            }
            Diagnostic::DuplicateOverride { key, file } => {
                write!(f, "字典条目 {} 被 {} 中的同键条目覆盖", key, file.display())
            }
            Diagnostic::DuplicateSource { key, position } => {
                write!(f, "源条目 #{} 与先前条目重复: {}", position, key)
            }
            Diagnostic::NoMatch { key } => write!(f, "未找到匹配的源条目: {}", key),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    pub source_entries: usize,
    pub dictionary_entries: usize,
    /// 按输出顺序列出已翻译的键
    pub translated: Vec<EntryKey>,
    pub diagnostics: Vec<Diagnostic>,
}

impl MergeReport {
    pub fn unmatched(&self) -> impl Iterator<Item = &EntryKey> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::NoMatch { key } => Some(key),
            _ => None,
        })
    }
}
