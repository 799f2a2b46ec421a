//! 背景条目翻译合并库
//!
//! 提供字典索引、按 (name, source) 复合键合并翻译条目、以及文本中标签引用的提取与审计功能

pub mod model;
pub mod utils;

// 重新导出主要类型
pub use model::config::TranslatorConfig;
pub use model::dictionary::{DictionaryIndex, DictionaryOverride};
pub use model::entry::EntryKey;
pub use model::error::{KeyOrigin, TranslateError};
pub use model::merge::{merge_document, MergeOptions, MergeOutcome};
pub use model::report::{Diagnostic, MergeReport, SkipReason};
pub use model::tag_ref::{audit_document, collect_tag_references, extract_tag_references, TagOccurrence, TagReference};
pub use model::translator::{translate_dirs, TranslateSummary, Translator};
pub use model::tree_walk::{walk_strings, walk_strings_with_path};
