//! 合并引擎：按复合键将字典覆盖条目应用到源条目，生成新的文档

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::model::config::{TranslatorConfig, DEFAULT_COLLECTION_KEY, DEFAULT_OVERRIDE_FIELDS};
use crate::model::dictionary::{DictionaryIndex, DictionaryOverride};
use crate::model::entry::EntryKey;
use crate::model::error::{KeyOrigin, TranslateError};
use crate::model::report::{Diagnostic, MergeReport, SkipReason};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    pub collection_key: String,
    pub override_fields: Vec<String>,
    pub keep_untranslated: bool,
    pub reject_duplicates: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            collection_key: DEFAULT_COLLECTION_KEY.to_string(),
            override_fields: DEFAULT_OVERRIDE_FIELDS.iter().map(|s| s.to_string()).collect(),
            keep_untranslated: false,
            reject_duplicates: false,
        }
    }
}

impl From<&TranslatorConfig> for MergeOptions {
    fn from(config: &TranslatorConfig) -> Self {
        Self {
            collection_key: config.collection_key.clone(),
            override_fields: config.override_fields.clone(),
            keep_untranslated: config.keep_untranslated,
            reject_duplicates: config.reject_duplicates,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub document: Value,
    pub report: MergeReport,
}

/// 以源条目为底，覆盖 fields 中列出且字典条目里存在的字段
pub fn overlay_entry(source: &Map<String, Value>, over: &DictionaryOverride, fields: &[String]) -> Map<String, Value> {
    let mut merged = source.clone();
    for field in fields {
        if let Some(value) = over.fields.get(field) {
            merged.insert(field.clone(), value.clone());
        }
    }
    merged
}

/// 合并源文档与字典索引，输入保持不变
///
/// 默认只输出命中的条目（按字典顺序）；`keep_untranslated` 时按源顺序输出全部条目。
pub fn merge_document(source: &Value, index: &DictionaryIndex, options: &MergeOptions) -> Result<MergeOutcome, TranslateError> {
    let key = options.collection_key.as_str();
    let root = source.as_object().ok_or(TranslateError::SourceNotObject)?;
    let items = root
        .get(key)
        .ok_or_else(|| TranslateError::MissingCollection { key: key.to_string() })?
        .as_array()
        .ok_or_else(|| TranslateError::CollectionNotArray { key: key.to_string() })?;

    let mut report = MergeReport {
        source_entries: items.len(),
        dictionary_entries: index.entry_count(),
        diagnostics: index.diagnostics().to_vec(),
        ..MergeReport::default()
    };
    tracing::info!("源条目 {} 个，字典条目 {} 个", report.source_entries, report.dictionary_entries);

    // 源条目查找表：同键先到者生效
    let mut lookup: HashMap<EntryKey, usize> = HashMap::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let Some(entry) = item.as_object() else {
            report.diagnostics.push(Diagnostic::SkippedSourceEntry { position, reason: SkipReason::NotAnObject });
            continue;
        };
        let Some(entry_key) = EntryKey::of_entry(entry) else {
            report.diagnostics.push(Diagnostic::SkippedSourceEntry { position, reason: SkipReason::MissingIdentity });
            continue;
        };
        if lookup.contains_key(&entry_key) {
            if options.reject_duplicates {
                return Err(TranslateError::DuplicateKey { origin: KeyOrigin::Source, key: entry_key });
            }
            tracing::warn!("源条目重复，保留第一个: {}", entry_key);
            report.diagnostics.push(Diagnostic::DuplicateSource { key: entry_key, position });
            continue;
        }
        tracing::trace!("源条目: {}", entry_key);
        lookup.insert(entry_key, position);
    }

    // 源位置 -> 合并结果，按字典顺序
    let mut merged: Vec<(usize, Map<String, Value>)> = Vec::with_capacity(index.len());
    for over in index.overrides() {
        match lookup.get(&over.key) {
            Some(&position) => {
                tracing::debug!("命中: {}", over.key);
                // lookup 中的位置都指向对象条目
                if let Some(entry) = items[position].as_object() {
                    merged.push((position, overlay_entry(entry, over, &options.override_fields)));
                    report.translated.push(over.key.clone());
                }
            }
            None => {
                tracing::debug!("未命中: {}", over.key);
                report.diagnostics.push(Diagnostic::NoMatch { key: over.key.clone() });
            }
        }
    }
    tracing::info!("生成翻译条目 {} 个", merged.len());

    let collection: Vec<Value> = if options.keep_untranslated {
        let mut by_position: HashMap<usize, Map<String, Value>> = merged.into_iter().collect();
        items
            .iter()
            .enumerate()
            .map(|(i, item)| by_position.remove(&i).map(Value::Object).unwrap_or_else(|| item.clone()))
            .collect()
    } else {
        merged.into_iter().map(|(_, entry)| Value::Object(entry)).collect()
    };

    let mut document = root.clone();
    document.insert(key.to_string(), Value::Array(collection));

    Ok(MergeOutcome {
        document: Value::Object(document),
        report,
    })
}
