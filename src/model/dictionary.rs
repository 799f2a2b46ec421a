//! 字典索引：从多个字典文档收集覆盖条目，按 (origin_name, origin_source) 建立不可变索引

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::model::entry::EntryKey;
use crate::model::error::{KeyOrigin, TranslateError};
use crate::model::report::{Diagnostic, SkipReason};

/// 单个字典覆盖条目
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryOverride {
    pub key: EntryKey,
    pub fields: Map<String, Value>,
    /// 最后生效条目所在的文件
    pub file: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct DictionaryIndex {
    overrides: Vec<DictionaryOverride>,
    positions: HashMap<EntryKey, usize>,
    entry_count: usize,
    diagnostics: Vec<Diagnostic>,
}

/// 取出文档中 collection_key 下的条目：对象视为单条，数组取其中的对象元素
///
/// 数组中非对象元素以 `Err(position)` 返回，便于调用方记录诊断。
pub fn collect_entries<'a>(doc: &'a Value, collection_key: &str) -> Vec<Result<&'a Map<String, Value>, usize>> {
    match doc.get(collection_key) {
        Some(Value::Object(entry)) => vec![Ok(entry)],
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| item.as_object().ok_or(i))
            .collect(),
        _ => Vec::new(),
    }
}

impl DictionaryIndex {
    /// 按给定顺序索引字典文档；同键后到者覆盖先到者，但保留先到者的位置
    pub fn build<'a, I>(documents: I, collection_key: &str, reject_duplicates: bool) -> Result<Self, TranslateError>
    where
        I: IntoIterator<Item = (&'a Path, &'a Value)>,
    {
        let mut index = Self::default();

        for (file, doc) in documents {
            let found = collect_entries(doc, collection_key);
            tracing::debug!("字典文件 {}: {} 个条目", file.display(), found.len());

            for (position, item) in found.into_iter().enumerate() {
                let entry = match item {
                    Ok(entry) => entry,
                    Err(_) => {
                        index.skip(file, position, SkipReason::NotAnObject);
                        continue;
                    }
                };
                index.entry_count += 1;

                let Some(key) = EntryKey::of_override(entry) else {
                    index.skip(file, position, SkipReason::MissingIdentity);
                    continue;
                };

                let over = DictionaryOverride {
                    key: key.clone(),
                    fields: entry.clone(),
                    file: file.to_path_buf(),
                };
                match index.positions.get(&key) {
                    Some(&slot) => {
                        if reject_duplicates {
                            return Err(TranslateError::DuplicateKey { origin: KeyOrigin::Dictionary, key });
                        }
                        tracing::warn!("字典条目重复，后者生效: {} ({})", key, file.display());
                        index.diagnostics.push(Diagnostic::DuplicateOverride { key, file: file.to_path_buf() });
                        index.overrides[slot] = over;
                    }
                    None => {
                        index.positions.insert(key, index.overrides.len());
                        index.overrides.push(over);
                    }
                }
            }
        }

        Ok(index)
    }

    fn skip(&mut self, file: &Path, position: usize, reason: SkipReason) {
        tracing::warn!("跳过字典条目 {}#{}: {}", file.display(), position, reason);
        self.diagnostics.push(Diagnostic::SkippedOverride {
            file: file.to_path_buf(),
            position,
            reason,
        });
    }

    /// 按首次出现顺序
    pub fn overrides(&self) -> &[DictionaryOverride] {
        &self.overrides
    }

    pub fn get(&self, key: &EntryKey) -> Option<&DictionaryOverride> {
        self.positions.get(key).map(|&i| &self.overrides[i])
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// 发现的对象条目总数（含被跳过、被覆盖的）
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(docs: &[(&str, Value)]) -> DictionaryIndex {
        let pairs: Vec<(&Path, &Value)> = docs.iter().map(|(p, v)| (Path::new(*p), v)).collect();
        DictionaryIndex::build(pairs, "background", false).expect("构建索引失败")
    }

    #[test]
    fn test_single_object_collection() {
        let doc = json!({
            "background": {
                "origin_name": "Acolyte",
                "origin_source": "XPHB",
                "name": "Аколіт [Acolyte]"
            }
        });
        let index = build(&[("backgrounds.json", doc)]);

        assert_eq!(index.len(), 1);
        let over = index.get(&EntryKey::new("Acolyte", "XPHB")).expect("应该找到条目");
        assert_eq!(over.fields["name"], "Аколіт [Acolyte]");
        assert_eq!(over.file, PathBuf::from("backgrounds.json"));
    }

    #[test]
    fn test_array_collection_keeps_order() {
        let a = json!({"background": [
            {"origin_name": "Sage", "origin_source": "XPHB"},
            {"origin_name": "Acolyte", "origin_source": "XPHB"}
        ]});
        let b = json!({"background": {"origin_name": "Soldier", "origin_source": "XPHB"}});
        let index = build(&[("a.json", a), ("b.json", b)]);

        let names: Vec<&str> = index.overrides().iter().map(|o| o.key.name.as_str()).collect();
        assert_eq!(names, vec!["Sage", "Acolyte", "Soldier"]);
        assert_eq!(index.entry_count(), 3);
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let doc = json!({"background": [
            "不是对象",
            {"origin_name": "Acolyte"},
            {"origin_name": "Sage", "origin_source": 3},
            {"origin_name": "Soldier", "origin_source": "XPHB"}
        ]});
        let index = build(&[("d.json", doc)]);

        assert_eq!(index.len(), 1, "只有完整的条目会被索引");
        assert_eq!(index.diagnostics().len(), 3);
        assert!(matches!(
            index.diagnostics()[0],
            Diagnostic::SkippedOverride { position: 0, reason: SkipReason::NotAnObject, .. }
        ));
        assert!(matches!(
            index.diagnostics()[1],
            Diagnostic::SkippedOverride { position: 1, reason: SkipReason::MissingIdentity, .. }
        ));
    }

    #[test]
    fn test_documents_without_collection() {
        let index = build(&[
            ("feats.json", json!({"feat": []})),
            ("scalar.json", json!({"background": "文本"})),
            ("root_array.json", json!([1, 2])),
        ]);
        assert!(index.is_empty());
        assert!(index.diagnostics().is_empty(), "缺失字段不产生诊断");
    }

    #[test]
    fn test_duplicate_last_wins() {
        let a = json!({"background": [
            {"origin_name": "Acolyte", "origin_source": "XPHB", "name": "旧译名"},
            {"origin_name": "Sage", "origin_source": "XPHB"}
        ]});
        let b = json!({"background": {"origin_name": "Acolyte", "origin_source": "XPHB", "name": "新译名"}});
        let index = build(&[("a.json", a), ("b.json", b)]);

        assert_eq!(index.len(), 2);
        assert_eq!(index.overrides()[0].fields["name"], "新译名", "后加载者生效且保留原位置");
        assert_eq!(index.overrides()[0].file, PathBuf::from("b.json"));
        assert!(matches!(index.diagnostics()[0], Diagnostic::DuplicateOverride { .. }));
    }

    #[test]
    fn test_duplicate_rejected() {
        let doc = json!({"background": [
            {"origin_name": "Acolyte", "origin_source": "XPHB"},
            {"origin_name": "Acolyte", "origin_source": "XPHB"}
        ]});
        let result = DictionaryIndex::build([(Path::new("d.json"), &doc)], "background", true);
        assert!(matches!(
            result,
            Err(TranslateError::DuplicateKey { origin: KeyOrigin::Dictionary, .. })
        ));
    }
}
