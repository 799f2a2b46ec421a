//! 翻译流程配置：可从 JSON 文件读取，再由命令行覆盖

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::error::TranslateError;
use crate::utils::fs::read_json_file;

// === 默认值（消除魔法值） ===
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DICTIONARY_DIR: &str = "dictionary";
pub const DEFAULT_EXPORT_DIR: &str = "export";
pub const DEFAULT_SOURCE_FILE: &str = "backgrounds.json";
pub const DEFAULT_COLLECTION_KEY: &str = "background";
pub const DEFAULT_OVERRIDE_FIELDS: [&str; 2] = ["name", "entries"];
pub const DEFAULT_INDENT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslatorConfig {
    pub data_dir: PathBuf,
    pub dictionary_dir: PathBuf,
    pub export_dir: PathBuf,
    /// 源文件名，输出沿用同名
    pub source_file: String,
    /// 源文件与字典中存放条目的字段
    pub collection_key: String,
    /// 命中时从字典覆盖到源条目的字段
    pub override_fields: Vec<String>,
    /// 保留未翻译的源条目（按源顺序，命中者原位替换）
    pub keep_untranslated: bool,
    /// 重复键直接报错，而不是按先到/后到规则取舍
    pub reject_duplicates: bool,
    /// 无法读取的字典文件记为诊断后跳过
    pub skip_unreadable_dictionaries: bool,
    pub indent: usize,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            dictionary_dir: PathBuf::from(DEFAULT_DICTIONARY_DIR),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            source_file: DEFAULT_SOURCE_FILE.to_string(),
            collection_key: DEFAULT_COLLECTION_KEY.to_string(),
            override_fields: DEFAULT_OVERRIDE_FIELDS.iter().map(|s| s.to_string()).collect(),
            keep_untranslated: false,
            reject_duplicates: false,
            skip_unreadable_dictionaries: false,
            indent: DEFAULT_INDENT,
        }
    }
}

impl TranslatorConfig {
    /// 从 JSON 配置文件读取，缺省字段取默认值
    pub fn from_file(p: &Path) -> Result<Self, TranslateError> {
        let value = read_json_file(p)?;
        let config: Self = serde_json::from_value(value).map_err(|e| TranslateError::parse(p, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TranslateError> {
        if self.collection_key.is_empty() {
            return Err(TranslateError::Config("collection_key 不能为空".into()));
        }
        if self.source_file.is_empty() {
            return Err(TranslateError::Config("source_file 不能为空".into()));
        }
        if let Some(bad) = self
            .override_fields
            .iter()
            .find(|f| f.as_str() == "origin_name" || f.as_str() == "origin_source")
        {
            return Err(TranslateError::Config(format!("override_fields 不能包含 {}", bad)));
        }
        Ok(())
    }

    pub fn source_path(&self) -> PathBuf {
        self.data_dir.join(&self.source_file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.export_dir.join(&self.source_file)
    }

    /// 相对路径按 base 解析
    pub fn resolve_relative_to(mut self, base: &Path) -> Self {
        for dir in [&mut self.data_dir, &mut self.dictionary_dir, &mut self.export_dir] {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        self
    }
}
