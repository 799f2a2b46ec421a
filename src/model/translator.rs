//! Translator：加载字典与源文件、合并、写出，整个流程同步执行

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::model::config::TranslatorConfig;
use crate::model::dictionary::DictionaryIndex;
use crate::model::error::TranslateError;
use crate::model::merge::{merge_document, MergeOptions, MergeOutcome};
use crate::model::report::{Diagnostic, MergeReport};
use crate::utils::fs::{list_json_files, read_json_file, write_json_file};

#[derive(Debug, Clone, Default)]
pub struct Translator {
    config: TranslatorConfig,
}

/// 成功运行的结果
#[derive(Debug)]
pub struct TranslateSummary {
    pub output_path: PathBuf,
    pub report: MergeReport,
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// 完整流程：任何致命错误都不会写出文件
    pub fn translate(&self) -> Result<TranslateSummary, TranslateError> {
        self.config.validate()?;

        let (dictionaries, mut load_diagnostics) = self.load_dictionary_documents()?;
        let index = DictionaryIndex::build(
            dictionaries.iter().map(|(p, v)| (p.as_path(), v)),
            &self.config.collection_key,
            self.config.reject_duplicates,
        )?;

        let source_path = self.config.source_path();
        let source = read_json_file(&source_path)?;
        tracing::info!("源文件已加载: {}", source_path.display());

        let MergeOutcome { document, mut report } = merge_document(&source, &index, &MergeOptions::from(&self.config))?;
        load_diagnostics.append(&mut report.diagnostics);
        report.diagnostics = load_diagnostics;

        let output_path = self.config.output_path();
        write_json_file(&output_path, &document, self.config.indent)?;
        tracing::info!("翻译结果已写入: {}", output_path.display());

        Ok(TranslateSummary { output_path, report })
    }

    /// 按文件名顺序读取字典目录下的所有 JSON 文档
    pub fn load_dictionary_documents(&self) -> Result<(Vec<(PathBuf, Value)>, Vec<Diagnostic>), TranslateError> {
        let dir = &self.config.dictionary_dir;
        let files = list_json_files(dir)?;
        tracing::info!("字典目录 {} 中找到 {} 个文件", dir.display(), files.len());

        let mut documents = Vec::with_capacity(files.len());
        let mut diagnostics = Vec::new();
        for file in files {
            match read_json_file(&file) {
                Ok(doc) => documents.push((file, doc)),
                Err(e) if self.config.skip_unreadable_dictionaries => {
                    tracing::warn!("跳过字典文件 {}: {}", file.display(), e);
                    diagnostics.push(Diagnostic::UnreadableDictionary { file, reason: e.to_string() });
                }
                Err(e) => return Err(e),
            }
        }
        Ok((documents, diagnostics))
    }
}

/// 便捷入口：以默认配置翻译三个目录
pub fn translate_dirs(data_dir: &Path, dictionary_dir: &Path, export_dir: &Path) -> Result<TranslateSummary, TranslateError> {
    let config = TranslatorConfig {
        data_dir: data_dir.to_path_buf(),
        dictionary_dir: dictionary_dir.to_path_buf(),
        export_dir: export_dir.to_path_buf(),
        ..TranslatorConfig::default()
    };
    Translator::new(config).translate()
}
