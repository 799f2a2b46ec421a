//! IO helper: safe file read/write for JSON

use std::{fs::File, io::BufReader, path::{Path, PathBuf}};

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};

use crate::model::error::TranslateError;

/// 从文件读取JSON数据
pub fn read_json_file(p: &Path) -> Result<Value, TranslateError> {
    let f = File::open(p).map_err(|e| TranslateError::io(p, e))?;
    let rdr = BufReader::new(f);
    serde_json::from_reader(rdr).map_err(|e| TranslateError::parse(p, e))
}

/// 列出目录下所有 `.json` 文件，按文件名排序
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>, TranslateError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| TranslateError::io(dir, e))? {
        let path = entry.map_err(|e| TranslateError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// 按指定缩进格式化，末尾带换行
pub fn to_pretty_bytes(value: &Value, indent: usize) -> Result<Vec<u8>, TranslateError> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// 将JSON数据保存到文件（格式化输出）
///
/// 先在内存中完成序列化，再创建目录并写入，失败时不会留下半截文件。
pub fn write_json_file(p: &Path, value: &Value, indent: usize) -> Result<(), TranslateError> {
    let bytes = to_pretty_bytes(value, indent)?;
    if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| TranslateError::io(parent, e))?;
    }
    std::fs::write(p, bytes).map_err(|e| TranslateError::io(p, e))
}
