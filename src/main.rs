//! 程序入口：初始化日志、解析命令行，执行翻译合并或标签引用审计

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::fmt::SubscriberBuilder;

use bg_fanyi::utils::fs::{list_json_files, read_json_file};
use bg_fanyi::{audit_document, TagOccurrence, Translator, TranslatorConfig};

#[derive(Parser, Debug)]
#[command(name = "bg_fanyi")]
#[command(about = "按 (name, source) 将字典翻译合并到背景数据中")]
struct Cli {
    /// 详细输出（-v 调试，-vv 跟踪）
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// 只输出警告与错误
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 合并字典目录中的翻译，写出到导出目录
    Translate(TranslateArgs),
    /// 列出 JSON 文件中的标签引用
    Audit(AuditArgs),
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// 源数据目录
    #[arg(long = "data", value_name = "DIR")]
    data: Option<PathBuf>,

    /// 字典目录
    #[arg(long = "dictionary", value_name = "DIR")]
    dictionary: Option<PathBuf>,

    /// 导出目录
    #[arg(long = "export", value_name = "DIR")]
    export: Option<PathBuf>,

    /// JSON 配置文件，命令行参数优先
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// 保留未翻译的源条目
    #[arg(long = "keep-untranslated")]
    keep_untranslated: bool,

    /// 遇到重复键时报错
    #[arg(long = "reject-duplicates")]
    reject_duplicates: bool,
}

#[derive(Args, Debug)]
struct AuditArgs {
    /// JSON 文件或目录
    #[arg(value_name = "PATH", required = true)]
    paths: Vec<PathBuf>,

    /// 只输出指定标签
    #[arg(long = "tag")]
    tag: Option<String>,
}

#[derive(Serialize)]
struct AuditRow<'a> {
    file: String,
    #[serde(flatten)]
    occurrence: &'a TagOccurrence,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::WARN,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };
    let _ = SubscriberBuilder::default()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_config(args: &TranslateArgs) -> Result<TranslatorConfig> {
    let mut config = match &args.config {
        Some(p) => TranslatorConfig::from_file(p).with_context(|| format!("读取配置失败: {}", p.display()))?,
        None => TranslatorConfig::default(),
    };
    if let Some(dir) = &args.data {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &args.dictionary {
        config.dictionary_dir = dir.clone();
    }
    if let Some(dir) = &args.export {
        config.export_dir = dir.clone();
    }
    config.keep_untranslated |= args.keep_untranslated;
    config.reject_duplicates |= args.reject_duplicates;

    let cwd = std::env::current_dir().context("无法获取当前目录")?;
    Ok(config.resolve_relative_to(&cwd))
}

fn run_translate(args: &TranslateArgs) -> Result<()> {
    let config = build_config(args)?;
    if !config.data_dir.is_dir() {
        bail!("数据目录不存在: {}", config.data_dir.display());
    }
    if !config.dictionary_dir.is_dir() {
        bail!("字典目录不存在: {}", config.dictionary_dir.display());
    }

    let translator = Translator::new(config);
    let config = translator.config();
    tracing::info!("开始翻译");
    tracing::info!("数据目录: {}", config.data_dir.display());
    tracing::info!("字典目录: {}", config.dictionary_dir.display());
    tracing::info!("导出目录: {}", config.export_dir.display());

    let summary = translator.translate().context("翻译失败")?;
    for diagnostic in &summary.report.diagnostics {
        tracing::debug!("{}", diagnostic);
    }
    tracing::info!(
        "翻译完成: {}/{} 个条目，{} 个字典条目未匹配，结果写入 {}",
        summary.report.translated.len(),
        summary.report.source_entries,
        summary.report.unmatched().count(),
        summary.output_path.display()
    );
    Ok(())
}

fn audit_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for p in paths {
        if p.is_dir() {
            files.extend(list_json_files(p).with_context(|| format!("读取目录失败: {}", p.display()))?);
        } else {
            files.push(p.clone());
        }
    }
    Ok(files)
}

fn audit_file(file: &Path, tag: Option<&str>) -> Result<Vec<TagOccurrence>> {
    let doc = read_json_file(file).with_context(|| format!("审计失败: {}", file.display()))?;
    let mut found = audit_document(&doc);
    if let Some(tag) = tag {
        found.retain(|o| o.reference.tag == tag);
    }
    tracing::info!("{}: {} 个标签引用", file.display(), found.len());
    Ok(found)
}

fn run_audit(args: &AuditArgs) -> Result<()> {
    let mut results = Vec::new();
    for file in audit_inputs(&args.paths)? {
        let found = audit_file(&file, args.tag.as_deref())?;
        results.push((file, found));
    }

    let rows: Vec<AuditRow> = results
        .iter()
        .flat_map(|(file, found)| {
            found.iter().map(move |occurrence| AuditRow {
                file: file.display().to_string(),
                occurrence,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Command::Translate(args) => run_translate(args),
        Command::Audit(args) => run_audit(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from(["bg_fanyi", "translate", "--data", "/d", "--keep-untranslated"]);
        let Command::Translate(args) = cli.command else {
            panic!("应该解析为 translate 子命令");
        };
        let config = build_config(&args).expect("构建配置失败");

        assert_eq!(config.data_dir, PathBuf::from("/d"));
        assert!(config.keep_untranslated);
        assert!(config.dictionary_dir.is_absolute(), "相对路径应该被解析为绝对路径");
    }

    #[test]
    fn test_audit_filters_by_tag() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bg.json");
        std::fs::write(&file, r#"{"entries": ["{@feat Alert|XPHB} {@spell Light}", "Acolyte|XPHB"]}"#).unwrap();

        let all = audit_file(&file, None).unwrap();
        assert_eq!(all.len(), 3);

        let feats = audit_file(&file, Some("feat")).unwrap();
        assert_eq!(feats.len(), 1);
        assert_eq!(feats[0].reference.item_name, "Alert");

        let inputs = audit_inputs(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(inputs, vec![file]);
    }
}
