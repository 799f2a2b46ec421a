//! 标签引用提取
//!
//! 两种语法，互不排斥，对同一字符串都会执行：
//! - 标签形式 `{@tag item|source|fluff}`，可出现多次
//! - 简单形式 `item|source`，必须匹配整个字符串

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::model::tree_walk::{walk_strings, walk_strings_with_path};

static TAGGED_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{@(\w+) ([^|{}]+)(?:\|([^|{}]*))?(?:\|([^{}]*))?\}").unwrap()
});

static SIMPLE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^|{}]+)\|([^|{}]+)$").unwrap());

/// 书目引用标签，不携带可翻译条目
const BOOK_TAGS: [&str; 2] = ["b", "book"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagReference {
    /// 简单形式提取时为空
    pub tag: String,
    pub item_name: String,
    pub source_book: String,
    pub fluff_text: String,
}

/// 从单个字符串提取所有引用：先标签形式（按出现顺序），后简单形式
pub fn extract_tag_references(text: &str) -> Vec<TagReference> {
    let mut out = Vec::new();

    for caps in TAGGED_REGEX.captures_iter(text) {
        let tag = &caps[1];
        if BOOK_TAGS.contains(&tag) {
            continue;
        }
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str()).to_string();
        out.push(TagReference {
            tag: tag.to_string(),
            item_name: group(2),
            source_book: group(3),
            fluff_text: group(4),
        });
    }

    if let Some(caps) = SIMPLE_REGEX.captures(text) {
        out.push(TagReference {
            tag: String::new(),
            item_name: caps[1].to_string(),
            source_book: caps[2].to_string(),
            fluff_text: String::new(),
        });
    }

    out
}

/// 收集整棵树中的引用
pub fn collect_tag_references(root: &Value) -> Vec<TagReference> {
    let mut out = Vec::new();
    walk_strings(root, &mut |s| out.extend(extract_tag_references(s)));
    out
}

/// 带位置的引用，用于审计报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagOccurrence {
    pub path: String,
    #[serde(flatten)]
    pub reference: TagReference,
}

pub fn audit_document(root: &Value) -> Vec<TagOccurrence> {
    let mut out = Vec::new();
    walk_strings_with_path(root, &mut |path, s| {
        out.extend(extract_tag_references(s).into_iter().map(|reference| TagOccurrence {
            path: path.to_string(),
            reference,
        }));
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reference(tag: &str, item: &str, source: &str, fluff: &str) -> TagReference {
        TagReference {
            tag: tag.into(),
            item_name: item.into(),
            source_book: source.into(),
            fluff_text: fluff.into(),
        }
    }

    #[test]
    fn test_tagged_form_with_source() {
        let refs = extract_tag_references("{@feat Magic Initiate|XPHB}");
        assert_eq!(refs, vec![reference("feat", "Magic Initiate", "XPHB", "")]);
    }

    #[test]
    fn test_tagged_form_without_source() {
        let refs = extract_tag_references("Gain {@skill Insight} proficiency");
        assert_eq!(refs, vec![reference("skill", "Insight", "", "")]);
    }

    #[test]
    fn test_tagged_form_with_fluff() {
        let refs = extract_tag_references("{@item Holy Symbol|XPHB|символ віри}");
        assert_eq!(refs, vec![reference("item", "Holy Symbol", "XPHB", "символ віри")]);
    }

    #[test]
    fn test_simple_form() {
        let refs = extract_tag_references("Acolyte|XPHB");
        assert_eq!(refs, vec![reference("", "Acolyte", "XPHB", "")]);
    }

    #[test]
    fn test_book_tags_are_discarded() {
        assert!(extract_tag_references("{@book Player's Handbook|XPHB}").is_empty());
        assert!(extract_tag_references("{@b bold text}").is_empty());
    }

    #[test]
    fn test_multiple_tagged_in_order() {
        let refs = extract_tag_references(
            "{@feat Magic Initiate|XPHB} (Клірик), {@book PHB|XPHB}, {@spell Light}",
        );
        assert_eq!(
            refs,
            vec![
                reference("feat", "Magic Initiate", "XPHB", ""),
                reference("spell", "Light", "", ""),
            ]
        );
    }

    #[test]
    fn test_simple_form_needs_whole_string() {
        assert!(extract_tag_references("Acolyte|XPHB|extra").is_empty());
        assert!(extract_tag_references("no pipes here").is_empty());
        assert!(extract_tag_references("").is_empty());
    }

    #[test]
    fn test_braces_block_simple_form() {
        let refs = extract_tag_references("{@feat Alert|XPHB}");
        assert_eq!(refs, vec![reference("feat", "Alert", "XPHB", "")], "含花括号的字符串不会触发简单形式");
    }

    #[test]
    fn test_both_forms_tagged_first() {
        let doc = json!(["{@feat Alert|XPHB}", "Acolyte|XPHB"]);
        let refs = collect_tag_references(&doc);
        assert_eq!(
            refs,
            vec![
                reference("feat", "Alert", "XPHB", ""),
                reference("", "Acolyte", "XPHB", ""),
            ]
        );
    }

    #[test]
    fn test_collect_from_tree() {
        let doc = json!({
            "background": [{
                "name": "Acolyte",
                "source": "XPHB",
                "page": 178,
                "entries": [{
                    "items": [
                        {"name": "Риси:", "entry": "{@feat Magic Initiate|XPHB} (Клірик)"},
                        {"name": "Спорядження:", "entry": "{@item Holy Symbol|XPHB|символ}"}
                    ]
                }]
            }]
        });

        let refs = collect_tag_references(&doc);
        let items: Vec<&str> = refs.iter().map(|r| r.item_name.as_str()).collect();
        assert!(items.contains(&"Magic Initiate"));
        assert!(items.contains(&"Holy Symbol"));
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn test_audit_records_paths() {
        let doc = json!({"background": [{"entries": ["{@spell Light}"]}]});
        let found = audit_document(&doc);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, "$.background[0].entries[0]");
        assert_eq!(found[0].reference, reference("spell", "Light", "", ""));

        let serialized = serde_json::to_value(&found[0]).unwrap();
        assert_eq!(serialized["item_name"], "Light", "reference 字段应该被展平");
    }
}
