//! 檔名正規化模組
//!
//! 將西里爾字母轉寫為拉丁字母，並把主檔名中非 `[A-Za-z0-9_]` 的字元替換為 `_`。
//! 副檔名（包含 `.tar.gz` 這類複合後綴）保持原樣。只計算新檔名，不動檔案系統。

use crate::config::ARCHIVE_SUFFIXES;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

const CYRILLIC: &str = "абвгдеёжзийклмнопрстуфхцчшщъыьэюяєіїґ";

const LATIN: [&str; 37] = [
    "a", "b", "v", "g", "d", "e", "e", "j", "z", "i", "j", "k", "l", "m", "n", "o", "p", "r", "s",
    "t", "u", "f", "h", "ts", "ch", "sh", "sch", "", "y", "", "e", "yu", "ya", "je", "i", "ji", "g",
];

static TRANSLITERATION: LazyLock<HashMap<char, &'static str>> =
    LazyLock::new(|| CYRILLIC.chars().zip(LATIN).collect());

static REGEX_UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("Invalid regex"));

/// 計算路徑最後一段的正規化檔名
#[must_use]
pub fn normalize_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    // 隱藏檔保留前導點
    let (prefix, rest) = match file_name.strip_prefix('.') {
        Some(rest) => (".", rest),
        None => ("", file_name.as_str()),
    };

    let (stem, suffix) = split_suffix(rest);
    let transliterated = transliterate(stem);
    let stem = REGEX_UNSAFE_CHARS.replace_all(&transliterated, "_");

    format!("{prefix}{stem}{suffix}")
}

fn split_suffix(name: &str) -> (&str, &str) {
    let lower = name.to_ascii_lowercase();
    for suffix in ARCHIVE_SUFFIXES {
        if lower.ends_with(suffix) && lower.len() > suffix.len() {
            return name.split_at(name.len() - suffix.len());
        }
    }

    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

fn transliterate(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        let lower = ch.to_lowercase().next().unwrap_or(ch);
        match TRANSLITERATION.get(&lower) {
            Some(latin) if ch != lower => {
                let mut chars = latin.chars();
                if let Some(first) = chars.next() {
                    result.extend(first.to_uppercase());
                    result.push_str(chars.as_str());
                }
            }
            Some(latin) => result.push_str(latin),
            None => result.push(ch),
        }
    }
    result
}
