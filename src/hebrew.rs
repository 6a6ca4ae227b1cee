use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

static NIKUD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\u{0591}-\u{05C7}]").unwrap());
static PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.,;:!?\-\u{2013}\u{2014}]").unwrap());
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static HONORIFIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"הק'|הקדוש|ז"ל|זי"ע|זצ"ל|⚜"#).unwrap());
static HEB_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[א-ת]+").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Remove vowel points and cantillation marks (U+0591..U+05C7).
pub fn strip_nikud(text: &str) -> String {
    NIKUD_RE.replace_all(text, "").into_owned()
}

/// Normalize Hebrew text for comparison: no nikud, punctuation and dashes
/// become spaces, whitespace collapsed.
pub fn normalize(text: &str) -> String {
    let text = strip_nikud(text);
    let text = PUNCT_RE.replace_all(&text, " ");
    SPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Normalize a sefer name: drop honorific suffixes and ornaments before the
/// usual normalization, so של"ה הקדוש and של"ה compare equal.
pub fn normalize_sefer(name: &str) -> String {
    let cleaned = HONORIFIC_RE.replace_all(name, "");
    SPACE_RE.replace_all(cleaned.trim(), " ").to_string()
}

/// Strip residual markup tags from OCR'd text.
pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Value of a Hebrew numeral page reference such as כ"א or ט'. Gershayim and
/// quote marks are ignored; characters outside the letter table contribute
/// nothing, so garbled refs degrade to 0 instead of failing.
pub fn numeral_value(page: &str) -> u32 {
    page.chars().map(letter_value).sum()
}

fn letter_value(c: char) -> u32 {
    match c {
        'א' => 1,
        'ב' => 2,
        'ג' => 3,
        'ד' => 4,
        'ה' => 5,
        'ו' => 6,
        'ז' => 7,
        'ח' => 8,
        'ט' => 9,
        'י' => 10,
        'כ' | 'ך' => 20,
        'ל' => 30,
        'מ' | 'ם' => 40,
        'נ' | 'ן' => 50,
        'ס' => 60,
        'ע' => 70,
        'פ' | 'ף' => 80,
        'צ' | 'ץ' => 90,
        'ק' => 100,
        'ר' => 200,
        'ש' => 300,
        'ת' => 400,
        _ => 0,
    }
}

/// Significant Hebrew words of `text`, in first-occurrence order with
/// duplicates removed. Order matters downstream: candidate scoring must be
/// reproducible run to run.
pub fn keywords(text: &str, min_len: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut words = Vec::new();
    for m in HEB_WORD_RE.find_iter(text) {
        let w = m.as_str();
        if w.chars().count() >= min_len && seen.insert(w) {
            words.push(w.to_string());
        }
    }
    words
}

/// Similarity ratio in [0,1] between two strings after normalization:
/// character-bigram Dice coefficient, a SequenceMatcher-like measure that
/// tolerates OCR noise and word-order jitter.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    if a == b {
        return if a.is_empty() { 0.0 } else { 1.0 };
    }
    let ba = bigram_counts(&a);
    let bb = bigram_counts(&b);
    let total: usize = ba.values().sum::<usize>() + bb.values().sum::<usize>();
    if total == 0 {
        return 0.0;
    }
    let overlap: usize = ba
        .iter()
        .map(|(bg, &n)| n.min(bb.get(bg).copied().unwrap_or(0)))
        .sum();
    (2.0 * overlap as f64) / total as f64
}

fn bigram_counts(s: &str) -> HashMap<(char, char), usize> {
    let chars: Vec<char> = s.chars().collect();
    let mut counts = HashMap::new();
    for w in chars.windows(2) {
        *counts.entry((w[0], w[1])).or_insert(0) += 1;
    }
    counts
}
