use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::hebrew;
use crate::segment::{ContentPassage, SummaryEntry};

/// Which heuristic produced (part of) a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    OpeningExact,
    OpeningContains,
    OpeningContained,
    OpeningFuzzy,
    OpeningPrefix,
    PageNear,
    Keywords,
}

/// Pairing of one summary to at most one passage. `passage_idx` indexes the
/// passage list handed to [`match_all`]; `None` means no candidate reached
/// the threshold, which is a reportable outcome, not an error.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub summary_seq: usize,
    pub passage_idx: Option<usize>,
    pub score: f64,
    pub signals: Vec<Signal>,
}

const OPENING_WEIGHT: f64 = 0.45;
const PAGE_WEIGHT: f64 = 0.25;
const KEYWORD_WEIGHT: f64 = 0.30;

/// Greedily pair every summary with its best unused same-sefer passage.
///
/// This is the canonical algorithm consolidating the score ladders that were
/// tried per-run before: a weighted sum in [0,1] of opening-phrase agreement,
/// Hebrew-numeral page proximity and keyword overlap. Summaries are visited
/// in seq order; passages are scanned in document order and only a strictly
/// better score displaces the running best, so ties resolve to the lowest
/// passage index and the whole pass is deterministic. A consumed passage is
/// never offered again.
pub fn match_all(
    summaries: &[SummaryEntry],
    passages: &[ContentPassage],
    settings: &Settings,
) -> Vec<MatchResult> {
    let mut used = vec![false; passages.len()];
    let mut results = Vec::with_capacity(summaries.len());

    for summary in summaries {
        let mut best: Option<(usize, f64, Vec<Signal>)> = None;
        for (idx, passage) in passages.iter().enumerate() {
            if used[idx] || !same_sefer(&summary.sefer, &passage.sefer) {
                continue;
            }
            let (score, signals) = score_pair(summary, passage, settings);
            if score > best.as_ref().map_or(0.0, |(_, s, _)| *s) {
                best = Some((idx, score, signals));
            }
        }

        match best {
            Some((idx, score, signals)) if score >= settings.match_threshold => {
                used[idx] = true;
                results.push(MatchResult {
                    summary_seq: summary.seq,
                    passage_idx: Some(idx),
                    score,
                    signals,
                });
            }
            _ => results.push(MatchResult {
                summary_seq: summary.seq,
                passage_idx: None,
                score: 0.0,
                signals: Vec::new(),
            }),
        }
    }
    results
}

fn same_sefer(a: &str, b: &str) -> bool {
    let a = hebrew::normalize_sefer(a);
    let b = hebrew::normalize_sefer(b);
    a == b || hebrew::similarity(&a, &b) > 0.8
}

/// Score one candidate pairing and the signals that fired.
pub fn score_pair(
    summary: &SummaryEntry,
    passage: &ContentPassage,
    settings: &Settings,
) -> (f64, Vec<Signal>) {
    let mut score = 0.0;
    let mut signals = Vec::new();

    let (opening, signal) = opening_score(&summary.opening, &passage.heading);
    if let Some(sig) = signal {
        score += opening * OPENING_WEIGHT;
        signals.push(sig);
    }

    let page = page_score(&summary.page_ref, passage.page.as_deref(), settings);
    if page > 0.0 {
        score += page * PAGE_WEIGHT;
        signals.push(Signal::PageNear);
    }

    let kw = keyword_score(summary, passage, settings);
    if kw > 0.0 {
        score += kw * KEYWORD_WEIGHT;
        signals.push(Signal::Keywords);
    }

    (score, signals)
}

/// Opening-phrase agreement ladder: exact > containment > fuzzy > shared
/// prefix. Comparison ignores spaces and dashes so line-wrap artifacts in
/// the OCR do not break exact matches.
fn opening_score(summary_opening: &str, passage_heading: &str) -> (f64, Option<Signal>) {
    let s = squash(summary_opening);
    let p = squash(passage_heading);
    if s.is_empty() || p.is_empty() {
        return (0.0, None);
    }
    if s == p {
        return (1.0, Some(Signal::OpeningExact));
    }
    if p.contains(&s) {
        return (0.9, Some(Signal::OpeningContains));
    }
    if s.contains(&p) {
        return (0.8, Some(Signal::OpeningContained));
    }
    let sim = hebrew::similarity(summary_opening, passage_heading);
    if sim > 0.7 {
        return (sim, Some(Signal::OpeningFuzzy));
    }
    let s_chars: Vec<char> = s.chars().collect();
    let p_chars: Vec<char> = p.chars().collect();
    if s_chars.len() >= 4 && p_chars.len() >= 4 && s_chars[..4] == p_chars[..4] {
        return (0.5, Some(Signal::OpeningPrefix));
    }
    if s_chars.len() >= 3 && p_chars.len() >= 3 && s_chars[..3] == p_chars[..3] {
        return (0.3, Some(Signal::OpeningPrefix));
    }
    (0.0, None)
}

fn squash(text: &str) -> String {
    hebrew::normalize(text).replace(' ', "")
}

fn page_score(page_ref: &str, passage_page: Option<&str>, settings: &Settings) -> f64 {
    let Some(passage_page) = passage_page else {
        return 0.0;
    };
    if page_ref.is_empty() || passage_page.is_empty() {
        return 0.0;
    }
    let a = hebrew::numeral_value(page_ref);
    let b = hebrew::numeral_value(passage_page);
    if a == 0 || b == 0 {
        return 0.0;
    }
    let diff = a.abs_diff(b);
    if diff == 0 {
        1.0
    } else if diff <= 1 {
        0.66
    } else if diff <= settings.page_window {
        0.33
    } else {
        0.0
    }
}

/// Fraction of the summary's keywords that appear in the opening window of
/// the passage body.
fn keyword_score(summary: &SummaryEntry, passage: &ContentPassage, settings: &Settings) -> f64 {
    if summary.keywords.is_empty() {
        return 0.0;
    }
    let window: String = passage.body.chars().take(settings.keyword_window).collect();
    let hits = summary
        .keywords
        .iter()
        .filter(|k| window.contains(k.as_str()))
        .count();
    hits as f64 / summary.keywords.len() as f64
}
