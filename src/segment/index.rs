use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::lines::{is_generic_heading, Line};
use crate::config::Settings;
use crate::hebrew;

static PAGE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\.{2,}\s*([א-ת"'׳״]+)\s*$"#).unwrap());
static PAGE_ALT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s([א-ת]['"׳״]?[א-ת]?)$"#).unwrap());
static DOT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}").unwrap());

/// One entry of the מפתח ענינים index: a short summary of a passage, tagged
/// with its sefer, opening phrase and Hebrew page reference.
#[derive(Debug, Clone)]
pub struct SummaryEntry {
    /// 1-based id in parse order; stable across runs.
    pub seq: usize,
    pub sefer: String,
    pub opening: String,
    pub body: String,
    pub page_ref: String,
    pub line_number: usize,
    pub keywords: Vec<String>,
}

/// Sefer named in the main table of contents, with its start page.
#[derive(Debug, Clone)]
pub struct TocAuthor {
    pub name: String,
    pub page_start: String,
}

struct Pending {
    opening: String,
    line_number: usize,
    parts: Vec<String>,
}

/// Walk classified lines and collect summary entries plus TOC authors.
/// A summary opens at a bold-dash line and accumulates text until its
/// trailing dot-leader page reference; lines that fit no pattern are skipped.
pub fn extract_summaries(
    lines: &[Line],
    settings: &Settings,
) -> (Vec<SummaryEntry>, Vec<TocAuthor>) {
    let mut summaries: Vec<SummaryEntry> = Vec::new();
    let mut authors: Vec<TocAuthor> = Vec::new();
    let mut seen_authors: HashSet<String> = HashSet::new();
    let mut current_sefer: Option<String> = None;
    let mut pending: Option<Pending> = None;

    for (i, line) in lines.iter().enumerate() {
        match line {
            Line::Heading(name) => {
                flush(&mut pending, &current_sefer, &mut summaries, settings);
                if !is_generic_heading(name) {
                    current_sefer = Some(hebrew::normalize_sefer(name));
                }
            }
            Line::TocEntry { name, page } => {
                let key = hebrew::normalize_sefer(name);
                if seen_authors.insert(key.clone()) {
                    authors.push(TocAuthor {
                        name: key,
                        page_start: page.clone(),
                    });
                }
            }
            Line::SummaryStart { opening, rest } => {
                flush(&mut pending, &current_sefer, &mut summaries, settings);
                let mut parts = Vec::new();
                if !rest.is_empty() {
                    parts.push(rest.clone());
                }
                pending = Some(Pending {
                    opening: opening.clone(),
                    line_number: i + 1,
                    parts,
                });
            }
            Line::Text(t) => {
                if let Some(p) = pending.as_mut() {
                    p.parts.push(t.clone());
                }
            }
            // A bold opening without a dash means the content section has
            // started; whatever summary is pending is complete.
            Line::BoldOpening { .. } => {
                flush(&mut pending, &current_sefer, &mut summaries, settings);
            }
            Line::PageFooter(_) | Line::PageMarker(_) | Line::DotFiller | Line::Empty => {}
        }
    }
    flush(&mut pending, &current_sefer, &mut summaries, settings);

    for (idx, s) in summaries.iter_mut().enumerate() {
        s.seq = idx + 1;
    }
    (summaries, authors)
}

fn flush(
    pending: &mut Option<Pending>,
    current_sefer: &Option<String>,
    out: &mut Vec<SummaryEntry>,
    settings: &Settings,
) {
    let Some(p) = pending.take() else {
        return;
    };
    let Some(sefer) = current_sefer else {
        return;
    };
    let full = hebrew::strip_tags(&p.parts.join(" "));
    let (body, page_ref) = split_page_ref(&full);
    let body = DOT_RUN_RE.replace_all(&body, "").trim().to_string();
    // Very short remnants are dot-leader noise, not summaries.
    if body.chars().count() <= 10 {
        return;
    }
    let keywords = hebrew::keywords(&body, settings.keyword_min_len);
    out.push(SummaryEntry {
        seq: 0,
        sefer: sefer.clone(),
        opening: p.opening,
        body,
        page_ref,
        line_number: p.line_number,
        keywords,
    });
}

fn split_page_ref(full: &str) -> (String, String) {
    if let Some(m) = PAGE_END_RE.captures(full) {
        let page = m[1].trim().to_string();
        let body = full[..m.get(0).unwrap().start()].trim().to_string();
        return (body, page);
    }
    if let Some(m) = PAGE_ALT_RE.captures(full) {
        let page = m[1].trim().to_string();
        let body = full[..m.get(0).unwrap().start()].trim().to_string();
        return (body, page);
    }
    (full.trim().to_string(), String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::lines::classify_lines;

    fn extract(raw: &str) -> Vec<SummaryEntry> {
        let lines = classify_lines(raw);
        extract_summaries(&lines, &Settings::default()).0
    }

    #[test]
    fn single_line_summary() {
        let entries = extract(
            "<center><b>קדושת לוי</b></center>\n\
             <b>ויהי בשלח</b>- ביאור ענין יציאת מצרים וקריעת הים ......... כ\"א",
        );
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.seq, 1);
        assert_eq!(e.sefer, "קדושת לוי");
        assert_eq!(e.opening, "ויהי בשלח");
        assert_eq!(e.body, "ביאור ענין יציאת מצרים וקריעת הים");
        assert_eq!(e.page_ref, "כ\"א");
        assert_eq!(e.line_number, 2);
    }

    #[test]
    fn multi_line_summary_accumulates() {
        let entries = extract(
            "<center><b>קדושת לוי</b></center>\n\
             <b>וירא ישראל</b>- תחילת הביאור על האמונה\n\
             והמשכו בענין השירה ........ כ\"ב",
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].body,
            "תחילת הביאור על האמונה והמשכו בענין השירה"
        );
        assert_eq!(entries[0].page_ref, "כ\"ב");
    }

    #[test]
    fn no_sefer_no_entry() {
        let entries = extract("<b>ויהי בשלח</b>- ביאור ארוך על יציאת מצרים ...... י\"א");
        assert!(entries.is_empty());
    }

    #[test]
    fn short_noise_dropped() {
        let entries = extract(
            "<center><b>קדושת לוי</b></center>\n<b>אז ישיר</b>- קצר ...... ט'",
        );
        assert!(entries.is_empty());
    }

    #[test]
    fn toc_authors_collected_once() {
        let lines = classify_lines(
            "<b>קדושת לוי</b>...... כ\"ה\n\
             <b>נועם אלימלך</b>...... ל\"ב\n\
             <b>קדושת לוי</b>...... כ\"ה",
        );
        let (_, authors) = extract_summaries(&lines, &Settings::default());
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].name, "קדושת לוי");
        assert_eq!(authors[0].page_start, "כ\"ה");
    }

    #[test]
    fn generic_heading_not_a_sefer() {
        let entries = extract(
            "<center><h1>מפתח ענינים</h1></center>\n\
             <b>ויהי בשלח</b>- ביאור ארוך מאד על יציאת מצרים ...... י\"א",
        );
        assert!(entries.is_empty());
    }

    #[test]
    fn seq_assigned_in_parse_order() {
        let entries = extract(
            "<center><b>קדושת לוי</b></center>\n\
             <b>ויהי בשלח</b>- ביאור ראשון בענין הגאולה ...... י\"א\n\
             <b>וירא ישראל</b>- ביאור שני בענין האמונה ...... י\"ב",
        );
        let seqs: Vec<usize> = entries.iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![1, 2]);
    }
}
