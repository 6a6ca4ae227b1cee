use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::matcher::{MatchResult, Signal};
use crate::segment::Document;

/// JSON mapping report, the one persistent artifact besides the HTML.
#[derive(Debug, Serialize, Deserialize)]
pub struct MappingReport {
    pub generated_at: DateTime<Utc>,
    pub authors: Vec<AuthorReport>,
    pub statistics: Statistics,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthorReport {
    pub name: String,
    /// Start page from the main TOC, empty when the TOC did not list it.
    pub page_start: String,
    pub summaries: Vec<SummaryReport>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryReport {
    pub opening_words: String,
    pub summary_text: String,
    pub page_ref: String,
    pub line_number: usize,
    pub matched: bool,
    pub confidence: f64,
    pub signals: Vec<Signal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentRef>,
}

/// Provenance of the matched passage inside the source dump.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContentRef {
    pub page_number: Option<String>,
    pub start_line: usize,
    pub end_line: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Statistics {
    pub total_summaries: usize,
    pub matched: usize,
    pub high_confidence: usize,
    pub match_rate: f64,
}

/// Assemble the report from segmentation output and match results, grouped
/// by sefer in document order. `results` must be aligned with
/// `doc.summaries` (as produced by [`crate::matcher::match_all`]).
pub fn build_report(doc: &Document, results: &[MatchResult]) -> MappingReport {
    let grouped = doc
        .summaries
        .iter()
        .zip(results)
        .group_by(|(s, _)| s.sefer.clone());
    let authors = grouped
        .into_iter()
        .map(|(sefer, group)| {
            let summaries = group
                .map(|(s, r)| {
                    let content = r.passage_idx.map(|idx| {
                        let p = &doc.passages[idx];
                        ContentRef {
                            page_number: p.page.clone(),
                            start_line: p.start_line,
                            end_line: p.end_line,
                        }
                    });
                    SummaryReport {
                        opening_words: s.opening.clone(),
                        summary_text: s.body.clone(),
                        page_ref: s.page_ref.clone(),
                        line_number: s.line_number,
                        matched: content.is_some(),
                        confidence: r.score,
                        signals: r.signals.clone(),
                        content,
                    }
                })
                .collect();
            let page_start = doc
                .toc_authors
                .iter()
                .find(|a| a.name == sefer)
                .map(|a| a.page_start.clone())
                .unwrap_or_default();
            AuthorReport {
                name: sefer,
                page_start,
                summaries,
            }
        })
        .collect();

    let statistics = statistics(results);
    MappingReport {
        generated_at: Utc::now(),
        authors,
        statistics,
    }
}

fn statistics(results: &[MatchResult]) -> Statistics {
    let total = results.len();
    let matched = results.iter().filter(|r| r.passage_idx.is_some()).count();
    let high_confidence = results.iter().filter(|r| r.score > 0.7).count();
    let match_rate = if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    };
    Statistics {
        total_summaries: total,
        matched,
        high_confidence,
        match_rate,
    }
}

/// Console summary for the `stats` subcommand.
pub fn print_statistics(report: &MappingReport) {
    let s = &report.statistics;
    println!("Authors:         {}", report.authors.len());
    println!("Summaries:       {}", s.total_summaries);
    println!(
        "Matched:         {} ({:.1}%)",
        s.matched,
        s.match_rate * 100.0
    );
    println!("High confidence: {}", s.high_confidence);
    println!("Unmatched:       {}", s.total_summaries - s.matched);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::matcher::match_all;
    use crate::segment::segment_document;

    fn report_from_fixture() -> MappingReport {
        let raw = std::fs::read_to_string("tests/fixtures/anthology_sample.txt").unwrap();
        let settings = Settings::default();
        let doc = segment_document(&raw, &settings);
        let results = match_all(&doc.summaries, &doc.passages, &settings);
        build_report(&doc, &results)
    }

    #[test]
    fn grouped_by_sefer_with_toc_pages() {
        let report = report_from_fixture();
        let kedushas = report
            .authors
            .iter()
            .find(|a| a.name == "קדושת לוי")
            .expect("sefer group present");
        assert_eq!(kedushas.summaries.len(), 3);
        assert_eq!(kedushas.page_start, "כ\"א");
    }

    #[test]
    fn statistics_consistent() {
        let report = report_from_fixture();
        let s = &report.statistics;
        let listed: usize = report.authors.iter().map(|a| a.summaries.len()).sum();
        assert_eq!(s.total_summaries, listed);
        assert!(s.matched <= s.total_summaries);
        assert!(s.high_confidence <= s.matched);
    }

    #[test]
    fn unmatched_entries_have_no_content() {
        let report = report_from_fixture();
        for a in &report.authors {
            for s in &a.summaries {
                assert_eq!(s.matched, s.content.is_some());
                if !s.matched {
                    assert_eq!(s.confidence, 0.0);
                }
            }
        }
    }

    #[test]
    fn serializes_with_schema_fields() {
        let report = report_from_fixture();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("authors").is_some());
        assert!(json.get("statistics").is_some());
        let first = &json["authors"][0]["summaries"][0];
        for key in ["opening_words", "summary_text", "page_ref", "line_number", "matched", "confidence"] {
            assert!(first.get(key).is_some(), "missing {key}");
        }
    }
}
