pub mod index;
pub mod lines;
pub mod passages;

pub use index::{SummaryEntry, TocAuthor};
pub use passages::ContentPassage;

use crate::config::Settings;

/// Everything segmentation recovers from one raw dump.
#[derive(Debug)]
pub struct Document {
    pub summaries: Vec<SummaryEntry>,
    pub passages: Vec<ContentPassage>,
    pub toc_authors: Vec<TocAuthor>,
}

/// Two-pass pipeline: raw text → classified lines → summary entries +
/// content passages. Lines matching no pattern are skipped, never an error.
pub fn segment_document(raw: &str, settings: &Settings) -> Document {
    let lines = lines::classify_lines(raw);
    let (summaries, toc_authors) = index::extract_summaries(&lines, settings);
    let passages = passages::extract_passages(&lines, settings);
    Document {
        summaries,
        passages,
        toc_authors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_segments_three_and_three() {
        let raw = std::fs::read_to_string("tests/fixtures/anthology_sample.txt").unwrap();
        let doc = segment_document(&raw, &Settings::default());
        let kedushas: Vec<_> = doc
            .summaries
            .iter()
            .filter(|s| s.sefer == "קדושת לוי")
            .collect();
        let passages: Vec<_> = doc
            .passages
            .iter()
            .filter(|p| p.sefer == "קדושת לוי")
            .collect();
        assert_eq!(kedushas.len(), 3);
        assert_eq!(passages.len(), 3);
        assert!(kedushas.iter().all(|s| !s.page_ref.is_empty()));
        assert!(kedushas.iter().all(|s| !s.keywords.is_empty()));
    }

    #[test]
    fn segmentation_is_idempotent() {
        let raw = std::fs::read_to_string("tests/fixtures/anthology_sample.txt").unwrap();
        let settings = Settings::default();
        let a = segment_document(&raw, &settings);
        let b = segment_document(&raw, &settings);
        let openings = |d: &Document| {
            d.summaries
                .iter()
                .map(|s| (s.seq, s.opening.clone(), s.page_ref.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(openings(&a), openings(&b));
        assert_eq!(a.passages.len(), b.passages.len());
    }
}
