use std::sync::LazyLock;

use regex::Regex;

static H1_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<center>\s*<h1>\s*(?:<b>)?([^<]+?)(?:</b>)?\s*</h1>\s*(?:</center>)?$").unwrap()
});
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^<header>([^<]+)</header>$").unwrap());
static CENTER_BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<center><b>([^<]+)</b></center>$").unwrap());
static FOOTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<footer>(?:<center>)?([א-ת"'׳״]+)(?:</center>)?</footer>"#).unwrap()
});
static TOC_ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<b>([^<]+)</b>\s*\.{3,}\s*([א-ת"'׳״]{1,5})\s*$"#).unwrap()
});
static SUMMARY_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<b>([^<]+)</b>\s*[-\u{2013}\u{2014}]\s*(.*)$").unwrap());
static BOLD_OPENING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<b>([^<]+)</b>\s*(.*)$").unwrap());
static DOT_FILLER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\.{5,}").unwrap());
static PAGE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[א-ת]['"׳״]?$"#).unwrap());

/// Structural kind of one source line. The source is an OCR dump with
/// residual markup; anything unrecognized stays `Text` and is never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// Sefer or section heading (h1, header tag, or centered bold name).
    Heading(String),
    /// Table-of-contents entry: bold name, dot leader, Hebrew page.
    TocEntry { name: String, page: String },
    /// Start of a summary-index entry: bold opening phrase then a dash.
    SummaryStart { opening: String, rest: String },
    /// Bold opening without a dash: start of a full-text passage.
    BoldOpening { opening: String, rest: String },
    /// Page number from a footer tag.
    PageFooter(String),
    /// A lone Hebrew letter used as a page marker; dropped downstream.
    PageMarker(String),
    /// Long dot run, table-of-contents filler.
    DotFiller,
    Text(String),
    Empty,
}

/// Classify every line of the raw dump, one `Line` per source line so
/// downstream records can carry line-number provenance.
pub fn classify_lines(raw: &str) -> Vec<Line> {
    raw.lines().map(|l| classify(l.trim())).collect()
}

fn classify(line: &str) -> Line {
    if line.is_empty() {
        return Line::Empty;
    }
    if let Some(caps) = H1_HEADING_RE
        .captures(line)
        .or_else(|| HEADER_RE.captures(line))
        .or_else(|| CENTER_BOLD_RE.captures(line))
    {
        return Line::Heading(caps[1].trim().to_string());
    }
    if let Some(caps) = FOOTER_RE.captures(line) {
        return Line::PageFooter(caps[1].trim().to_string());
    }
    if line.starts_with("<b>") && !line.contains("<center>") {
        if let Some(caps) = TOC_ENTRY_RE.captures(line) {
            return Line::TocEntry {
                name: caps[1].trim().to_string(),
                page: caps[2].trim().to_string(),
            };
        }
        if let Some(caps) = SUMMARY_START_RE.captures(line) {
            return Line::SummaryStart {
                opening: caps[1].trim().to_string(),
                rest: caps[2].trim().to_string(),
            };
        }
        if let Some(caps) = BOLD_OPENING_RE.captures(line) {
            return Line::BoldOpening {
                opening: caps[1].trim().to_string(),
                rest: caps[2].trim().to_string(),
            };
        }
    }
    if DOT_FILLER_RE.is_match(line) {
        return Line::DotFiller;
    }
    if PAGE_MARKER_RE.is_match(line) {
        return Line::PageMarker(line.to_string());
    }
    Line::Text(line.to_string())
}

/// Headings that name document sections rather than seforim.
pub fn is_generic_heading(name: &str) -> bool {
    name.contains("מפתח")
        || name.contains("ליקוטי")
        || name.contains("פרשת")
        || name.contains("בס\"ד")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn h1_heading() {
        let lines = classify_lines("<center><h1>קדושת לוי</h1></center>");
        assert_eq!(lines[0], Line::Heading("קדושת לוי".into()));
    }

    #[test]
    fn h1_heading_with_bold() {
        let lines = classify_lines("<center><h1><b>נועם אלימלך</b></h1></center>");
        assert_eq!(lines[0], Line::Heading("נועם אלימלך".into()));
    }

    #[test]
    fn header_tag_heading() {
        let lines = classify_lines("<header>רבינו בחיי</header>");
        assert_eq!(lines[0], Line::Heading("רבינו בחיי".into()));
    }

    #[test]
    fn centered_bold_heading() {
        let lines = classify_lines("<center><b>שפת אמת</b></center>");
        assert_eq!(lines[0], Line::Heading("שפת אמת".into()));
    }

    #[test]
    fn toc_entry() {
        let lines = classify_lines("<b>קדושת לוי</b>............ כ\"ה");
        assert_eq!(
            lines[0],
            Line::TocEntry {
                name: "קדושת לוי".into(),
                page: "כ\"ה".into()
            }
        );
    }

    #[test]
    fn summary_start() {
        let lines = classify_lines("<b>ויהי בשלח</b>- ביאור על יציאת מצרים");
        assert_eq!(
            lines[0],
            Line::SummaryStart {
                opening: "ויהי בשלח".into(),
                rest: "ביאור על יציאת מצרים".into()
            }
        );
    }

    #[test]
    fn bold_opening_without_dash() {
        let lines = classify_lines("<b>ויהי בשלח</b> הנה ידוע מה שכתב");
        assert_eq!(
            lines[0],
            Line::BoldOpening {
                opening: "ויהי בשלח".into(),
                rest: "הנה ידוע מה שכתב".into()
            }
        );
    }

    #[test]
    fn page_footer_variants() {
        assert_eq!(
            classify_lines("<footer><center>י\"ב</center></footer>")[0],
            Line::PageFooter("י\"ב".into())
        );
        assert_eq!(
            classify_lines("<footer>י\"ג</footer>")[0],
            Line::PageFooter("י\"ג".into())
        );
    }

    #[test]
    fn page_marker_single_letter() {
        assert_eq!(classify_lines("ב")[0], Line::PageMarker("ב".into()));
        assert_eq!(classify_lines("ט'")[0], Line::PageMarker("ט'".into()));
    }

    #[test]
    fn dot_filler() {
        assert_eq!(classify_lines("..............")[0], Line::DotFiller);
    }

    #[test]
    fn plain_text_and_empty() {
        let lines = classify_lines("המשך דברי הקדושה\n\nעוד שורה");
        assert_eq!(lines[0], Line::Text("המשך דברי הקדושה".into()));
        assert_eq!(lines[1], Line::Empty);
        assert_eq!(lines[2], Line::Text("עוד שורה".into()));
    }

    #[test]
    fn generic_headings_flagged() {
        assert!(is_generic_heading("מפתח ענינים"));
        assert!(is_generic_heading("פרשת בשלח"));
        assert!(!is_generic_heading("קדושת לוי"));
    }
}
