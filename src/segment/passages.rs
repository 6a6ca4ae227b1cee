use super::lines::{is_generic_heading, Line};
use crate::config::Settings;
use crate::hebrew;

/// One full-text passage from the מקור השפע body: everything between a bold
/// opening phrase and the next heading or bold opening.
#[derive(Debug, Clone)]
pub struct ContentPassage {
    pub sefer: String,
    pub heading: String,
    /// Body text with residual markup stripped.
    pub body: String,
    /// Page number from the nearest footer tag inside the passage.
    pub page: Option<String>,
    pub start_line: usize,
    pub end_line: usize,
}

struct Pending {
    sefer: String,
    heading: String,
    parts: Vec<String>,
    page: Option<String>,
    start_line: usize,
    end_line: usize,
}

/// Walk classified lines and collect content passages in document order.
pub fn extract_passages(lines: &[Line], settings: &Settings) -> Vec<ContentPassage> {
    let mut passages = Vec::new();
    let mut current_sefer: Option<String> = None;
    let mut pending: Option<Pending> = None;

    for (i, line) in lines.iter().enumerate() {
        match line {
            Line::Heading(name) => {
                close(&mut pending, &mut passages);
                if !is_generic_heading(name) {
                    current_sefer = Some(hebrew::normalize_sefer(name));
                }
            }
            Line::BoldOpening { opening, rest } => {
                let starts_passage = current_sefer.is_some()
                    && opening.chars().count() <= settings.max_opening_len;
                if starts_passage {
                    close(&mut pending, &mut passages);
                    let first = if rest.is_empty() {
                        opening.clone()
                    } else {
                        format!("{} {}", opening, rest)
                    };
                    pending = Some(Pending {
                        sefer: current_sefer.clone().unwrap_or_default(),
                        heading: opening.clone(),
                        parts: vec![first],
                        page: None,
                        start_line: i + 1,
                        end_line: i + 1,
                    });
                } else if let Some(p) = pending.as_mut() {
                    // Overlong bold span inside a passage is emphasis, not a
                    // new opening.
                    p.parts.push(format!("{} {}", opening, rest));
                    p.end_line = i + 1;
                }
            }
            Line::Text(t) => {
                if let Some(p) = pending.as_mut() {
                    p.parts.push(t.clone());
                    p.end_line = i + 1;
                }
            }
            Line::PageFooter(page) => {
                if let Some(p) = pending.as_mut() {
                    p.page = Some(page.clone());
                }
            }
            // Index entries, page markers and filler never feed a passage.
            Line::SummaryStart { .. }
            | Line::TocEntry { .. }
            | Line::PageMarker(_)
            | Line::DotFiller
            | Line::Empty => {}
        }
    }
    close(&mut pending, &mut passages);
    passages
}

fn close(pending: &mut Option<Pending>, out: &mut Vec<ContentPassage>) {
    let Some(p) = pending.take() else {
        return;
    };
    let body = hebrew::strip_tags(&p.parts.join("\n")).trim().to_string();
    // Bodies this short are stray bold fragments, not quotable passages.
    if body.chars().count() <= 50 {
        return;
    }
    out.push(ContentPassage {
        sefer: p.sefer,
        heading: p.heading,
        body,
        page: p.page,
        start_line: p.start_line,
        end_line: p.end_line,
    });
}
