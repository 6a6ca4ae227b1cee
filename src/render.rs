use itertools::Itertools;

use crate::config::Settings;
use crate::matcher::MatchResult;
use crate::segment::Document;

const NO_MATCH_PLACEHOLDER: &str = "[לא נמצא טקסט מתאים]";
const TRUNCATION_MARKER: &str = "[...]";

/// Render the matched document as a standalone RTL HTML page: the summary
/// index (מפתח ענינים) followed by the matched source passages (מקור השפע),
/// grouped by sefer. Unmatched entries get an explicit placeholder.
pub fn render_html(
    doc: &Document,
    results: &[MatchResult],
    settings: &Settings,
    title: &str,
) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"he\" dir=\"rtl\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", title));
    html.push_str(
        "<style>\n\
         body { font-family: 'Frank Ruehl', 'David', serif; direction: rtl; \
         text-align: justify; max-width: 900px; margin: 0 auto; }\n\
         .sefer-header { text-align: center; font-weight: bold; }\n\
         .source-header { text-align: center; font-weight: bold; }\n\
         .divider { border-top: 2px solid #000; }\n\
         .no-match { color: #999; font-style: italic; }\n\
         </style>\n</head>\n<body>\n",
    );
    html.push_str(&format!("<h1>{}</h1>\n", title));
    html.push_str("<div class=\"divider\"></div>\n");

    // Index section
    html.push_str("<section>\n<div class=\"source-header\">מפתח ענינים</div>\n");
    for (sefer, group) in &doc
        .summaries
        .iter()
        .zip(results)
        .group_by(|(s, _)| s.sefer.clone())
    {
        html.push_str(&format!("<div class=\"sefer-header\">{}</div>\n", sefer));
        for (s, _) in group {
            html.push_str(&format!(
                "<div class=\"summary-entry\">\
                 <span class=\"entry-id\">[{}]</span> \
                 <span class=\"entry-verse\">{}</span> \
                 <span class=\"entry-summary\">{}</span> \
                 <span class=\"entry-page\">{}</span></div>\n",
                s.seq, s.opening, s.body, s.page_ref
            ));
        }
    }
    html.push_str("</section>\n<div class=\"divider\"></div>\n");

    // Source passages section
    html.push_str("<section>\n<div class=\"source-header\">מקור השפע</div>\n");
    for (sefer, group) in &doc
        .summaries
        .iter()
        .zip(results)
        .group_by(|(s, _)| s.sefer.clone())
    {
        html.push_str(&format!("<div class=\"sefer-header\">{}</div>\n", sefer));
        for (s, r) in group {
            let text = match r.passage_idx {
                Some(idx) => truncate(&doc.passages[idx].body, settings.truncate_chars),
                None => format!("<span class=\"no-match\">{}</span>", NO_MATCH_PLACEHOLDER),
            };
            html.push_str(&format!(
                "<div class=\"quote-entry\">\
                 <div class=\"quote-header\"><span>[{}]</span> <span>{}</span> \
                 <span>עמ' {}</span></div>\n\
                 <div class=\"quote-text\">{}</div></div>\n",
                s.seq, s.opening, s.page_ref, text
            ));
        }
    }
    html.push_str("</section>\n</body>\n</html>\n");
    html
}

/// Cut at a char boundary and append the explicit ellipsis marker.
fn truncate(body: &str, max_chars: usize) -> String {
    if body.chars().count() <= max_chars {
        return body.to_string();
    }
    let cut: String = body.chars().take(max_chars).collect();
    format!("{}\n\n{}", cut, TRUNCATION_MARKER)
}
