// Turns the summarizer's bulleted text into title/body fragments.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Summary, SummaryMeta, SummaryPoint};

const BULLET: char = '•';

// `**Title**: body`, title matched lazily so a bold word in the body stays in the body
static TITLED_POINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*:(.*)").unwrap());

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    Item { title: String, body: String },
    Paragraph(String),
}

impl Fragment {
    pub fn to_html(&self) -> String {
        match self {
            Fragment::Item { title, body } => format!(
                "<div class=\"summary-item\"><strong>{}</strong><p>{}</p></div>",
                escape_html(title),
                escape_html(body)
            ),
            Fragment::Paragraph(text) => format!("<p>{}</p>", escape_html(text)),
        }
    }

    pub fn into_point(self) -> SummaryPoint {
        match self {
            Fragment::Item { title, body } => SummaryPoint { title, summary: body },
            Fragment::Paragraph(text) => SummaryPoint { title: String::new(), summary: text },
        }
    }
}

/// Keeps only bullet lines. Lines that don't follow the `**Title**: body`
/// shape come back as paragraphs so format drift upstream still shows text.
pub fn parse_summary_text(text: &str) -> Vec<Fragment> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| line.starts_with(BULLET))
        .map(|line| {
            let cleaned = line.replacen(BULLET, "", 1).trim().to_string();
            match TITLED_POINT.captures(&cleaned) {
                Some(caps) => Fragment::Item {
                    title: caps[1].trim().to_string(),
                    body: caps[2].trim().to_string(),
                },
                None => Fragment::Paragraph(cleaned),
            }
        })
        .collect()
}

/// Adapts a plain-text summary into the structured shape.
pub fn summary_from_text(text: &str, sources: usize) -> Summary {
    Summary {
        meta: SummaryMeta { sources },
        points: parse_summary_text(text).into_iter().map(Fragment::into_point).collect(),
    }
}

pub fn fragments_of(summary: &Summary) -> Vec<Fragment> {
    summary
        .points
        .iter()
        .map(|p| {
            if p.title.is_empty() {
                Fragment::Paragraph(p.summary.clone())
            } else {
                Fragment::Item { title: p.title.clone(), body: p.summary.clone() }
            }
        })
        .collect()
}

pub fn render_html(fragments: &[Fragment]) -> String {
    fragments.iter().map(Fragment::to_html).collect()
}

pub(crate) fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titled_bullet_and_fallback_paragraph() {
        let frags = parse_summary_text("• **A**: B\n• C");
        assert_eq!(
            frags,
            vec![
                Fragment::Item { title: "A".into(), body: "B".into() },
                Fragment::Paragraph("C".into()),
            ]
        );
    }

    #[test]
    fn non_bullet_lines_are_dropped() {
        let text = "Here is your summary:\n\n  • **Economy**: Growth slows.  \nThanks!";
        let frags = parse_summary_text(text);
        assert_eq!(frags, vec![Fragment::Item { title: "Economy".into(), body: "Growth slows.".into() }]);
        assert!(parse_summary_text("No headlines found.").is_empty());
    }

    #[test]
    fn only_first_bold_span_is_the_title() {
        let frags = parse_summary_text("• **Tech**: chips from **TSMC**: up");
        assert_eq!(
            frags,
            vec![Fragment::Item { title: "Tech".into(), body: "chips from **TSMC**: up".into() }]
        );
    }

    #[test]
    fn bold_without_colon_falls_back() {
        let frags = parse_summary_text("• **Tech** news today");
        assert_eq!(frags, vec![Fragment::Paragraph("**Tech** news today".into())]);
    }

    #[test]
    fn html_is_escaped() {
        let html = render_html(&[
            Fragment::Item { title: "R&D".into(), body: "<b>up</b>".into() },
            Fragment::Paragraph("\"quoted\"".into()),
        ]);
        assert_eq!(
            html,
            "<div class=\"summary-item\"><strong>R&amp;D</strong><p>&lt;b&gt;up&lt;/b&gt;</p></div><p>&quot;quoted&quot;</p>"
        );
    }

    #[test]
    fn text_summary_converts_to_points_and_back() {
        let summary = summary_from_text("• **A**: B\n• C", 7);
        assert_eq!(summary.meta.sources, 7);
        assert_eq!(summary.points[0], SummaryPoint { title: "A".into(), summary: "B".into() });
        assert_eq!(summary.points[1], SummaryPoint { title: String::new(), summary: "C".into() });
        assert_eq!(fragments_of(&summary), parse_summary_text("• **A**: B\n• C"));
    }
}
