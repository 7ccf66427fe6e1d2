//! Light markup in advisor replies: `**bold**` and line breaks.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

pub fn to_lines(text: &str, base: Style) -> Vec<Line<'static>> {
    text.lines().map(|line| to_line(line, base)).collect()
}

fn to_line(line: &str, base: Style) -> Line<'static> {
    let bold = base.add_modifier(Modifier::BOLD);
    let mut spans = Vec::new();
    let mut rest = line;
    let mut in_bold = false;

    while let Some(pos) = rest.find("**") {
        if pos > 0 {
            let style = if in_bold { bold } else { base };
            spans.push(Span::styled(rest[..pos].to_string(), style));
        }
        in_bold = !in_bold;
        rest = &rest[pos + 2..];
    }
    if !rest.is_empty() {
        // An unclosed `**` is shown as plain text.
        let text = if in_bold {
            format!("**{rest}")
        } else {
            rest.to_string()
        };
        spans.push(Span::styled(text, base));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(line: &Line<'_>) -> Vec<(String, bool)> {
        line.spans
            .iter()
            .map(|s| {
                (
                    s.content.to_string(),
                    s.style.add_modifier.contains(Modifier::BOLD),
                )
            })
            .collect()
    }

    #[test]
    fn bold_segments_and_line_breaks() {
        let lines = to_lines("You spent **$15,950.20** on travel.\nAnything else?", Style::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(
            spans(&lines[0]),
            vec![
                ("You spent ".to_string(), false),
                ("$15,950.20".to_string(), true),
                (" on travel.".to_string(), false),
            ]
        );
        assert_eq!(spans(&lines[1]), vec![("Anything else?".to_string(), false)]);
    }

    #[test]
    fn unclosed_marker_stays_visible() {
        let lines = to_lines("a **b", Style::default());
        assert_eq!(
            spans(&lines[0]),
            vec![("a ".to_string(), false), ("**b".to_string(), false)]
        );
    }
}
