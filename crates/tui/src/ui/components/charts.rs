use engine::Money;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::Theme;

/// Returns a string like `████████░░░░░░░░░░░░` representing the ratio.
#[must_use]
pub fn ascii_bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return "░".repeat(width);
    }

    let ratio = (value as f64 / max as f64).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64) as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// One row per category: name, bar scaled to the largest total, amount.
pub fn render_category_bars(
    frame: &mut Frame<'_>,
    area: Rect,
    totals: &[(String, Money)],
    theme: &Theme,
) {
    if totals.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled("No spending yet", Style::default().fg(theme.dim))),
            area,
        );
        return;
    }

    let max = totals
        .iter()
        .map(|(_, total)| total.cents().unsigned_abs())
        .max()
        .unwrap_or(0);
    let label_width = totals
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    let bar_width = (area.width as usize).saturating_sub(label_width + 20).clamp(4, 30);

    let lines: Vec<Line<'static>> = totals
        .iter()
        .map(|(name, total)| {
            Line::from(vec![
                Span::styled(
                    format!("{name:<label_width$}  "),
                    Style::default().fg(theme.text_muted),
                ),
                Span::styled(
                    ascii_bar(total.cents().unsigned_abs(), max, bar_width),
                    Style::default().fg(theme.accent),
                ),
                Span::styled(format!("  {total}"), Style::default().fg(theme.text)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_is_scaled_to_max() {
        assert_eq!(ascii_bar(5, 10, 4), "██░░");
        assert_eq!(ascii_bar(10, 10, 3), "███");
        assert_eq!(ascii_bar(1, 0, 2), "░░");
    }
}
