//! Panel 1, Settings: ticker text box, lookback and top-N sliders.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::app::{AppState, Panel, SettingsField, DAYS_MAX, DAYS_MIN, TOP_MAX, TOP_MIN};
use crate::theme;

const SLIDER_WIDTH: usize = 16;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let s = &app.settings;
    let focused = app.active_panel == Panel::Settings;
    let marker = |field: SettingsField| {
        if focused && s.field == field {
            Span::styled("> ", theme::accent_bold())
        } else {
            Span::raw("  ")
        }
    };

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        marker(SettingsField::Tickers),
        Span::styled("Tickers", theme::accent_bold()),
        Span::styled(
            if s.editing { "  (editing)" } else { "  [Enter] edit" },
            theme::muted(),
        ),
    ]));
    let text_style = if s.editing {
        theme::accent()
    } else {
        theme::secondary()
    };
    let mut text = s.ticker_text.clone();
    if s.editing {
        text.push('_');
    }
    lines.push(Line::from(Span::styled(format!("  {text}"), text_style)));
    lines.push(Line::from(Span::styled(
        format!("  {} parsed", s.tickers().len()),
        theme::muted(),
    )));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        marker(SettingsField::Days),
        Span::styled("Lookback days ", theme::accent_bold()),
        Span::styled(s.lookback_days.to_string(), theme::warning()),
    ]));
    lines.push(slider_line(
        f64::from(s.lookback_days - DAYS_MIN) / f64::from(DAYS_MAX - DAYS_MIN),
        DAYS_MIN,
        DAYS_MAX,
    ));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        marker(SettingsField::Top),
        Span::styled("Top performers ", theme::accent_bold()),
        Span::styled(s.top_n.to_string(), theme::warning()),
    ]));
    lines.push(slider_line(
        (s.top_n - TOP_MIN) as f64 / (TOP_MAX - TOP_MIN) as f64,
        TOP_MIN as u32,
        TOP_MAX as u32,
    ));
    lines.push(Line::from(""));

    let refresh_style = if app.loading {
        theme::muted()
    } else {
        theme::positive()
    };
    lines.push(Line::from(Span::styled(
        if app.loading {
            "  Refreshing..."
        } else {
            "  [r] Refresh data"
        },
        refresh_style,
    )));
    lines.push(Line::from(Span::styled("  [n] Notify top movers", theme::muted())));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

/// `  7 [=====-----------] 90`
fn slider_line(fraction: f64, min: u32, max: u32) -> Line<'static> {
    let filled = ((fraction.clamp(0.0, 1.0) * SLIDER_WIDTH as f64).round() as usize).min(SLIDER_WIDTH);
    Line::from(vec![
        Span::styled(format!("  {min:>2} "), theme::muted()),
        Span::styled("=".repeat(filled), Style::default().fg(theme::ACCENT)),
        Span::styled("-".repeat(SLIDER_WIDTH - filled), theme::muted()),
        Span::styled(format!(" {max}"), theme::muted()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn slider_fills_proportionally() {
        assert_eq!(plain(&slider_line(0.0, 7, 90)), "   7 ---------------- 90");
        assert_eq!(plain(&slider_line(0.5, 7, 90)), "   7 ========-------- 90");
        assert_eq!(plain(&slider_line(1.0, 5, 20)), "   5 ================ 20");
    }
}
