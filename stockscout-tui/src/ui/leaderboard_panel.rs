//! Panel 2, Top Performers: ranked rows with the percentage change.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use stockscout_core::{format_pct_precise, PerformanceRecord};

use crate::app::{AppState, Panel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    let Some(outcome) = &app.board.outcome else {
        lines.push(Line::from(""));
        if app.loading {
            lines.push(Line::from(Span::styled(
                "Fetching latest stock data...",
                theme::accent(),
            )));
        } else if let Some(excluded) = &app.last_failure {
            lines.push(Line::from(Span::styled(
                "No price data could be retrieved for any ticker.",
                theme::negative(),
            )));
            lines.push(Line::from(Span::styled(
                "Check the ticker list and network connectivity, then press r.",
                theme::muted(),
            )));
            lines.push(Line::from(""));
            for e in excluded.iter().take(area.height.saturating_sub(5) as usize) {
                lines.push(Line::from(Span::styled(
                    format!("  {} ({})", e.ticker, e.reason),
                    theme::muted(),
                )));
            }
        } else {
            lines.push(Line::from(Span::styled(
                "No data loaded. Press r to fetch.",
                theme::muted(),
            )));
        }
        f.render_widget(Paragraph::new(lines), area);
        return;
    };

    // Header
    let mut header = vec![
        Span::styled(
            format!("Last {} days | ", app.board.lookback_days),
            theme::muted(),
        ),
        Span::styled(
            format!("{} of {} tickers", outcome.retrieved(), outcome.requested),
            if outcome.is_partial() {
                theme::warning()
            } else {
                theme::accent()
            },
        ),
    ];
    if app.loading {
        header.push(Span::styled("  refreshing...", theme::accent()));
    }
    lines.push(Line::from(header));
    lines.push(Line::from(Span::styled(
        format!("{:>3}  {:<8} {:>10} {:>10} {:>10}", "#", "Ticker", "Start", "End", "Change"),
        theme::accent_bold(),
    )));

    let entries = outcome.leaderboard.entries();
    let visible = area.height.saturating_sub(3) as usize;
    let start = scroll_start(app.board.cursor, visible, entries.len());
    let focused = app.active_panel == Panel::Leaderboard;

    for (i, entry) in entries.iter().enumerate().skip(start).take(visible) {
        let is_cursor = focused && i == app.board.cursor;
        let is_charted = app.selected.as_ref() == Some(&entry.ticker);
        lines.push(row(i + 1, entry, is_cursor, is_charted));
    }

    if !outcome.excluded.is_empty() {
        let names: Vec<&str> = outcome.excluded.iter().map(|e| e.ticker.as_str()).collect();
        lines.push(Line::from(Span::styled(
            format!("excluded: {}", names.join(", ")),
            theme::warning(),
        )));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn row(rank: usize, entry: &PerformanceRecord, is_cursor: bool, is_charted: bool) -> Line<'static> {
    let base = if is_cursor {
        theme::cursor_row()
    } else {
        theme::secondary()
    };
    let change = if is_cursor {
        base
    } else {
        theme::change_style(entry.pct_change)
    };
    let mark = if is_charted { "*" } else { " " };
    Line::from(vec![
        Span::styled(format!("{rank:>3}{mark} {:<8}", entry.ticker.as_str()), base),
        Span::styled(
            format!(" {:>10.2} {:>10.2}", entry.start_price, entry.end_price),
            base,
        ),
        Span::styled(format!(" {:>10}", format_pct_precise(entry.pct_change)), change),
    ])
}

/// First visible row so the cursor stays on screen.
fn scroll_start(cursor: usize, visible: usize, len: usize) -> usize {
    if visible == 0 || len <= visible {
        return 0;
    }
    cursor.saturating_sub(visible - 1).min(len - visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockscout_core::{PriceSeries, Ticker};

    #[test]
    fn scroll_follows_cursor() {
        assert_eq!(scroll_start(0, 5, 20), 0);
        assert_eq!(scroll_start(4, 5, 20), 0);
        assert_eq!(scroll_start(5, 5, 20), 1);
        assert_eq!(scroll_start(19, 5, 20), 15);
        assert_eq!(scroll_start(3, 10, 4), 0);
    }

    #[test]
    fn row_shows_prices_and_signed_change() {
        let entry = PerformanceRecord {
            ticker: Ticker::parse("msft").unwrap(),
            start_price: 400.0,
            end_price: 392.0,
            pct_change: -0.02,
            series: PriceSeries::empty(Ticker::parse("msft").unwrap()),
        };
        let line = row(3, &entry, false, true);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with("  3* MSFT"));
        assert!(text.contains("400.00"));
        assert!(text.ends_with("-2.00%"));
    }
}
