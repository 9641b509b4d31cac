//! Panel 3, Chart: closing-price trajectory of the selected ticker, with
//! summary statistics underneath.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};

use stockscout_core::{PerformanceRecord, SeriesStats};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match (app.selected_record(), app.selected_stats()) {
        (Some(record), Some(stats)) => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(5), Constraint::Length(3)])
                .split(area);
            render_chart(f, parts[0], record);
            f.render_widget(Paragraph::new(stats_lines(&stats)), parts[1]);
        }
        _ => render_empty(f, area),
    }
}

fn render_empty(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Select a ticker in Top Performers (press 2, then Enter) to chart it.",
            theme::muted(),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn render_chart(f: &mut Frame, area: Rect, record: &PerformanceRecord) {
    let points = record.series.points();
    let data: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.close))
        .collect();

    let (y_min, y_max) = y_bounds(points.iter().map(|p| p.close));
    let x_max = points.len().saturating_sub(1) as f64;
    let first_date = points.first().map(|p| p.date.format("%b %d").to_string());
    let last_date = points.last().map(|p| p.date.format("%b %d").to_string());

    let dataset = Dataset::default()
        .name(record.ticker.as_str())
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(theme::change_color(record.pct_change)))
        .graph_type(GraphType::Line)
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .title(Span::styled("Date", theme::muted()))
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(vec![
                    Span::styled(first_date.unwrap_or_default(), theme::muted()),
                    Span::styled(last_date.unwrap_or_default(), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Price ($)", theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.2}"), theme::muted()),
                    Span::styled(format!("{y_max:.2}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

/// Min/max padded by 5% of the range; flat series get a unit band.
fn y_bounds(closes: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = closes.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
        (lo.min(c), hi.max(c))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = (hi - lo) * 0.05;
    if pad == 0.0 {
        return (lo - 0.5, hi + 0.5);
    }
    (lo - pad, hi + pad)
}

fn stats_lines(stats: &SeriesStats) -> Vec<Line<'static>> {
    let label = |s: &str| Span::styled(s.to_string(), theme::muted());
    let value = |s: String| Span::styled(s, theme::secondary());
    vec![
        Line::from(vec![
            label("Highest "),
            value(format!("${:.2}", stats.highest)),
            label("   Lowest "),
            value(format!("${:.2}", stats.lowest)),
            label("   Average "),
            value(format!("${:.2}", stats.average)),
        ]),
        Line::from(vec![
            label("Total return "),
            Span::styled(
                format!("{:+.2}%", stats.total_return * 100.0),
                theme::change_style(stats.total_return),
            ),
            label("   Price change "),
            Span::styled(
                format!("{:+.2}", stats.price_change),
                theme::change_style(stats.price_change),
            ),
        ]),
        Line::from(vec![
            label("Volatility "),
            value(format!("${:.2}", stats.volatility)),
            label("   Trading days "),
            value(stats.trading_days.to_string()),
        ]),
    ]
}
