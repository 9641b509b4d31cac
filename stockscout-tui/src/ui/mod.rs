//! Top-level UI layout: settings sidebar, leaderboard and chart stacked on
//! the right, status bar at the bottom.

pub mod chart_panel;
pub mod leaderboard_panel;
pub mod settings_panel;
pub mod status_bar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::{AppState, Panel};
use crate::theme;

const SIDEBAR_WIDTH: u16 = 34;

pub fn draw(f: &mut Frame, app: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());
    let main_area = rows[0];
    let status_area = rows[1];

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(main_area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(cols[1]);

    draw_panel(f, cols[0], app, Panel::Settings);
    draw_panel(f, right[0], app, Panel::Leaderboard);
    draw_panel(f, right[1], app, Panel::Chart);

    status_bar::render(f, status_area, app);

    if app.show_help {
        render_help(f, main_area);
    }
}

fn draw_panel(f: &mut Frame, area: Rect, app: &AppState, panel: Panel) {
    let is_active = app.active_panel == panel;
    let title = match panel {
        Panel::Chart => match &app.selected {
            Some(t) => format!(
                " {} - Last {} Days Performance [{}] ",
                t,
                app.board.lookback_days,
                panel.index() + 1
            ),
            None => format!(" {} [{}] ", panel.label(), panel.index() + 1),
        },
        _ => format!(" {} [{}] ", panel.label(), panel.index() + 1),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(is_active))
        .title(title)
        .title_style(theme::panel_title(is_active));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Settings => settings_panel::render(f, inner, app),
        Panel::Leaderboard => leaderboard_panel::render(f, inner, app),
        Panel::Chart => chart_panel::render(f, inner, app),
    }
}

fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 70, area);
    f.render_widget(Clear, popup);

    let key = |k: &str, what: &str| {
        Line::from(vec![
            Span::styled(format!("  {k:<12}"), theme::accent_bold()),
            Span::styled(what.to_string(), theme::secondary()),
        ])
    };
    let lines = vec![
        Line::from(Span::styled(" Global", theme::neutral())),
        key("1 / 2 / 3", "focus Settings / Top Performers / Chart"),
        key("Tab", "next panel (Shift-Tab previous)"),
        key("r", "refresh data"),
        key("n", "send desktop notification of the top performers"),
        key("?", "this help"),
        key("q / Esc", "quit"),
        Line::from(""),
        Line::from(Span::styled(" Settings", theme::neutral())),
        key("j / k", "move between fields"),
        key("Enter / e", "edit tickers (Enter applies, Esc cancels)"),
        key("h / l", "lookback days / top-N by 1"),
        key("H / L", "by 5"),
        Line::from(""),
        Line::from(Span::styled(" Top Performers / Chart", theme::neutral())),
        key("j / k", "move cursor"),
        key("Enter", "chart the ticker under the cursor"),
        Line::from(""),
        Line::from(Span::styled("  Press any key to close.", theme::muted())),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Help ")
        .title_style(theme::accent_bold());
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
