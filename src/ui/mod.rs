pub mod background;
pub mod colors;
pub mod nav;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use callhue::app::App;

pub fn render(f: &mut Frame, app: &App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // in-call background
            Constraint::Length(8), // color readout
            Constraint::Length(3), // bottom nav
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    background::render_gradient(f, app, outer[0]);
    background::render_readout(f, app, outer[1]);
    nav::render(f, app, outer[2]);
    render_status_bar(f, outer[3]);
}

fn render_status_bar(f: &mut Frame, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::DarkGray));
    let status = Line::from(vec![
        key(" [q]"),
        Span::raw("uit "),
        key("[s]"),
        Span::raw("pam "),
        key("[t]"),
        Span::raw("heme "),
        key("[a]"),
        Span::raw("ccount "),
        key("[c]"),
        Span::raw("all "),
        key("[h/l]"),
        Span::raw("tab "),
    ]);

    f.render_widget(
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White)),
        area,
    );
}
