use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use callhue::app::App;
use callhue::color::Argb;

use super::colors;

/// Three horizontal bands: top, middle and bottom gradient stops.
pub fn render_gradient(f: &mut Frame, app: &App, area: Rect) {
    let c = app.colors();
    let bands = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let caller = match app.current_account() {
        Some(handle) => format!(" Incoming call via {handle} "),
        None => " Incoming call ".to_string(),
    };
    let title = Paragraph::new(Line::from(Span::styled(
        caller,
        Style::default()
            .fg(colors::terminal(c.primary))
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors::terminal(c.background_top)));

    f.render_widget(title, bands[0]);
    f.render_widget(
        Block::default().style(Style::default().bg(colors::terminal(c.background_middle))),
        bands[1],
    );
    f.render_widget(
        Block::default().style(Style::default().bg(colors::terminal(c.background_bottom))),
        bands[2],
    );
}

/// Hex values for every field plus the simulated call flags.
pub fn render_readout(f: &mut Frame, app: &App, area: Rect) {
    let c = app.colors();
    let block = Block::default()
        .title(" Theme Colors ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::MUTED));

    let lines = vec![
        Line::from(vec![
            flag("call", app.call_active),
            flag("spam", app.is_spam),
            flag("theme", app.theme_override()),
        ]),
        swatch_line("primary   ", c.primary),
        swatch_line("secondary ", c.secondary),
        swatch_line("top       ", c.background_top),
        swatch_line("middle    ", c.background_middle),
        Line::from(
            [
                swatch_span("bottom    ", c.background_bottom),
                vec![Span::raw("   ")],
                swatch_span("solid ", c.background_solid),
            ]
            .concat(),
        ),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn flag(name: &'static str, on: bool) -> Span<'static> {
    let color = if on { colors::FLAG_ON } else { colors::FLAG_OFF };
    Span::styled(format!(" {name}:{} ", if on { "on" } else { "off" }), Style::default().fg(color))
}

fn swatch_line(label: &'static str, color: Argb) -> Line<'static> {
    Line::from(swatch_span(label, color))
}

fn swatch_span(label: &'static str, color: Argb) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!(" {label}"), Style::default().fg(colors::LABEL)),
        Span::styled("  ", Style::default().bg(colors::terminal(color))),
        Span::styled(format!(" {color}"), Style::default().fg(colors::MUTED)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use callhue::config::Config;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn row_text(backend: &TestBackend, row: u16) -> String {
        let buf = backend.buffer();
        (0..buf.area.width)
            .map(|x| buf[(x, row)].symbol().to_string())
            .collect()
    }

    #[test]
    fn gradient_bands_use_background_colors() {
        let app = App::new(&Config::default());
        let backend = TestBackend::new(40, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render_gradient(f, &app, f.area())).unwrap();

        let buf = terminal.backend().buffer();
        let c = app.colors();
        assert_eq!(buf[(5, 0)].bg, colors::terminal(c.background_top));
        assert_eq!(buf[(5, 2)].bg, colors::terminal(c.background_middle));
        assert_eq!(buf[(5, 5)].bg, colors::terminal(c.background_bottom));
    }

    #[test]
    fn readout_lists_hex_values() {
        let app = App::new(&Config::default());
        let backend = TestBackend::new(60, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render_readout(f, &app, f.area())).unwrap();

        let top = app.colors().background_top.to_string();
        let found = (0..8).any(|row| row_text(terminal.backend(), row).contains(&top));
        assert!(found, "expected {top} in readout");
    }
}
