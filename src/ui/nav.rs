use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use callhue::app::App;

use super::colors;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(colors::MUTED));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let items: Vec<_> = app.nav.items().collect();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, items.len().max(1) as u32); items.len()])
        .split(inner);

    for (item, cell) in items.iter().zip(cells.iter()) {
        let mut style = Style::default().fg(colors::terminal(item.text_color));
        if item.selected {
            style = style.add_modifier(Modifier::BOLD);
        }
        let label = Paragraph::new(Line::from(Span::styled(item.label.clone(), style)))
            .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(label, *cell);
    }
}
