use crate::app::App;
use choropleth_tui::braille::BrailleCanvas;
use choropleth_tui::map::geometry::{fill_path, stroke_path};
use choropleth_tui::scale::Rgb;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

const OUTLINE: Rgb = Rgb(40, 40, 40);
const LEGEND_STEPS: usize = 12;

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Split into map area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" World {} ", app.layer.metric()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Shapes drawn at the last move end, shifted along with any drag in progress
    let offset = app.map.pane_offset();
    let mut canvas = BrailleCanvas::new(inner.width as usize, inner.height as usize);
    let shapes = app.layer.shapes();
    for shape in shapes.iter() {
        fill_path(&mut canvas, &shape.path, shape.color, offset);
    }
    if app.show_outlines {
        for shape in shapes.iter() {
            stroke_path(&mut canvas, &shape.path, OUTLINE, offset);
        }
    }

    frame.render_widget(MapWidget { canvas }, inner);
}

/// Custom widget that paints the coloured braille canvas
struct MapWidget {
    canvas: BrailleCanvas,
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self.canvas.height().min(area.height as usize);
        let cols = self.canvas.width().min(area.width as usize);

        for cy in 0..rows {
            for cx in 0..cols {
                // Empty braille cells keep the terminal background
                if let Some((ch, color)) = self.canvas.cell(cx, cy) {
                    let x = area.x + cx as u16;
                    let y = area.y + cy as u16;
                    buf[(x, y)].set_char(ch).set_fg(color.into());
                }
            }
        }
    }
}

/// Compact number for the status bar: 1.5B, 604.0M, 73.0K, 21.9
pub fn format_value(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if abs >= 1e4 {
        format!("{:.1}K", v / 1e3)
    } else {
        format!("{:.1}", v)
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let domain = app.layer.domain();
    let dim = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled(" Zoom: ", dim),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", dim),
        Span::styled(
            app.layer.metric().to_string(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {} ", format_value(domain.min)), dim),
    ];

    // Legend: the colour ramp from the bottom to the top of the domain
    for color in app.layer.scale().ramp(LEGEND_STEPS) {
        spans.push(Span::styled("█", Style::default().fg(color.into())));
    }

    spans.push(Span::styled(format!(" {}+ ", format_value(domain.max)), dim));
    spans.push(Span::styled("| ", dim));

    match app.hovered() {
        Some(hover) => {
            spans.push(Span::styled(hover.name, Style::default().fg(Color::White)));
            spans.push(Span::styled(
                format!(" {} ", format_value(hover.value)),
                Style::default().fg(Color::Yellow),
            ));
        }
        None => spans.push(Span::styled(
            app.center_coords(),
            Style::default().fg(Color::Cyan),
        )),
    }

    spans.push(Span::styled(
        " | hjkl:pan +/-:zoom m:metric o:outline r:reset q:quit",
        dim,
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
