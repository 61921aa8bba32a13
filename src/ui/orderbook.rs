use crate::data::{DepthLevel, DepthSnapshot, InstrumentId};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Columns reserved for the order book next to the chart.
pub const ORDERBOOK_WIDTH: u16 = 40;

/// Outcome of the latest depth refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum DepthState {
    Ready(DepthSnapshot),
    Unavailable(String),
}

impl DepthState {
    pub fn is_ready(&self) -> bool {
        matches!(self, DepthState::Ready(_))
    }
}

pub struct OrderBookPanel<'a> {
    pub instrument: &'a InstrumentId,
    pub depth: &'a DepthState,
    pub max_entries: usize,
}

impl<'a> OrderBookPanel<'a> {
    pub fn new(instrument: &'a InstrumentId, depth: &'a DepthState, max_entries: usize) -> Self {
        Self {
            instrument,
            depth,
            max_entries,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!("Orderbook for {}", self.instrument))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match self.depth {
            DepthState::Ready(book) => {
                // One row between the sides holds the spread.
                let sides_height = inner.height.saturating_sub(1);
                let asks_height = (sides_height / 2).min(self.max_entries as u16 + 1);
                let bids_height = sides_height.saturating_sub(asks_height);

                let asks_area = Rect {
                    height: asks_height,
                    ..inner
                };
                let spread_area = Rect {
                    y: inner.y + asks_height,
                    height: inner.height.min(1),
                    ..inner
                };
                let bids_area = Rect {
                    y: spread_area.y + spread_area.height,
                    height: bids_height,
                    ..inner
                };

                self.render_side("Asks", &book.asks, asks_area, frame, Color::Red);
                frame.render_widget(spread_line(book), spread_area);
                self.render_side("Bids", &book.bids, bids_area, frame, Color::Green);
            }
            DepthState::Unavailable(reason) => {
                let text = vec![
                    Line::from(Span::styled(
                        "Depth unavailable",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(reason.as_str(), Style::default().fg(Color::Gray))),
                    Line::from(Span::styled(
                        "Retrying on next refresh...",
                        Style::default().fg(Color::Gray),
                    )),
                ];
                let para = Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true });
                frame.render_widget(para, inner);
            }
        }
    }

    fn render_side(
        &self,
        label: &str,
        entries: &[DepthLevel],
        area: Rect,
        frame: &mut Frame,
        color: Color,
    ) {
        if area.height == 0 {
            return;
        }

        let header = Line::from(vec![Span::styled(
            format!("{:<5} {:>14} {:>14}", label, "Price", "Volume"),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )]);
        frame.render_widget(
            Paragraph::new(header),
            Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: 1,
            },
        );

        let rows = area.height.saturating_sub(1) as usize;
        for (idx, entry) in entries.iter().take(rows.min(self.max_entries)).enumerate() {
            let y = area.y + 1 + idx as u16;
            let line = Line::from(vec![
                Span::raw("      "),
                Span::styled(
                    format!("{:>14}", format_number(entry.price, 14)),
                    Style::default().fg(color),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("{:>14}", format_number(entry.volume, 14)),
                    Style::default().fg(Color::White),
                ),
            ]);
            frame.render_widget(
                Paragraph::new(line),
                Rect {
                    x: area.x,
                    y,
                    width: area.width,
                    height: 1,
                },
            );
        }
    }
}

fn spread_line(book: &DepthSnapshot) -> Paragraph<'static> {
    let spread = book
        .spread()
        .map_or_else(|| "N/A".to_string(), |s| format_number(s, 14));
    Paragraph::new(Line::from(Span::styled(
        format!("Spread: {spread}"),
        Style::default().fg(Color::Cyan),
    )))
    .alignment(Alignment::Center)
}

/// Shortest plain rendering of `value` (up to 8 decimals) that fits in
/// `max_len` characters, falling back to scientific notation.
pub fn format_number(value: f64, max_len: usize) -> String {
    let plain = format!("{value:.8}");
    let plain = plain.trim_end_matches('0').trim_end_matches('.');
    if plain.len() <= max_len {
        return plain.to_string();
    }

    let precision = max_len.saturating_sub(6);
    format!("{value:.precision$e}")
}
