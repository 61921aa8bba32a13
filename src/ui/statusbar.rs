use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

pub struct StatusBar<'a> {
    pub symbol: &'a str,
    pub healthy: bool,
    pub updated_at: DateTime<Utc>,
}

impl StatusBar<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let (marker, health, color) = if self.healthy {
            ("●", "LIVE", Color::Green)
        } else {
            ("○", "STALE", Color::Red)
        };
        let updated = self.updated_at.with_timezone(&Local).format("%H:%M:%S");
        let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

        let mut spans = vec![
            Span::styled(format!("{marker} {health} "), Style::default().fg(color)),
            Span::styled(self.symbol, Style::default().fg(Color::White)),
            Span::raw(format!(" @ {updated} | ")),
        ];
        for (k, action) in [("PAIR", ":Switch "), ("Q", ":Back "), ("X", ":Exit")] {
            spans.push(key(k));
            spans.push(Span::raw(action));
        }

        let para = Paragraph::new(Line::from(spans)).block(Block::default());
        frame.render_widget(para, area);
    }
}
