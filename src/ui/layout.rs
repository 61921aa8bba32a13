use crate::{
    data::{InstrumentId, Sample},
    ui::{orderbook::ORDERBOOK_WIDTH, DepthState, OrderBookPanel, PriceChart, StatusBar},
};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// One full live-view frame: the captured price series beside the latest depth.
///
/// Rendering depends only on these fields and the frame area.
pub struct LiveView<'a> {
    pub instrument: &'a InstrumentId,
    pub series: &'a [Sample],
    pub depth: &'a DepthState,
    pub depth_levels: usize,
    pub updated_at: DateTime<Utc>,
}

impl LiveView<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(1)])
            .split(area);

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(ORDERBOOK_WIDTH)])
            .split(main_chunks[0]);

        PriceChart::new(self.instrument, self.series).render(frame, content_chunks[0]);
        OrderBookPanel::new(self.instrument, self.depth, self.depth_levels)
            .render(frame, content_chunks[1]);
        StatusBar {
            symbol: self.instrument.as_str(),
            healthy: self.depth.is_ready(),
            updated_at: self.updated_at,
        }
        .render(frame, main_chunks[1]);
    }
}
