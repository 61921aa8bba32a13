use crate::ui::LiveView;
use ratatui::{
    backend::{Backend, ClearType},
    layout::{Position, Rect},
    Terminal, TerminalOptions, Viewport,
};
use std::io;

/// Rows kept free under the frame for the operator prompt.
const PROMPT_ROWS: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub columns: u16,
    pub rows: u16,
}

impl TerminalSize {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }

    pub fn current() -> io::Result<Self> {
        let (columns, rows) = crossterm::terminal::size()?;
        Ok(Self { columns, rows })
    }

    fn frame_area(self) -> Rect {
        Rect::new(0, 0, self.columns, self.rows.saturating_sub(PROMPT_ROWS))
    }
}

/// Surface a refresh loop draws the live view onto.
///
/// Exactly one refresh loop owns the target at a time; it is handed back to
/// the session when the loop stops.
pub trait RenderTarget: Send + 'static {
    /// Lays the surface out for `size`. Called once before a loop starts,
    /// ahead of the operator prompt.
    fn begin(&mut self, size: TerminalSize) -> io::Result<()>;

    /// Blanks the frame. The prompt row below it is left as is.
    fn clear(&mut self) -> io::Result<()>;

    fn draw(&mut self, view: &LiveView<'_>) -> io::Result<()>;
}

pub struct TerminalTarget<B: Backend> {
    terminal: Terminal<B>,
    area: Rect,
}

impl<B: Backend> TerminalTarget<B> {
    pub fn new(backend: B, size: TerminalSize) -> io::Result<Self> {
        let area = size.frame_area();
        let terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Fixed(area),
            },
        )?;
        Ok(Self { terminal, area })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend + Send + 'static> RenderTarget for TerminalTarget<B> {
    fn begin(&mut self, size: TerminalSize) -> io::Result<()> {
        let area = size.frame_area();
        if area != self.area {
            // Wipes the whole screen, prompt row included.
            self.area = area;
            self.terminal.resize(area)?;
        }
        self.terminal.set_cursor_position((0, area.bottom()))
    }

    fn clear(&mut self) -> io::Result<()> {
        // Terminal::clear erases to the end of the screen on fixed viewports.
        let backend = self.terminal.backend_mut();
        for y in self.area.top()..self.area.bottom() {
            backend.set_cursor_position(Position::new(0, y))?;
            backend.clear_region(ClearType::CurrentLine)?;
        }
        // Drop the last frame so the next draw repaints every cell.
        self.terminal.swap_buffers();
        Ok(())
    }

    fn draw(&mut self, view: &LiveView<'_>) -> io::Result<()> {
        let prompt_row = self.area.bottom();
        self.terminal.draw(|frame| {
            view.render(frame, frame.area());
            frame.set_cursor_position((0, prompt_row));
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{DepthLevel, DepthSnapshot, InstrumentId, Sample},
        ui::DepthState,
    };
    use chrono::{DateTime, Utc};
    use ratatui::{backend::TestBackend, buffer::Cell};

    fn screen_text(target: &TerminalTarget<TestBackend>) -> String {
        target
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn draws_live_view_above_prompt_row() {
        let size = TerminalSize::new(100, 30);
        let mut target = TerminalTarget::new(TestBackend::new(100, 30), size).unwrap();
        let instrument = InstrumentId::from("BTCUSD");
        let series: Vec<Sample> = (0..10)
            .map(|day| Sample {
                time: DateTime::from_timestamp(1_700_000_000 + day * 86_400, 0).unwrap(),
                price: 37_000.0 + day as f64 * 100.0,
            })
            .collect();
        let depth = DepthState::Ready(DepthSnapshot {
            bids: vec![DepthLevel { price: 37_899.5, volume: 0.25 }],
            asks: vec![DepthLevel { price: 37_900.5, volume: 1.5 }],
        });
        let view = LiveView {
            instrument: &instrument,
            series: &series,
            depth: &depth,
            depth_levels: 5,
            updated_at: Utc::now(),
        };

        target.begin(size).unwrap();
        target.clear().unwrap();
        target.draw(&view).unwrap();

        let text = screen_text(&target);
        assert!(text.contains("BTCUSD Price Chart"));
        assert!(text.contains("Orderbook for BTCUSD"));
        assert!(text.contains("37899.5"));
        assert_eq!(
            target.terminal.backend_mut().get_cursor_position().unwrap(),
            Position::new(0, 29)
        );
    }

    fn put(target: &mut TerminalTarget<TestBackend>, x: u16, y: u16, symbol: &str) {
        let mut cell = Cell::default();
        cell.set_symbol(symbol);
        target
            .terminal
            .backend_mut()
            .draw(std::iter::once((x, y, &cell)))
            .unwrap();
    }

    fn symbol_at(target: &TerminalTarget<TestBackend>, x: u16, y: u16) -> String {
        target.backend().buffer()[(x, y)].symbol().to_string()
    }

    #[test]
    fn refresh_leaves_prompt_row_alone() {
        let size = TerminalSize::new(60, 10);
        let mut target = TerminalTarget::new(TestBackend::new(60, 10), size).unwrap();
        let instrument = InstrumentId::from("ETHUSD");
        let depth = DepthState::Ready(DepthSnapshot::default());
        let view = LiveView {
            instrument: &instrument,
            series: &[],
            depth: &depth,
            depth_levels: 5,
            updated_at: Utc::now(),
        };

        target.begin(size).unwrap();
        target.draw(&view).unwrap();
        put(&mut target, 0, 9, "P");
        put(&mut target, 1, 9, ">");

        target.clear().unwrap();
        assert!(screen_text(&target).contains("P>"));
        assert!(!screen_text(&target).contains("ETHUSD"));

        target.draw(&view).unwrap();
        assert_eq!(symbol_at(&target, 0, 9), "P");
        assert_eq!(symbol_at(&target, 1, 9), ">");
        assert!(screen_text(&target).contains("Orderbook for ETHUSD"));
    }

    #[test]
    fn begin_at_same_size_keeps_prompt_row() {
        let size = TerminalSize::new(60, 10);
        let mut target = TerminalTarget::new(TestBackend::new(60, 10), size).unwrap();
        put(&mut target, 0, 9, "P");

        target.begin(size).unwrap();

        assert_eq!(symbol_at(&target, 0, 9), "P");
        assert_eq!(
            target.terminal.backend_mut().get_cursor_position().unwrap(),
            Position::new(0, 9)
        );
    }

    #[test]
    fn begin_shrinks_frame_to_new_size() {
        let mut target =
            TerminalTarget::new(TestBackend::new(120, 40), TerminalSize::new(120, 40)).unwrap();

        target.begin(TerminalSize::new(80, 24)).unwrap();

        assert_eq!(target.area, Rect::new(0, 0, 80, 23));
    }
}
