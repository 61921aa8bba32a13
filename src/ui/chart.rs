use crate::data::{InstrumentId, Sample};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

/// Date ticks shown under the chart.
const MAX_DATE_LABELS: usize = 5;

/// Closing-price line chart of the series captured when the live view started.
pub struct PriceChart<'a> {
    pub instrument: &'a InstrumentId,
    pub series: &'a [Sample],
}

impl<'a> PriceChart<'a> {
    pub fn new(instrument: &'a InstrumentId, series: &'a [Sample]) -> Self {
        Self { instrument, series }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!("{} Price Chart", self.instrument))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let (Some(first), Some(last)) = (self.series.first(), self.series.last()) else {
            let text = Line::from(Span::styled(
                "No price data",
                Style::default().fg(Color::Gray),
            ));
            frame.render_widget(
                Paragraph::new(text).alignment(Alignment::Center).block(block),
                area,
            );
            return;
        };

        let points: Vec<(f64, f64)> = self
            .series
            .iter()
            .map(|s| (s.time.timestamp() as f64, s.price))
            .collect();

        let x_min = first.time.timestamp() as f64;
        let x_max = (last.time.timestamp() as f64).max(x_min + 1.0);
        let [y_min, y_max] = price_bounds(self.series);

        let dataset = Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::White))
            .data(&points);

        let chart = Chart::new(vec![dataset])
            .block(block)
            .x_axis(
                Axis::default()
                    .title("Date")
                    .style(Style::default().fg(Color::Gray))
                    .bounds([x_min, x_max])
                    .labels(date_labels(self.series)),
            )
            .y_axis(
                Axis::default()
                    .title("Price")
                    .style(Style::default().fg(Color::Gray))
                    .bounds([y_min, y_max])
                    .labels([
                        format!("{y_min:.2}"),
                        format!("{:.2}", (y_min + y_max) / 2.0),
                        format!("{y_max:.2}"),
                    ]),
            );

        frame.render_widget(chart, area);
    }
}

/// Price axis bounds padded by 10% of the observed range.
fn price_bounds(series: &[Sample]) -> [f64; 2] {
    let (min, max) = series.iter().fold((f64::MAX, f64::MIN), |(min, max), s| {
        (min.min(s.price), max.max(s.price))
    });

    let range = max - min;
    let pad = if range > 0.0 {
        range * 0.1
    } else {
        (max.abs() * 0.01).max(0.0001)
    };
    [min - pad, max + pad]
}

/// Dates of up to five evenly spaced samples, first and last included.
fn date_labels(series: &[Sample]) -> Vec<String> {
    let count = MAX_DATE_LABELS.min(series.len());
    if count < 2 {
        return series
            .iter()
            .map(|s| s.time.format("%Y-%m-%d").to_string())
            .collect();
    }

    (0..count)
        .map(|i| i * (series.len() - 1) / (count - 1))
        .map(|idx| series[idx].time.format("%Y-%m-%d").to_string())
        .collect()
}
