//! Terminal renderer for prepared charts

use pie_health::{DataPoint, PreparedChart, Series, SeriesKind, format_percent, number_to_money};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
};

const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Red,
];

const BAR_GAP: u16 = 1;

/// Draw a prepared chart into `area`.
pub fn render(frame: &mut Frame, chart: &PreparedChart, area: Rect) {
    let block = chart_block(chart);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(series) = chart.series.first() else {
        frame.render_widget(Paragraph::new("  No data"), inner);
        return;
    };

    match series.kind {
        SeriesKind::Bar => render_bars(frame, chart, series, inner),
        SeriesKind::Pie => {
            frame.render_widget(Paragraph::new(pie_lines(chart, series, inner.width)), inner);
        }
    }
}

fn chart_block(chart: &PreparedChart) -> Block<'static> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    if let Some(title) = &chart.title {
        block = block.title(format!(" {title} "));
    }
    if chart.grid {
        block = block.title_bottom(Line::from(format!(" max {} ", axis_value(chart.max_value()))));
    }
    if chart.legend {
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        block = block.title_bottom(Line::from(format!(" {} ", names.join(" · "))).right_aligned());
    }
    block
}

/// Trailing points that fit in `width` cells at one cell per bar.
pub fn visible_points(series: &Series, width: u16) -> &[DataPoint] {
    let fits = usize::from((width / (1 + BAR_GAP)).max(1));
    &series.data[series.data.len().saturating_sub(fits)..]
}

fn render_bars(frame: &mut Frame, chart: &PreparedChart, series: &Series, area: Rect) {
    let points = visible_points(series, area.width);
    let count = u16::try_from(points.len()).unwrap_or(u16::MAX).max(1);
    let width = (area.width.saturating_sub(BAR_GAP.saturating_mul(count)) / count).clamp(1, 9);

    let bars: Vec<Bar> = points
        .iter()
        .map(|point| {
            let bar = Bar::default()
                .value(point.value.max(0.0).round() as u64)
                .label(Line::from(chart.fit_label(&point.label, width as usize)))
                .style(Style::default().fg(Color::Cyan));
            if chart.tooltip {
                bar.text_value(axis_value(point.value))
            } else {
                bar.text_value(String::new())
            }
        })
        .collect();

    let widget = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(width)
        .bar_gap(BAR_GAP)
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    frame.render_widget(widget, area);
}

/// Share lines for a pie series: label, percentage and a proportional bar.
pub fn pie_lines(chart: &PreparedChart, series: &Series, width: u16) -> Vec<Line<'static>> {
    const LABEL_WIDTH: usize = 14;
    let bar_room = (width as usize).saturating_sub(LABEL_WIDTH + 12).max(1);

    PreparedChart::shares(series)
        .into_iter()
        .enumerate()
        .map(|(i, (label, share))| {
            let color = PALETTE[i % PALETTE.len()];
            let filled = (share * bar_room as f64).round() as usize;
            let mut spans = vec![
                Span::styled(
                    format!("  {:<LABEL_WIDTH$}", chart.fit_label(&label, LABEL_WIDTH - 1)),
                    Style::default().fg(color),
                ),
                Span::styled("█".repeat(filled), Style::default().fg(color)),
            ];
            if chart.tooltip {
                let percent = format_percent(number_to_money(share * 100.0, 1));
                spans.push(Span::styled(format!(" {percent}"), Style::default().fg(Color::White)));
            }
            Line::from(spans)
        })
        .collect()
}

fn axis_value(value: f64) -> String {
    number_to_money(value, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pie_health::{ChartOptions, ChartRegistry, ModelAvailabilityRow};
    use ratatui::{Terminal, backend::TestBackend};

    fn provider_chart() -> PreparedChart {
        let rows = vec![
            ModelAvailabilityRow::new("a", "openai", "llm"),
            ModelAvailabilityRow::new("b", "openai", "llm"),
            ModelAvailabilityRow::new("c", "groq", "llm"),
            ModelAvailabilityRow::new("d", "anthropic", "llm"),
        ];
        ChartRegistry::standard()
            .component()
            .prepare(ChartOptions::provider_share(&rows))
            .unwrap()
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_pie_lines_show_percentages() {
        let chart = provider_chart();
        let lines = pie_lines(&chart, &chart.series[0], 60);

        assert_eq!(lines.len(), 3);
        assert!(text(&lines[0]).contains("anthropic"));
        assert!(text(&lines[0]).ends_with("25.0%"));
        assert!(text(&lines[2]).ends_with("50.0%"));
    }

    #[test]
    fn test_pie_lines_without_tooltip() {
        let mut chart = provider_chart();
        chart.tooltip = false;
        let lines = pie_lines(&chart, &chart.series[0], 60);
        assert!(!text(&lines[0]).contains('%'));
    }

    #[test]
    fn test_render_bar_chart() {
        let chart = ChartRegistry::standard()
            .component()
            .prepare(ChartOptions::titled("Latency").with_series(
                "gpt-4o",
                SeriesKind::Bar,
                vec![DataPoint::new("120ms", 120.0), DataPoint::new("-", 0.0)],
            ))
            .unwrap();

        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal.draw(|frame| render(frame, &chart, frame.area())).unwrap();

        let buffer = terminal.backend().buffer().clone();
        let content: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Latency"));
        assert!(content.contains("max 120"));
    }

    #[test]
    fn test_visible_points_keep_latest() {
        let series = Series {
            name: "s".into(),
            kind: SeriesKind::Bar,
            data: (0..100).map(|i| DataPoint::new(i.to_string(), f64::from(i))).collect(),
        };
        let shown = visible_points(&series, 20);
        assert_eq!(shown.len(), 10);
        assert_eq!(shown[0].label, "90");
        assert_eq!(visible_points(&series, 0).len(), 1);
    }

    #[test]
    fn test_render_many_bars_in_small_area() {
        let data = (0..65_536).map(|i| DataPoint::new("-", f64::from(i % 500))).collect();
        let chart = ChartRegistry::standard()
            .component()
            .prepare(ChartOptions::titled("Samples").with_series("m", SeriesKind::Bar, data))
            .unwrap();

        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal.draw(|frame| render(frame, &chart, frame.area())).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Samples"));
    }

    #[test]
    fn test_render_empty_chart() {
        let chart = ChartRegistry::standard()
            .component()
            .prepare(ChartOptions::titled("Empty"))
            .unwrap();

        let mut terminal = Terminal::new(TestBackend::new(30, 5)).unwrap();
        terminal.draw(|frame| render(frame, &chart, frame.area())).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("No data"));
    }
}
