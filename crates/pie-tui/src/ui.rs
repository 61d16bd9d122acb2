//! UI rendering for the health dashboard

use pie_health::date::format_status_time;
use pie_health::{
    Breakpoint, ChartOptions, DashboardContext, ModelAvailabilityRow, Viewport, add_usd,
    format_large_number, format_percent, max, min, number_to_money, parse_milliseconds,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Tabs},
};
use tracing::warn;

use crate::app::{App, TAB_TITLES};
use crate::chart;

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App, ctx: &DashboardContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    match app.selected_tab {
        0 => draw_availability(frame, app, ctx, chunks[1]),
        1 => draw_providers(frame, app, ctx, chunks[1]),
        _ => {}
    }
    draw_footer(frame, app, ctx.viewport(), chunks[2]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = Tabs::new(TAB_TITLES)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" APIpie Global AI Health ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .select(app.selected_tab)
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, area);
}

fn draw_availability(frame: &mut Frame, app: &App, ctx: &DashboardContext, area: Rect) {
    let Some(row) = app.expanded_row() else {
        draw_table(frame, app, ctx.viewport(), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    draw_table(frame, app, ctx.viewport(), chunks[0]);
    draw_chart(frame, ctx, ChartOptions::latency_bars(row), chunks[1]);
}

/// Viewport width in pixels for a terminal `columns` wide.
pub fn viewport_width(columns: u16, cell_width: u32) -> u32 {
    u32::from(columns).saturating_mul(cell_width)
}

/// Table columns visible at the current viewport width.
pub fn columns(viewport: &Viewport) -> Vec<(&'static str, Constraint)> {
    let mut cols = vec![
        ("Model", Constraint::Min(18)),
        ("Provider", Constraint::Length(12)),
        ("Type", Constraint::Length(7)),
        ("Uptime", Constraint::Length(9)),
        ("Latency", Constraint::Length(12)),
    ];
    if viewport.is_at_least(Breakpoint::Sm) {
        cols.push(("Status", Constraint::Length(18)));
    }
    if viewport.is_at_least(Breakpoint::Md) {
        cols.push(("Avg", Constraint::Length(9)));
        cols.push(("Input", Constraint::Length(9)));
        cols.push(("Output", Constraint::Length(9)));
    }
    if viewport.is_at_least(Breakpoint::Lg) {
        cols.push(("Context", Constraint::Length(10)));
        cols.push(("Max out", Constraint::Length(9)));
    }
    cols
}

/// Cell text for one row, matching [`columns`].
pub fn row_cells(row: &ModelAvailabilityRow, viewport: &Viewport) -> Vec<String> {
    let mut cells = vec![
        row.model.clone(),
        row.provider.clone(),
        row.model_type.clone(),
        format_percent(number_to_money(row.up_time_percentage, 2)),
        row.latest_latency()
            .map(|ms| parse_milliseconds(ms.max(0.0).round() as u64).to_string())
            .unwrap_or_else(|| "-".to_string()),
    ];
    if viewport.is_at_least(Breakpoint::Sm) {
        cells.push(
            row.last_status
                .as_ref()
                .map(|s| format!("{} {}", s.status, format_status_time(&s.dt)))
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    if viewport.is_at_least(Breakpoint::Md) {
        cells.push(add_usd(row.avg_cost.as_deref()));
        cells.push(add_usd(row.input_cost.as_deref()));
        cells.push(add_usd(row.output_cost.as_deref()));
    }
    if viewport.is_at_least(Breakpoint::Lg) {
        cells.push(format_large_number(row.max_tokens));
        cells.push(format_large_number(row.max_response_tokens));
    }
    cells
}

fn draw_table(frame: &mut Frame, app: &App, viewport: &Viewport, area: Rect) {
    let cols = columns(viewport);
    let header = Row::new(cols.iter().map(|(name, _)| *name))
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut style = Style::default().fg(uptime_color(row.up_time_percentage));
            if i == app.selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Row::new(row_cells(row, viewport)).style(style)
        })
        .collect();

    let table = Table::new(rows, cols.iter().map(|(_, c)| *c))
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Models ({}) ", app.rows.len()))
                .title_style(Style::default().fg(Color::Green)),
        );

    frame.render_widget(table, area);
}

fn draw_providers(frame: &mut Frame, app: &App, ctx: &DashboardContext, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    draw_chart(frame, ctx, ChartOptions::provider_share(&app.rows), chunks[0]);

    let uptimes: Vec<f64> = app.rows.iter().filter_map(|r| r.up_time_percentage).collect();
    let latencies: Vec<f64> = app.rows.iter().filter_map(|r| r.latest_latency()).collect();
    let ms = |v: Option<&f64>| {
        v.map(|v| parse_milliseconds(v.max(0.0).round() as u64).to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let pct = |v: Option<&f64>| format_percent(number_to_money(v.copied(), 2));

    let stats = [
        format!("  Models tracked: {}", app.rows.len()),
        String::new(),
        format!("  Best uptime:    {}", pct(max(&uptimes))),
        format!("  Worst uptime:   {}", pct(min(&uptimes))),
        String::new(),
        format!("  Fastest:        {}", ms(min(&latencies))),
        format!("  Slowest:        {}", ms(max(&latencies))),
    ];

    let paragraph = Paragraph::new(stats.join("\n")).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Summary ")
            .title_style(Style::default().fg(Color::Magenta)),
    );

    frame.render_widget(paragraph, chunks[1]);
}

fn draw_chart(frame: &mut Frame, ctx: &DashboardContext, options: ChartOptions, area: Rect) {
    match ctx.chart().prepare(options) {
        Ok(prepared) => chart::render(frame, &prepared, area),
        Err(e) => {
            warn!(error = %e, "chart not drawn");
            let paragraph = Paragraph::new(format!("  {e}"))
                .style(Style::default().fg(Color::Red))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(paragraph, area);
        }
    }
}

fn draw_footer(frame: &mut Frame, app: &App, viewport: &Viewport, area: Rect) {
    let status = match (&app.error, app.connected) {
        (Some(_), _) => Span::styled("○ Error", Style::default().fg(Color::Red)),
        (None, true) => Span::styled("● Connected", Style::default().fg(Color::Green)),
        (None, false) => Span::styled("○ Waiting", Style::default().fg(Color::Yellow)),
    };

    let last_update = app
        .last_update
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|dt| dt.format("Last update: %H:%M:%S").to_string())
        .unwrap_or_else(|| "No updates".to_string());

    let breakpoint = Breakpoint::current(viewport.width())
        .map(|b| b.name())
        .unwrap_or("-");

    let help = "[Tab] View  [↑↓] Select  [Enter] Expand  [s] Sort  [q] Quit";

    let footer = Paragraph::new(Line::from(vec![
        Span::raw("  "),
        status,
        Span::raw("  │  "),
        Span::styled(last_update, Style::default().fg(Color::DarkGray)),
        Span::raw("  │  "),
        Span::styled(
            format!("{breakpoint} · sort: {}", app.sort.label()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  │  "),
        Span::styled(help, Style::default().fg(Color::DarkGray)),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

fn uptime_color(uptime: Option<f64>) -> Color {
    match uptime {
        Some(p) if p >= 99.0 => Color::Green,
        Some(p) if p >= 95.0 => Color::Yellow,
        Some(_) => Color::Red,
        None => Color::DarkGray,
    }
}
