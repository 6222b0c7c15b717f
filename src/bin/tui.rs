mod tui_app;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
    Frame, Terminal,
};
use tui_app::{
    format_age, format_pct, format_source, format_time_ns, season_color, truncate, AppState,
    ConnectionStatus,
};

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> io::Result<()> {
    let base_url = std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("failed to build HTTP client");

    let mut app = AppState::new(base_url);

    // Initial fetch before rendering
    app.refresh(&client).await;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &client).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    client: &reqwest::Client,
) -> io::Result<()> {
    let refresh_interval = Duration::from_secs(2);
    let mut last_tick = std::time::Instant::now();

    loop {
        terminal.draw(|f| render(f, app))?;

        let timeout = refresh_interval
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            app.refresh(client).await;
                            last_tick = std::time::Instant::now();
                        }
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= refresh_interval {
            app.refresh(client).await;
            last_tick = std::time::Instant::now();
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(f: &mut Frame, app: &AppState) {
    let area = f.area();

    // Outer vertical split: header | body | footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    render_body(f, app, chunks[1]);
    render_footer(f, chunks[2]);
}

fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let (status_text, status_color) = match &app.status {
        ConnectionStatus::Connected => ("● connected".to_string(), Color::Green),
        ConnectionStatus::Connecting => ("◌ connecting".to_string(), Color::Yellow),
        ConnectionStatus::Error(e) => (format!("✗ {}", truncate(e, 40)), Color::Red),
    };

    let fresh_str = match (app.health.sources_fresh, app.health.sources_total) {
        (Some(fresh), Some(total)) => format!("{fresh}/{total} sources fresh"),
        _ => "sources: —".to_string(),
    };

    let fetch_str = app
        .latency
        .p50_ms
        .map_or("—".to_string(), |v| format!("{v:.0}ms fetch p50"));

    let title_spans = vec![
        Span::styled(
            " Season Scanner  ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw("  │  "),
        Span::styled(
            format!("{} {}", app.season.icon, app.season.name),
            Style::default().fg(season_color(&app.season.season)),
        ),
        Span::raw("  │  "),
        Span::styled(fresh_str, Style::default().fg(Color::White)),
        Span::raw("  │  "),
        Span::styled(fetch_str, Style::default().fg(Color::White)),
    ];

    let header_line = Line::from(title_spans);
    let paragraph = Paragraph::new(header_line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    f.render_widget(paragraph, area);
}

fn render_body(f: &mut Frame, app: &AppState, area: Rect) {
    // Horizontal split: season badge (40%) | indicators + history (60%)
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_season_panel(f, app, halves[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(halves[1]);

    render_indicators_table(f, app, right[0]);
    render_history_table(f, app, right[1]);
}

fn render_season_panel(f: &mut Frame, app: &AppState, area: Rect) {
    let badge_color = season_color(&app.season.season);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " MARKET SEASON ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // badge
            Constraint::Length(3), // description
            Constraint::Length(2), // phase progress gauge
            Constraint::Length(2), // confidence gauge
            Constraint::Min(0),    // signals
        ])
        .split(inner);

    let badge = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} {}", app.season.icon, app.season.name),
            Style::default().fg(badge_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            app.season.subtitle.clone(),
            Style::default().fg(Color::Gray),
        )),
    ]);
    f.render_widget(badge, rows[0]);

    let description = Paragraph::new(app.season.description.clone())
        .style(Style::default().fg(Color::DarkGray))
        .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(description, rows[1]);

    let progress = Gauge::default()
        .label(format!("phase {}", format_pct(app.season.progress)))
        .ratio((app.season.progress / 100.0).clamp(0.0, 1.0))
        .gauge_style(Style::default().fg(badge_color));
    f.render_widget(progress, rows[2]);

    let confidence = Gauge::default()
        .label(format!("confidence {:.0}", app.season.confidence))
        .ratio((app.season.confidence / 100.0).clamp(0.0, 1.0))
        .gauge_style(Style::default().fg(Color::Cyan));
    f.render_widget(confidence, rows[3]);

    let mut signal_lines = vec![Line::from(Span::styled(
        "signals:",
        Style::default().fg(Color::Yellow),
    ))];
    for s in &app.season.signals {
        signal_lines.push(Line::from(Span::raw(format!("  • {s}"))));
    }
    f.render_widget(Paragraph::new(signal_lines), rows[4]);
}

fn render_indicators_table(f: &mut Frame, app: &AppState, area: Rect) {
    let header_cells = ["Source", "Value", "Age", "Status"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .indicators
        .iter()
        .map(|i| {
            let value = match (i.value, i.drawdown_pct) {
                (Some(v), _) => format!("{v:.1}"),
                (None, Some(dd)) => format!("-{dd:.1}% vs ATH"),
                _ => "—".to_string(),
            };
            let (status, status_color) = if i.stale {
                ("stale", Color::Red)
            } else {
                ("fresh", Color::Green)
            };

            Row::new(vec![
                Cell::from(format_source(&i.source)),
                Cell::from(value).style(Style::default().fg(Color::Cyan)),
                Cell::from(format_age(i.age_secs)).style(Style::default().fg(Color::DarkGray)),
                Cell::from(status).style(Style::default().fg(status_color)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Min(12),
            Constraint::Length(6),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " INDICATORS ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(table, area);
}

fn render_history_table(f: &mut Frame, app: &AppState, area: Rect) {
    let header_cells = ["Time", "Season", "Progress", "Conf", "Cycle position"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        });
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .history
        .iter()
        .map(|h| {
            Row::new(vec![
                Cell::from(format_time_ns(h.computed_at)).style(Style::default().fg(Color::DarkGray)),
                Cell::from(h.season.clone())
                    .style(Style::default().fg(season_color(&h.season))),
                Cell::from(format_pct(h.progress)),
                Cell::from(format!("{:.0}", h.confidence)).style(Style::default().fg(Color::Cyan)),
                Cell::from(truncate(&h.cycle_position, 24)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(13),
            Constraint::Length(8),
            Constraint::Length(5),
            Constraint::Min(16),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " SNAPSHOT HISTORY ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(table, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" [q] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit  "),
        Span::styled("[r] ", Style::default().fg(Color::Yellow)),
        Span::raw("refresh  "),
        Span::styled("auto-refresh: 2s", Style::default().fg(Color::DarkGray)),
    ]);
    let paragraph = Paragraph::new(line).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}
