use marine_guardian::alerts::{Alert, AlertEngine};
use marine_guardian::biodiversity::{BiodiversityModel, Trend};
use marine_guardian::db::Observation;
use marine_guardian::hab::{self, HabInputs};
use marine_guardian::water_quality::{self, QualityBand};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::collections::HashMap;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Overview,
    ObservationLog,
    StationSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterType {
    None,
    AllObservations,
    ByBand(QualityBand),
    ByStation(String),
}

#[derive(Debug, Clone)]
pub struct FilterState {
    pub active_filter: FilterType,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Overview => Page::ObservationLog,
            Page::ObservationLog => Page::StationSummary,
            Page::StationSummary => Page::Overview,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Overview => Page::StationSummary,
            Page::ObservationLog => Page::Overview,
            Page::StationSummary => Page::ObservationLog,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Overview => "Overview",
            Page::ObservationLog => "Observation Log",
            Page::StationSummary => "Stations",
        }
    }
}

pub struct App {
    pub observations: Vec<Observation>,
    pub filtered_observations: Vec<Observation>,
    pub state: TableState,
    pub total_count: i64,
    pub current_page: Page,
    pub station_summary_state: TableState,
    pub show_detail: bool,
    pub filter_state: FilterState,
    pub alerts: Vec<Alert>,
}

impl App {
    pub fn new(observations: Vec<Observation>, total_count: i64) -> Self {
        let mut state = TableState::default();
        if !observations.is_empty() {
            state.select(Some(0));
        }

        let mut station_summary_state = TableState::default();
        station_summary_state.select(Some(0));

        let filtered_observations = observations.clone();
        let alerts = AlertEngine::with_default_rules().evaluate_batch(&observations);

        Self {
            observations,
            filtered_observations,
            state,
            total_count,
            current_page: Page::Overview,
            station_summary_state,
            show_detail: false,
            filter_state: FilterState {
                active_filter: FilterType::None,
            },
            alerts,
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_observation(&self) -> Option<&Observation> {
        self.state
            .selected()
            .and_then(|i| self.filtered_observations.get(i))
    }

    pub fn apply_filter(&mut self, filter: FilterType) {
        self.filter_state.active_filter = filter.clone();

        self.filtered_observations = match filter {
            FilterType::None | FilterType::AllObservations => self.observations.clone(),
            FilterType::ByBand(band) => self
                .observations
                .iter()
                .filter(|obs| {
                    QualityBand::from_score(water_quality::water_quality_score(obs)) == band
                })
                .cloned()
                .collect(),
            FilterType::ByStation(ref station) => self
                .observations
                .iter()
                .filter(|obs| &obs.station == station)
                .cloned()
                .collect(),
        };

        // Reset selection to first item
        if !self.filtered_observations.is_empty() {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }

    pub fn clear_filter(&mut self) {
        self.apply_filter(FilterType::None);
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    /// Per-station rollup: count, mean score, worst band
    pub fn station_summary(&self) -> Vec<(String, usize, f64, QualityBand)> {
        let mut summary: HashMap<String, (usize, f64, f64)> = HashMap::new();

        for obs in &self.observations {
            let score = water_quality::water_quality_score(obs);
            let entry = summary.entry(obs.station.clone()).or_insert((0, 0.0, 1.0));
            entry.0 += 1;
            entry.1 += score;
            entry.2 = entry.2.min(score);
        }

        let mut result: Vec<_> = summary
            .into_iter()
            .map(|(station, (count, sum, worst))| {
                (
                    station,
                    count,
                    sum / count as f64,
                    QualityBand::from_score(worst),
                )
            })
            .collect();

        result.sort_by(|a, b| a.0.cmp(&b.0));
        result
    }

    pub fn next(&mut self) {
        let len = self.filtered_observations.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.filtered_observations.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.filtered_observations.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                let next = i + 20;
                if next >= len {
                    len - 1
                } else {
                    next
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let i = match self.state.selected() {
            Some(i) => {
                if i < 20 {
                    0
                } else {
                    i - 20
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn stats(&self) -> ObservationStats {
        let mut stats = ObservationStats::default();

        for obs in &self.observations {
            let score = water_quality::water_quality_score(obs);
            match QualityBand::from_score(score) {
                QualityBand::Good => stats.good_count += 1,
                QualityBand::Moderate => stats.moderate_count += 1,
                QualityBand::Poor => stats.poor_count += 1,
            }
        }

        stats.critical_alerts = self
            .alerts
            .iter()
            .filter(|a| a.severity == "critical")
            .count();

        stats
    }
}

#[derive(Default)]
pub struct ObservationStats {
    pub good_count: usize,
    pub moderate_count: usize,
    pub poor_count: usize,
    pub critical_alerts: usize,
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::Char('c') => {
                    app.clear_filter();
                    app.current_page = Page::ObservationLog;
                }
                KeyCode::Char('1') if app.current_page == Page::Overview => {
                    app.apply_filter(FilterType::AllObservations);
                    app.current_page = Page::ObservationLog;
                }
                KeyCode::Char('2') if app.current_page == Page::Overview => {
                    app.apply_filter(FilterType::ByBand(QualityBand::Good));
                    app.current_page = Page::ObservationLog;
                }
                KeyCode::Char('3') if app.current_page == Page::Overview => {
                    app.apply_filter(FilterType::ByBand(QualityBand::Moderate));
                    app.current_page = Page::ObservationLog;
                }
                KeyCode::Char('4') if app.current_page == Page::Overview => {
                    app.apply_filter(FilterType::ByBand(QualityBand::Poor));
                    app.current_page = Page::ObservationLog;
                }
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.state.select(Some(0)),
                KeyCode::End => {
                    if !app.filtered_observations.is_empty() {
                        app.state.select(Some(app.filtered_observations.len() - 1));
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    // Header with page navigation
    render_header(f, chunks[0], app);

    // Content area with optional split for detail panel
    if app.show_detail && app.current_page == Page::ObservationLog {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(60), // Observation list
                Constraint::Percentage(40), // Detail panel
            ])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        match app.current_page {
            Page::Overview => render_overview(f, chunks[1], app),
            Page::ObservationLog => render_table(f, chunks[1], app),
            Page::StationSummary => render_station_summary(f, chunks[1], app),
        }
    }

    // Status bar
    render_status_bar(f, chunks[2], app);
}

fn band_color(band: QualityBand) -> Color {
    match band {
        QualityBand::Good => Color::Green,
        QualityBand::Moderate => Color::Yellow,
        QualityBand::Poor => Color::Red,
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let stats = app.stats();

    // Page tabs
    let pages = vec![
        (Page::Overview, "Overview"),
        (Page::ObservationLog, "Observation Log"),
        (Page::StationSummary, "Stations"),
    ];

    let mut tab_spans = vec![];
    for (i, (page, name)) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(*name, style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Samples: {}", app.total_count),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("● {}", stats.good_count),
        Style::default().fg(Color::Green),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("● {}", stats.moderate_count),
        Style::default().fg(Color::Yellow),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("● {}", stats.poor_count),
        Style::default().fg(Color::Red),
    ));

    let header_text = vec![Line::from(tab_spans)];

    let header = Paragraph::new(header_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Date", "Station", "DO", "NTU", "µP/L", "Chem", "Score", "Band"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.filtered_observations.iter().map(|obs| {
        let score = water_quality::water_quality_score(obs);
        let band = QualityBand::from_score(score);
        let color = band_color(band);

        let cells = vec![
            Cell::from(obs.date.clone()),
            Cell::from(truncate(&obs.station, 22)),
            Cell::from(format!("{:.1}", obs.dissolved_oxygen)),
            Cell::from(format!("{:.1}", obs.turbidity)),
            Cell::from(format!("{:.1}", obs.microplastic)),
            Cell::from(format!("{:.1}", obs.chemical_pollutants)),
            Cell::from(format!("{:.0}%", score * 100.0)).style(Style::default().fg(color)),
            Cell::from(band.as_str()).style(Style::default().fg(color)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(24),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Observations "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.filtered_observations.len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    // Show filter status if active
    if app.filter_state.active_filter != FilterType::None
        && app.filter_state.active_filter != FilterType::AllObservations
    {
        let filter_name = match &app.filter_state.active_filter {
            FilterType::ByBand(band) => band.as_str().to_string(),
            FilterType::ByStation(station) => station.clone(),
            _ => "CUSTOM".to_string(),
        };
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Filter: {}", filter_name),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Details | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Fast | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_text = vec![Line::from(status_spans)];

    let status_bar = Paragraph::new(status_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}

fn render_station_summary(f: &mut Frame, area: Rect, app: &mut App) {
    let summary = app.station_summary();

    let header_cells = ["Station", "Samples", "Mean Score", "Worst Band"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = summary.iter().map(|(station, count, mean, worst)| {
        let cells = vec![
            Cell::from(station.clone()),
            Cell::from(format!("{}", count)),
            Cell::from(format!("{:.1}%", mean * 100.0))
                .style(Style::default().fg(band_color(QualityBand::from_score(*mean)))),
            Cell::from(worst.as_str()).style(Style::default().fg(band_color(*worst))),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(28),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Stations - Summary by Site "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.station_summary_state);
}

fn render_overview(f: &mut Frame, area: Rect, app: &App) {
    let stats = app.stats();
    let model = BiodiversityModel::new();

    let mut content = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Ecosystem Overview",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];

    // Water quality distribution + quick filters
    content.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("1", Style::default().fg(Color::Yellow)),
        Span::raw(". All observations   "),
        Span::styled(
            format!("{:>4}", app.total_count),
            Style::default().fg(Color::White),
        ),
    ]));
    content.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("2", Style::default().fg(Color::Yellow)),
        Span::raw(". Good water         "),
        Span::styled(
            format!("{:>4}", stats.good_count),
            Style::default().fg(Color::Green),
        ),
    ]));
    content.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("3", Style::default().fg(Color::Yellow)),
        Span::raw(". Moderate water     "),
        Span::styled(
            format!("{:>4}", stats.moderate_count),
            Style::default().fg(Color::Yellow),
        ),
    ]));
    content.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("4", Style::default().fg(Color::Yellow)),
        Span::raw(". Poor water         "),
        Span::styled(
            format!("{:>4}", stats.poor_count),
            Style::default().fg(Color::Red),
        ),
    ]));

    // Species health table
    content.push(Line::from(""));
    content.push(Line::from(vec![Span::styled(
        "  Species Health",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]));
    for entry in model.species_health() {
        let trend_marker = match entry.trend {
            Trend::Critical => Span::styled("▼▼", Style::default().fg(Color::Red)),
            Trend::Declining => Span::styled("▼", Style::default().fg(Color::Yellow)),
            Trend::Stable => Span::styled("→", Style::default().fg(Color::Green)),
        };
        content.push(Line::from(vec![
            Span::raw(format!("  {:<14}", entry.group.as_str())),
            Span::styled(
                format!("{:.2}  ", entry.health_index),
                Style::default().fg(match entry.band {
                    marine_guardian::biodiversity::HealthBand::Healthy => Color::Green,
                    marine_guardian::biodiversity::HealthBand::Stressed => Color::Yellow,
                    marine_guardian::biodiversity::HealthBand::Critical => Color::Red,
                }),
            ),
            trend_marker,
            Span::raw(format!("  {}", entry.trend.as_str())),
        ]));
    }

    // Active alerts
    content.push(Line::from(""));
    content.push(Line::from(vec![Span::styled(
        format!(
            "  Alerts: {} total, {} critical",
            app.alerts.len(),
            stats.critical_alerts
        ),
        Style::default().fg(if stats.critical_alerts > 0 {
            Color::Red
        } else {
            Color::Green
        }),
    )]));
    for alert in app.alerts.iter().take(5) {
        content.push(Line::from(vec![
            Span::raw("   "),
            Span::styled(
                alert.summary(),
                Style::default().fg(if alert.severity == "critical" {
                    Color::Red
                } else {
                    Color::Yellow
                }),
            ),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled(
            "  Hint: ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ),
        Span::styled(
            "Press 1-4 to jump to a filtered log, c to clear",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    ]));

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Marine Ecosystem Guardian "),
    );

    f.render_widget(paragraph, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let obs = match app.selected_observation() {
        Some(o) => o,
        None => {
            let no_selection = Paragraph::new("No observation selected").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Observation Details "),
            );
            f.render_widget(no_selection, area);
            return;
        }
    };

    let report = water_quality::assess(obs);
    let hab_report = hab::assess(&HabInputs::from_observation(obs));

    let mut content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  Date: ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(&obs.date),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  Station: ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(&obs.station),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  Water Quality: ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{:.1}% ({})", report.overall_score * 100.0, report.band.as_str()),
                Style::default().fg(band_color(report.band)),
            ),
        ]),
        Line::from(""),
    ];

    for param in &report.parameters {
        content.push(Line::from(vec![
            Span::raw(format!("    {:<20}", param.parameter.as_str())),
            Span::raw(format!("{:>8.2}  ", param.value)),
            Span::styled(
                format!("{:.0}%", param.score * 100.0),
                Style::default().fg(band_color(QualityBand::from_score(param.score))),
            ),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled(
            "  Bloom Risk: ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "{:.1}% ({})",
                hab_report.score * 100.0,
                hab_report.level.as_str()
            ),
            Style::default().fg(match hab_report.level {
                marine_guardian::hab::RiskLevel::Low => Color::Green,
                marine_guardian::hab::RiskLevel::Moderate => Color::Yellow,
                marine_guardian::hab::RiskLevel::High => Color::Yellow,
                marine_guardian::hab::RiskLevel::Critical => Color::Red,
            }),
        ),
    ]));

    content.push(Line::from(""));
    content.push(Line::from("  ─────────────────────────────────────"));
    content.push(Line::from(""));
    content.push(Line::from(vec![Span::styled(
        "  PROVENANCE",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )]));
    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled(
            "  Source File: ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(&obs.source_file, Style::default().fg(Color::Green)),
    ]));
    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled(
            "  Line Number: ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(&obs.line_number, Style::default().fg(Color::Green)),
    ]));

    if !obs.notes.is_empty() {
        content.push(Line::from(""));
        content.push(Line::from("  ─────────────────────────────────────"));
        content.push(Line::from(""));
        content.push(Line::from(vec![Span::styled(
            "  NOTES",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )]));
        content.push(Line::from(""));
        content.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                wrap_text(&obs.notes, 35),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![Span::styled(
        "  Press Enter to close",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )]));

    let detail_panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Observation Details "),
    );

    f.render_widget(detail_panel, area);
}

fn wrap_text(text: &str, width: usize) -> String {
    if text.len() <= width {
        text.to_string()
    } else {
        let mut result = String::new();
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut current_line = String::new();

        for word in words {
            if current_line.len() + word.len() + 1 <= width {
                if !current_line.is_empty() {
                    current_line.push(' ');
                }
                current_line.push_str(word);
            } else {
                if !result.is_empty() {
                    result.push_str("\n  ");
                }
                result.push_str(&current_line);
                current_line = word.to_string();
            }
        }

        if !current_line.is_empty() {
            if !result.is_empty() {
                result.push_str("\n  ");
            }
            result.push_str(&current_line);
        }

        result
    }
}
