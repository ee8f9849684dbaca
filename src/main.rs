use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{info, warn};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Clear, Dataset as ChartDataset,
    GraphType, Paragraph, Row, Table,
};

use ipl_terminal::analysis::{self, Mode, RenderOptions, Selection, TableView, View};
use ipl_terminal::chart::{BarChartSpec, ChartSpec, DualAxisSpec, LineChartSpec, Palette, ProportionSpec};
use ipl_terminal::config::AppConfig;
use ipl_terminal::dataset::{Dataset, DatasetCache};
use ipl_terminal::logging;
use ipl_terminal::logo::LogoAsset;
use ipl_terminal::state::{AppState, Focus, PickerOptions};

const TITLE: &str = "IPL Cricket Analysis Dashboard";
const SIDEBAR_TITLE: &str = "IPL Analysis Dashboard";
const TABLE_PAGE: usize = 10;

struct App {
    config: AppConfig,
    render_opts: RenderOptions,
    cache: DatasetCache,
    dataset: Arc<Dataset>,
    logo: LogoAsset,
    state: AppState,
    shown: Option<Selection>,
    view: Option<View>,
    stale: bool,
    should_quit: bool,
}

impl App {
    fn new(config: AppConfig, cache: DatasetCache, dataset: Arc<Dataset>) -> Self {
        let mut state = AppState::new(PickerOptions::from_dataset(&dataset));
        state.push_log(format!(
            "[INFO] Loaded {} records from {}",
            dataset.len(),
            config.dataset_path.display()
        ));
        Self {
            render_opts: config.render_options(),
            logo: LogoAsset::new(config.logo_path.clone()),
            config,
            cache,
            dataset,
            state,
            shown: None,
            view: None,
            stale: true,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Tab | KeyCode::BackTab => self.state.toggle_focus(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char(c @ '1'..='5') => {
                let idx = c as usize - '1' as usize;
                self.state.set_mode(Mode::ALL[idx]);
            }
            KeyCode::PageDown => {
                let total = self.table_rows();
                self.state.scroll_table_down(total, TABLE_PAGE);
            }
            KeyCode::PageUp => self.state.scroll_table_up(TABLE_PAGE),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reload(),
            _ => {}
        }
    }

    fn table_rows(&self) -> usize {
        self.view
            .as_ref()
            .and_then(|v| v.table.as_ref())
            .map(|t| t.rows.len())
            .unwrap_or_default()
    }

    fn reload(&mut self) {
        match self.cache.get_or_load(&self.config.dataset_path) {
            Ok(dataset) if Arc::ptr_eq(&dataset, &self.dataset) => {
                self.state.push_log("[INFO] Dataset unchanged");
            }
            Ok(dataset) => {
                info!("dataset reloaded: {} records", dataset.len());
                self.state
                    .replace_options(PickerOptions::from_dataset(&dataset));
                self.state
                    .push_log(format!("[INFO] Reloaded {} records", dataset.len()));
                self.dataset = dataset;
                self.stale = true;
            }
            Err(err) => {
                warn!("dataset reload failed: {err}");
                self.state.push_log(format!("[WARN] Reload failed: {err}"));
            }
        }
    }

    /// Recomputes the view only when the selection or dataset changed.
    fn sync_view(&mut self) {
        let selection = self.state.selection();
        if !self.stale && selection == self.shown {
            return;
        }
        self.view = selection
            .as_ref()
            .map(|sel| analysis::render(&self.dataset, sel, &self.render_opts));
        if let Some(sel) = &selection {
            info!("rendered {}", sel.mode().label());
        }
        self.shown = selection;
        self.stale = false;
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = AppConfig::from_env();
    logging::init_file_logger(config.log_file.as_deref())?;

    let mut cache = DatasetCache::new();
    let dataset = cache
        .get_or_load(&config.dataset_path)
        .with_context(|| format!("load dataset {}", config.dataset_path.display()))?;
    let mut app = App::new(config, cache, dataset);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        app.sync_view();
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let logo = app.logo.get();
    let header_height = logo.height().clamp(2, 6) as u16 + 1;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(40)])
        .split(chunks[1]);
    render_sidebar(frame, body[0], &app.state);
    render_main(frame, body[1], app);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let logo = app.logo.get();
    let width = logo.width();
    let source = app
        .dataset
        .source()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    let info = [
        TITLE.to_string(),
        format!(
            "{} records | {} | loaded {}",
            app.dataset.len(),
            source,
            app.dataset.loaded_at().format("%H:%M:%S")
        ),
    ];

    let rows = logo.height().max(info.len());
    (0..rows)
        .map(|i| {
            let art = logo.lines().get(i).map(String::as_str).unwrap_or("");
            let text = info.get(i).map(String::as_str).unwrap_or("");
            format!("{art:<width$}  {text}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn footer_text(state: &AppState) -> String {
    match state.focus {
        Focus::Menu => {
            "j/k/↑/↓ Mode | 1-5 Jump | Tab Picker | PgUp/PgDn Table | r Reload | ? Help | q Quit"
                .to_string()
        }
        Focus::Picker => {
            "j/k/↑/↓ Pick | Tab Menu | PgUp/PgDn Table | r Reload | ? Help | q Quit".to_string()
        }
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title(SIDEBAR_TITLE).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(Mode::ALL.len() as u16 + 2), Constraint::Min(1)])
        .split(inner);

    let menu_lines: Vec<Line> = Mode::ALL
        .iter()
        .enumerate()
        .map(|(idx, mode)| {
            let selected = *mode == state.mode;
            let prefix = if selected { "> " } else { "  " };
            let style = if selected && state.focus == Focus::Menu {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else if selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::styled(format!("{prefix}{} {}", idx + 1, mode.label()), style)
        })
        .collect();
    let menu = Paragraph::new(menu_lines)
        .block(Block::default().title("Choose Analysis").borders(Borders::ALL));
    frame.render_widget(menu, sections[0]);

    let Some(kind) = state.mode.picker() else {
        let note = Paragraph::new("No selection needed")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(note, sections[1]);
        return;
    };

    let picker_block = Block::default().title(kind.label()).borders(Borders::ALL);
    let picker_area = picker_block.inner(sections[1]);
    frame.render_widget(picker_block, sections[1]);

    let values = state.picker_values();
    if values.is_empty() {
        let empty = Paragraph::new("No values available").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, picker_area);
        return;
    }

    let (start, end) = visible_range(
        state.picker_selected,
        values.len(),
        picker_area.height as usize,
    );
    let lines: Vec<Line> = (start..end)
        .map(|idx| {
            let selected = idx == state.picker_selected;
            let prefix = if selected { "> " } else { "  " };
            let style = if selected && state.focus == Focus::Picker {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else if selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::styled(format!("{prefix}{}", values[idx]), style)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), picker_area);
}

fn render_main(frame: &mut Frame, area: Rect, app: &App) {
    let Some(view) = &app.view else {
        let label = app
            .state
            .mode
            .picker()
            .map(|kind| kind.label())
            .unwrap_or("selection");
        let empty = Paragraph::new(format!("No values available for {label}"))
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(app.state.mode.label()).borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(45),
            Constraint::Min(8),
        ])
        .split(area);

    let summary = Paragraph::new(Line::styled(
        view.summary.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().title(view.subheader.clone()).borders(Borders::ALL));
    frame.render_widget(summary, rows[0]);

    match &view.table {
        Some(table) => render_table(frame, rows[1], table, app.state.table_scroll),
        None => {
            let empty = Paragraph::new("No table for this view")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, rows[1]);
        }
    }

    render_charts(frame, rows[2], &view.charts);
}

fn render_table(frame: &mut Frame, area: Rect, table: &TableView, scroll: usize) {
    let title = if table.rows.is_empty() {
        "Rows (0)".to_string()
    } else {
        format!(
            "Rows {}-{} of {}",
            scroll + 1,
            table.rows.len().min(scroll + area.height.saturating_sub(3) as usize),
            table.rows.len()
        )
    };
    let block = Block::default().title(title).borders(Borders::ALL);

    if table.is_empty() {
        let empty = Paragraph::new("No rows match this selection")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let widths: Vec<Constraint> = table
        .columns
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let widest = table
                .rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or_default()
                .max(name.chars().count());
            Constraint::Length(widest.min(20) as u16)
        })
        .collect();

    let header = Row::new(table.columns.iter().map(|c| Cell::from(c.clone())))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body = table
        .rows
        .iter()
        .skip(scroll)
        .map(|row| Row::new(row.iter().map(|cell| Cell::from(cell.clone()))));

    let widget = Table::new(body, widths)
        .header(header)
        .column_spacing(2)
        .block(block);
    frame.render_widget(widget, area);
}

fn render_charts(frame: &mut Frame, area: Rect, charts: &[ChartSpec]) {
    if charts.is_empty() {
        let empty = Paragraph::new("No chart")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let constraints: Vec<Constraint> = charts
        .iter()
        .map(|_| Constraint::Ratio(1, charts.len() as u32))
        .collect();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (spec, col) in charts.iter().zip(cols.iter()) {
        let block = Block::default()
            .title(spec.title().to_string())
            .borders(Borders::ALL);
        if spec.is_empty() {
            let empty = Paragraph::new("No data")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, *col);
            continue;
        }
        match spec {
            ChartSpec::Bar(bar) => render_bar_chart(frame, *col, bar, block),
            ChartSpec::Proportion(prop) => render_proportion(frame, *col, prop, block),
            ChartSpec::Line(line) => render_line_chart(frame, *col, line, block),
            ChartSpec::DualAxis(dual) => render_dual_axis(frame, *col, dual, block),
        }
    }
}

fn palette_color(palette: Palette) -> Color {
    match palette {
        Palette::Blue => Color::Blue,
        Palette::Green => Color::Green,
        Palette::Neutral => Color::Cyan,
    }
}

fn render_bar_chart(frame: &mut Frame, area: Rect, spec: &BarChartSpec, block: Block) {
    let style = Style::default().fg(palette_color(spec.palette));
    let bars: Vec<Bar> = spec
        .bars
        .iter()
        .map(|b| {
            Bar::default()
                .value(b.value.max(0.0).round() as u64)
                .label(Line::from(b.label.clone()))
                .text_value(format!("{:.0}", b.value))
                .style(style)
        })
        .collect();

    let inner_width = block.inner(area).width as usize;
    let slot = (inner_width / bars.len().max(1)).max(2);
    let bar_width = (slot - 1).clamp(1, 8) as u16;

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(spec.max_value().max(1.0).round() as u64);
    frame.render_widget(chart, area);
}

fn render_proportion(frame: &mut Frame, area: Rect, spec: &ProportionSpec, block: Block) {
    let colors = [
        Color::Blue,
        Color::Yellow,
        Color::Green,
        Color::Magenta,
        Color::Cyan,
        Color::Red,
    ];
    let bars: Vec<Bar> = spec
        .slices
        .iter()
        .zip(spec.shares())
        .enumerate()
        .map(|(idx, (slice, share))| {
            Bar::default()
                .value((share * 10.0).round() as u64)
                .label(Line::from(slice.label.clone()))
                .text_value(format!("{share:.1}% ({:.0})", slice.value))
                .style(Style::default().fg(colors[idx % colors.len()]))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(1000);
    frame.render_widget(chart, area);
}

fn render_line_chart(frame: &mut Frame, area: Rect, spec: &LineChartSpec, block: Block) {
    let colors = [Color::Blue, Color::Green, Color::Yellow];
    let points: Vec<Vec<(f64, f64)>> = spec
        .series
        .iter()
        .map(|s| {
            s.values
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64, *v))
                .collect()
        })
        .collect();

    let datasets: Vec<ChartDataset> = spec
        .series
        .iter()
        .zip(points.iter())
        .enumerate()
        .map(|(idx, (series, data))| {
            ChartDataset::default()
                .name(series.name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(colors[idx % colors.len()]))
                .data(data)
        })
        .collect();

    let y_max = spec.max_value().max(1.0) * 1.1;
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(spec.x_label.clone())
                .bounds(x_bounds(spec.x_labels.len()))
                .labels(x_axis_labels(&spec.x_labels)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max])
                .labels(vec![Span::raw("0"), Span::raw(format!("{:.0}", y_max))]),
        );
    frame.render_widget(chart, area);
}

fn render_dual_axis(frame: &mut Frame, area: Rect, spec: &DualAxisSpec, block: Block) {
    let scale = spec.secondary_scale();
    let y_max = spec.bars.max_value().max(1.0) * 1.1;
    // Chart has no bar graph type; each bar is a column of half-block points.
    let plot_rows = block.inner(area).height.saturating_sub(2).max(1) as f64;
    let bars = bar_columns(&spec.bars.values, y_max / (plot_rows * 2.0));
    let line: Vec<(f64, f64)> = spec
        .line
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, v * scale))
        .collect();

    let datasets = vec![
        ChartDataset::default()
            .name(spec.primary_label.clone())
            .marker(symbols::Marker::HalfBlock)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Blue))
            .data(&bars),
        ChartDataset::default()
            .name(spec.secondary_label.clone())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&line),
    ];

    let y_labels = [0.0, y_max / 2.0, y_max]
        .iter()
        .map(|v| Span::raw(format!("{:.0} | {:.0}", v, v / scale)))
        .collect::<Vec<_>>();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(spec.x_label.clone())
                .bounds(x_bounds(spec.x_labels.len()))
                .labels(x_axis_labels(&spec.x_labels)),
        )
        .y_axis(
            Axis::default()
                .title(format!("{} | {}", spec.primary_label, spec.secondary_label))
                .bounds([0.0, y_max])
                .labels(y_labels),
        );
    frame.render_widget(chart, area);
}

fn bar_columns(values: &[f64], step: f64) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    for (i, value) in values.iter().enumerate() {
        let top = if value.is_finite() { value.max(0.0) } else { 0.0 };
        let mut y = 0.0;
        while y < top {
            points.push((i as f64, y));
            y += step;
        }
        points.push((i as f64, top));
    }
    points
}

fn x_bounds(points: usize) -> [f64; 2] {
    [0.0, points.saturating_sub(1).max(1) as f64]
}

fn x_axis_labels(labels: &[String]) -> Vec<Span<'static>> {
    match labels {
        [] => Vec::new(),
        [only] => vec![Span::raw(only.clone())],
        [first, .., last] if labels.len() > 2 => vec![
            Span::raw(first.clone()),
            Span::raw(labels[labels.len() / 2].clone()),
            Span::raw(last.clone()),
        ],
        [first, last] => vec![Span::raw(first.clone()), Span::raw(last.clone())],
        _ => Vec::new(),
    }
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(2);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "IPL Terminal - Help",
        "",
        "Sidebar:",
        "  Tab          Switch menu / picker",
        "  j/k or ↑/↓   Move in focused list",
        "  1-5          Jump to analysis",
        "",
        "Main panel:",
        "  PgDn / PgUp  Scroll table",
        "",
        "Global:",
        "  r            Reload dataset if it changed",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
