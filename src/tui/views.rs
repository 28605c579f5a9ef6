use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, BarChart, Block, Borders, Chart, Dataset, GraphType, Paragraph, Row, Table, Tabs,
    },
    Frame,
};

use crate::filter::{self, Filters};
use crate::metrics;
use crate::models::{Record, Series, View, ViewItem};

const SERIES_COLORS: [Color; 4] = [Color::Cyan, Color::Magenta, Color::Green, Color::Yellow];

pub struct AppState {
    pub tab: usize,
    pub regions: Vec<String>,
    pub personas: Vec<String>,
    pub region_idx: usize,
    pub persona_idx: usize,
    pub matched: usize,
    pub views: Vec<View>,
}

impl AppState {
    pub fn new(records: &[Record]) -> Self {
        let regions = filter::selector_domain(records, |r| &r.region);
        let personas = filter::selector_domain(records, |r| &r.persona);
        let mut state = Self {
            tab: 0,
            regions,
            personas,
            region_idx: 0,
            persona_idx: 0,
            matched: 0,
            views: Vec::new(),
        };
        state.refresh(records);
        state
    }

    pub fn filters(&self) -> Filters {
        Filters::from_selection(
            &self.regions[self.region_idx],
            &self.personas[self.persona_idx],
        )
    }

    /// Re-runs the filter stage and all six view builders. Called on every
    /// selector change.
    pub fn refresh(&mut self, records: &[Record]) {
        let filtered = filter::apply(records, &self.filters());
        self.matched = filtered.len();
        self.views = metrics::all_views(&filtered);
    }

    pub fn next_tab(&mut self) {
        self.tab = (self.tab + 1) % self.views.len();
    }

    pub fn prev_tab(&mut self) {
        self.tab = (self.tab + self.views.len() - 1) % self.views.len();
    }

    pub fn select_tab(&mut self, index: usize) {
        if index < self.views.len() {
            self.tab = index;
        }
    }

    pub fn cycle_region(&mut self, records: &[Record], step: isize) {
        self.region_idx = cycle(self.region_idx, self.regions.len(), step);
        self.refresh(records);
    }

    pub fn cycle_persona(&mut self, records: &[Record], step: isize) {
        self.persona_idx = cycle(self.persona_idx, self.personas.len(), step);
        self.refresh(records);
    }

    pub fn clear_filters(&mut self, records: &[Record]) {
        self.region_idx = 0;
        self.persona_idx = 0;
        self.refresh(records);
    }
}

fn cycle(current: usize, len: usize, step: isize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as isize + step).rem_euclid(len as isize) as usize
}

pub fn render(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // tabs
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    render_header(f, chunks[0], state);
    render_tabs(f, chunks[1], state);
    render_body(f, chunks[2], state);
    render_footer(f, chunks[3]);
}

fn render_header(f: &mut Frame, area: Rect, state: &AppState) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Mission App Internal Dashboard ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  Region: "),
        Span::styled(
            state.regions[state.region_idx].clone(),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  Persona: "),
        Span::styled(
            state.personas[state.persona_idx].clone(),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!("  │  {} records", state.matched)),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_tabs(f: &mut Frame, area: Rect, state: &AppState) {
    let titles: Vec<Line> = state
        .views
        .iter()
        .map(|view| Line::from(view.name))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Views "))
        .select(state.tab)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn render_body(f: &mut Frame, area: Rect, state: &AppState) {
    let view = &state.views[state.tab];
    let (tiles, panels): (Vec<&ViewItem>, Vec<&ViewItem>) = view
        .items
        .iter()
        .partition(|item| matches!(item, ViewItem::Metric { .. }));

    let tile_rows: Vec<&[&ViewItem]> = tiles.chunks(3).collect();
    let mut constraints: Vec<Constraint> = vec![Constraint::Length(3); tile_rows.len()];
    if panels.is_empty() {
        constraints.push(Constraint::Min(0));
    } else {
        constraints.extend(std::iter::repeat(Constraint::Min(8)).take(panels.len()));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (row, chunk) in tile_rows.iter().zip(chunks.iter()) {
        render_metric_row(f, *chunk, row);
    }
    for (panel, chunk) in panels.iter().zip(chunks.iter().skip(tile_rows.len())) {
        render_panel(f, *chunk, panel);
    }
}

fn render_metric_row(f: &mut Frame, area: Rect, tiles: &[&ViewItem]) {
    let constraints: Vec<Constraint> = tiles
        .iter()
        .map(|_| Constraint::Ratio(1, tiles.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (tile, chunk) in tiles.iter().zip(chunks.iter()) {
        if let ViewItem::Metric { label, value } = tile {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                value.to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(*label));
            f.render_widget(paragraph, *chunk);
        }
    }
}

fn render_panel(f: &mut Frame, area: Rect, item: &ViewItem) {
    match item {
        ViewItem::Metric { .. } => {}
        ViewItem::BarChart { title, bars } => render_bar_chart(f, area, title, bars),
        ViewItem::SeriesChart { title, series } => render_series_chart(f, area, title, series),
        ViewItem::TimeSeries { title, points } => render_time_series(f, area, title, points),
        ViewItem::Table {
            title,
            headers,
            rows,
        } => render_table(f, area, title, headers, rows),
    }
}

fn render_bar_chart(f: &mut Frame, area: Rect, title: &str, bars: &[(String, u64)]) {
    if bars.is_empty() {
        render_empty_panel(f, area, title);
        return;
    }

    let data: Vec<(&str, u64)> = bars
        .iter()
        .map(|(label, count)| (label.as_str(), *count))
        .collect();
    let chart = BarChart::default()
        .block(panel_block(title))
        .data(data.as_slice())
        .bar_width(12)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    f.render_widget(chart, area);
}

fn render_series_chart(f: &mut Frame, area: Rect, title: &str, series: &[Series]) {
    let len = series.iter().map(|s| s.values.len()).max().unwrap_or(0);
    if len == 0 {
        render_empty_panel(f, area, title);
        return;
    }

    let data: Vec<Vec<(f64, f64)>> = series
        .iter()
        .map(|s| {
            s.values
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64, *v))
                .collect()
        })
        .collect();
    let y_max = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(f64::MIN, f64::max)
        .max(1.0);

    let datasets: Vec<Dataset> = series
        .iter()
        .zip(data.iter())
        .enumerate()
        .map(|(i, (s, points))| {
            Dataset::default()
                .name(s.name)
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
                .data(points)
        })
        .collect();

    let x_max = (len.saturating_sub(1)).max(1) as f64;
    let chart = Chart::new(datasets)
        .block(panel_block(title))
        .x_axis(
            Axis::default()
                .title("record")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_max])
                .labels(vec!["1".to_string(), len.to_string()]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, y_max])
                .labels(vec!["0".to_string(), format!("{y_max:.1}")]),
        );

    f.render_widget(chart, area);
}

fn render_time_series(f: &mut Frame, area: Rect, title: &str, points: &[(String, u64)]) {
    if points.is_empty() {
        render_empty_panel(f, area, title);
        return;
    }

    let data: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, (_, count))| (i as f64, *count as f64))
        .collect();
    let y_max = data.iter().map(|p| p.1).fold(0.0, f64::max).max(1.0);
    let x_max = (points.len().saturating_sub(1)).max(1) as f64;

    let datasets = vec![Dataset::default()
        .name("new users")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(&data)];

    let first_month = points[0].0.clone();
    let last_month = points[points.len() - 1].0.clone();
    let chart = Chart::new(datasets)
        .block(panel_block(title))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_max])
                .labels(vec![first_month, last_month]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, y_max])
                .labels(vec!["0".to_string(), format!("{y_max:.0}")]),
        );

    f.render_widget(chart, area);
}

fn render_table(f: &mut Frame, area: Rect, title: &str, headers: &[&'static str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        render_empty_panel(f, area, title);
        return;
    }

    let header = Row::new(headers.to_vec())
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);
    let body: Vec<Row> = rows.iter().map(|row| Row::new(row.clone())).collect();
    let widths = vec![Constraint::Ratio(1, headers.len() as u32); headers.len()];

    let table = Table::new(body, widths).header(header).block(panel_block(title));
    f.render_widget(table, area);
}

fn render_empty_panel(f: &mut Frame, area: Rect, title: &str) {
    let paragraph = Paragraph::new("No records in this selection.")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(panel_block(title));
    f.render_widget(paragraph, area);
}

fn panel_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
}

fn render_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            " Tab/←→",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" switch view  "),
        Span::styled(
            "1-6",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" jump  "),
        Span::styled(
            "r/p",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" cycle region/persona  "),
        Span::styled(
            "c",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" clear filters  "),
        Span::styled(
            "q",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" quit"),
    ]))
    .style(Style::default().fg(Color::DarkGray));

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_record;

    fn records() -> Vec<Record> {
        let mut second = sample_record();
        second.region = "South".to_string();
        second.persona = "Volunteer".to_string();
        vec![sample_record(), second]
    }

    #[test]
    fn state_starts_unfiltered_with_all_views_built() {
        let records = records();
        let state = AppState::new(&records);

        assert_eq!(state.matched, 2);
        assert_eq!(state.views.len(), 6);
        assert_eq!(state.regions[0], "All");
        assert_eq!(state.filters(), Filters::default());
    }

    #[test]
    fn cycling_a_selector_refreshes_the_views() {
        let records = records();
        let mut state = AppState::new(&records);

        // domains are ["All", "North", "South"]; step onto "North"
        state.cycle_region(&records, 1);
        assert_eq!(state.matched, 1);
        assert_eq!(state.filters().region.as_deref(), Some("North"));

        state.clear_filters(&records);
        assert_eq!(state.matched, 2);
        assert_eq!(state.filters(), Filters::default());
    }

    #[test]
    fn selector_cycling_wraps_in_both_directions() {
        let records = records();
        let mut state = AppState::new(&records);

        state.cycle_region(&records, -1);
        assert_eq!(state.regions[state.region_idx], "South");
        state.cycle_region(&records, 1);
        assert_eq!(state.regions[state.region_idx], "All");
    }

    #[test]
    fn tab_navigation_stays_in_bounds() {
        let records = records();
        let mut state = AppState::new(&records);

        state.prev_tab();
        assert_eq!(state.tab, 5);
        state.next_tab();
        assert_eq!(state.tab, 0);
        state.select_tab(9);
        assert_eq!(state.tab, 0);
        state.select_tab(3);
        assert_eq!(state.tab, 3);
    }
}
