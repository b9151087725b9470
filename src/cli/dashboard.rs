use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row,
        Table,
    },
    Frame,
};

use crate::cli::{load_dataset, warn_if_unknown};
use crate::dataset::CostDataset;
use crate::error::Result;
use crate::fmt::{compact, number};
use crate::query::{self, CategoryFilter, Report};
use crate::tui::{
    money_span, run_view, View, ViewAction, BAR_STYLE, FOOTER_STYLE, HEADER_STYLE, SELECTED_STYLE,
};

const PAGE_SIZE: usize = 20;
const SIDEBAR_WIDTH: u16 = 30;
/// Share of the right pane the chart may take before it scrolls.
const CHART_MAX_PERCENT: u16 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Filters,
    Chart,
    Table,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Self::Filters => Self::Chart,
            Self::Chart => Self::Table,
            Self::Table => Self::Filters,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Filters => Self::Table,
            Self::Chart => Self::Filters,
            Self::Table => Self::Chart,
        }
    }
}

pub struct Dashboard<'a> {
    dataset: &'a CostDataset,
    source: String,
    options: Vec<CategoryFilter>,
    /// Index into `options`; `None` when the active filter is not one of them.
    selection: Option<usize>,
    report: Report<'a>,
    focus: Focus,
    offset: usize,
    visible_rows: usize,
    /// First breakdown entry drawn in the chart.
    chart_offset: usize,
    chart_rows: usize,
    list_state: ListState,
}

impl<'a> Dashboard<'a> {
    pub fn new(dataset: &'a CostDataset, source: String) -> Self {
        let options = dataset.filter_options();
        let report = query::report(dataset, &CategoryFilter::All);
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            dataset,
            source,
            options,
            selection: Some(0),
            report,
            focus: Focus::Filters,
            offset: 0,
            visible_rows: PAGE_SIZE,
            chart_offset: 0,
            chart_rows: PAGE_SIZE,
            list_state,
        }
    }

    /// Show `filter`, highlighting it in the sidebar when it is a known option.
    pub fn select_filter(&mut self, filter: &CategoryFilter) {
        match self.options.iter().position(|o| o == filter) {
            Some(idx) => self.select(idx),
            None => {
                self.selection = None;
                self.list_state.select(None);
                self.report = query::report(self.dataset, filter);
                self.offset = 0;
                self.chart_offset = 0;
            }
        }
    }

    fn select(&mut self, idx: usize) {
        let idx = idx.min(self.options.len().saturating_sub(1));
        if self.selection == Some(idx) {
            return;
        }
        self.selection = Some(idx);
        self.list_state.select(Some(idx));
        self.report = query::report(self.dataset, &self.options[idx]);
        self.offset = 0;
        self.chart_offset = 0;
    }

    fn select_next(&mut self) {
        self.select(self.selection.map_or(0, |i| i + 1));
    }

    fn select_prev(&mut self) {
        self.select(self.selection.map_or(0, |i| i.saturating_sub(1)));
    }

    /// Largest table offset that still fills the visible rows.
    fn max_offset(&self) -> usize {
        self.report.count().saturating_sub(self.visible_rows)
    }

    fn max_chart_offset(&self) -> usize {
        self.report
            .aggregate
            .breakdown
            .len()
            .saturating_sub(self.chart_rows)
    }

    fn scroll_down(&mut self, n: usize) {
        if self.focus == Focus::Chart {
            self.chart_offset = (self.chart_offset + n).min(self.max_chart_offset());
        } else {
            self.offset = (self.offset + n).min(self.max_offset());
        }
    }

    fn scroll_up(&mut self, n: usize) {
        if self.focus == Focus::Chart {
            self.chart_offset = self.chart_offset.saturating_sub(n);
        } else {
            self.offset = self.offset.saturating_sub(n);
        }
    }

    fn scroll_to_start(&mut self) {
        if self.focus == Focus::Chart {
            self.chart_offset = 0;
        } else {
            self.offset = 0;
        }
    }

    fn scroll_to_end(&mut self) {
        if self.focus == Focus::Chart {
            self.chart_offset = self.max_chart_offset();
        } else {
            self.offset = self.max_offset();
        }
    }

    /// Chart height: one row per superintendence plus borders, capped to a share of `area`.
    fn chart_height(&self, area: Rect) -> u16 {
        let wanted = self.report.aggregate.breakdown.len().max(1) + 2;
        let cap = (area.height as usize * CHART_MAX_PERCENT as usize / 100).max(3);
        wanted.min(cap) as u16
    }

    fn draw_sidebar(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .options
            .iter()
            .map(|o| ListItem::new(o.to_string()))
            .collect();
        let border_style = if self.focus == Focus::Filters {
            HEADER_STYLE
        } else {
            FOOTER_STYLE
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Planning group")
                    .borders(Borders::ALL)
                    .border_style(border_style),
            )
            .highlight_symbol("> ")
            .highlight_style(SELECTED_STYLE);
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn draw_chart(&mut self, frame: &mut Frame, area: Rect) {
        let breakdown = &self.report.aggregate.breakdown;
        self.chart_rows = (area.height as usize).saturating_sub(2).max(1);
        self.chart_offset = self
            .chart_offset
            .min(breakdown.len().saturating_sub(self.chart_rows));

        let title = if breakdown.len() > self.chart_rows {
            let end = (self.chart_offset + self.chart_rows).min(breakdown.len());
            format!(
                " Costs by superintendence ({}-{end} of {})",
                self.chart_offset + 1,
                breakdown.len()
            )
        } else {
            " Costs by superintendence".to_string()
        };
        let border_style = if self.focus == Focus::Chart {
            HEADER_STYLE
        } else {
            FOOTER_STYLE
        };
        let block = Block::default()
            .title(title)
            .title_style(Style::default().add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(border_style);

        if self.report.records.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(" No records for this selection.", FOOTER_STYLE))
                    .block(block),
                area,
            );
            return;
        }

        // width over every entry so labels stay put while scrolling
        let label_width = breakdown
            .iter()
            .map(|g| g.name.chars().count())
            .max()
            .unwrap_or(0);
        let bars: Vec<Bar> = breakdown
            .iter()
            .skip(self.chart_offset)
            .take(self.chart_rows)
            .map(|g| {
                Bar::default()
                    .value(g.total.max(0.0).round() as u64)
                    .text_value(compact(g.total))
                    .label(Line::from(format!("{:<label_width$}", g.name)))
                    .style(BAR_STYLE)
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }

    fn draw_table(&mut self, frame: &mut Frame, area: Rect) {
        // borders plus header row
        self.visible_rows = (area.height as usize).saturating_sub(3).max(1);

        let rows: Vec<Row> = self
            .report
            .records
            .iter()
            .skip(self.offset)
            .take(self.visible_rows)
            .map(|r| Row::new(r.cells.iter().map(|c| Cell::from(c.as_str()))))
            .collect();
        let widths = vec![Constraint::Fill(1); self.dataset.headers().len().max(1)];
        let border_style = if self.focus == Focus::Table {
            HEADER_STYLE
        } else {
            FOOTER_STYLE
        };

        let table = Table::new(rows, widths)
            .header(Row::new(self.dataset.headers().iter().map(|h| h.as_str())).style(HEADER_STYLE))
            .column_spacing(1)
            .block(
                Block::default()
                    .title(" Records")
                    .borders(Borders::ALL)
                    .border_style(border_style),
            );
        frame.render_widget(table, area);
    }
}

impl View for Dashboard<'_> {
    fn draw(&mut self, frame: &mut Frame) {
        let [header_area, sep_area, metric_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" Cost analysis: subtotal and distribution | {}", self.source),
                HEADER_STYLE,
            )),
            header_area,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                "\u{2501}".repeat(sep_area.width as usize),
                FOOTER_STYLE,
            )),
            sep_area,
        );

        let metric = vec![
            Line::from(vec![
                Span::styled(
                    format!(" Cost subtotal for {}: ", self.report.filter),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                money_span(self.report.aggregate.total),
            ]),
            Line::from(format!(" Total records: {}", number(self.report.count()))),
        ];
        frame.render_widget(Paragraph::new(metric), metric_area);

        let [sidebar_area, main_area] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)])
                .areas(body_area);
        let [chart_area, table_area] = Layout::vertical([
            Constraint::Length(self.chart_height(main_area)),
            Constraint::Fill(1),
        ])
        .areas(main_area);

        self.draw_sidebar(frame, sidebar_area);
        self.draw_chart(frame, chart_area);
        self.draw_table(frame, table_area);

        let count = self.report.count();
        let end = (self.offset + self.visible_rows).min(count);
        let start = if count == 0 { 0 } else { self.offset + 1 };
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(
                    " Rows {start}-{end} of {count} | Tab switch panel | \u{2191}\u{2193} move | PgUp/PgDn | Home/End | q quit"
                ),
                FOOTER_STYLE,
            )),
            footer_area,
        );
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Close,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Down | KeyCode::Char('j') => match self.focus {
                Focus::Filters => self.select_next(),
                Focus::Chart | Focus::Table => self.scroll_down(1),
            },
            KeyCode::Up | KeyCode::Char('k') => match self.focus {
                Focus::Filters => self.select_prev(),
                Focus::Chart | Focus::Table => self.scroll_up(1),
            },
            KeyCode::PageDown => self.scroll_down(PAGE_SIZE),
            KeyCode::PageUp => self.scroll_up(PAGE_SIZE),
            KeyCode::Home => self.scroll_to_start(),
            KeyCode::End => self.scroll_to_end(),
            _ => {}
        }
        ViewAction::Continue
    }
}

pub fn run(file: Option<&str>, group: Option<String>) -> Result<()> {
    let (dataset, path) = load_dataset(file)?;
    let filter = CategoryFilter::from_selection(group.as_deref());
    warn_if_unknown(&dataset, &filter);

    let mut dashboard = Dashboard::new(&dataset, path.display().to_string());
    dashboard.select_filter(&filter);
    run_view(&mut dashboard)
}
