//! Fleet dashboard: live banner, filter bar, statistics and update panels,
//! vehicle table, and the vehicle detail popup.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};

use fleetwatch_core::format::{
    Countdown, format_clock, format_countdown, format_level, format_speed, is_low_level,
};
use fleetwatch_core::{FilterStatus, FleetState, Vehicle};

use crate::action::Action;
use crate::component::Component;
use crate::screens::vehicle_detail;
use crate::theme;
use crate::widgets::status_badge::status_span;

pub struct DashboardScreen {
    state: Arc<FleetState>,
    /// `filtered_vehicles()` of the current state, cached per update.
    visible: Vec<Arc<Vehicle>>,
    table_state: TableState,
    countdown: Countdown,
    seen_update: Option<DateTime<Utc>>,
}

impl Default for DashboardScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            state: Arc::new(FleetState::default()),
            visible: Vec::new(),
            table_state: TableState::default(),
            countdown: Countdown::default(),
            seen_update: None,
        }
    }

    fn apply_state(&mut self, next: Arc<FleetState>) {
        let filter_changed = next.active_filter() != self.state.active_filter();
        let selected_id = self.selected_row().map(|v| v.id.clone());

        self.visible = next.filtered_vehicles();

        // Keep the cursor on the same vehicle across list refreshes.
        let position = if filter_changed {
            None
        } else {
            selected_id.and_then(|id| self.visible.iter().position(|v| v.id == id))
        };
        let fallback = self
            .table_state
            .selected()
            .map_or(0, |i| i.min(self.visible.len().saturating_sub(1)));
        self.table_state.select(if self.visible.is_empty() {
            None
        } else {
            Some(position.unwrap_or(if filter_changed { 0 } else { fallback }))
        });

        if next.last_update().is_some() && next.last_update() != self.seen_update {
            self.seen_update = next.last_update();
            self.countdown.reset();
        }

        self.state = next;
    }

    fn selected_row(&self) -> Option<&Arc<Vehicle>> {
        self.table_state.selected().and_then(|i| self.visible.get(i))
    }

    fn move_selection(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() - 1;
        let current = self.table_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        self.table_state.select(Some(next));
    }

    fn detail_open(&self) -> bool {
        self.state.selected_vehicle().is_some()
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render_banner(&self, frame: &mut Frame, area: Rect) {
        let live = if self.state.is_connected() {
            Span::styled("● Live Updates Active", Style::default().fg(theme::LIVE_GREEN))
        } else {
            Span::styled("○ Offline Mode", Style::default().fg(theme::WARNING_AMBER))
        };
        let mut spans = vec![
            Span::styled(" Fleet Tracking Dashboard  ", theme::title_style()),
            live,
        ];
        if self.state.is_loading() {
            spans.push(Span::styled("  ⟳ loading", theme::key_hint()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_filter_bar(&self, frame: &mut Frame, area: Rect) {
        let active = self.state.active_filter();
        let stats = self.state.statistics();

        let mut spans = Vec::with_capacity(FilterStatus::ALL.len() * 2);
        for (i, filter) in FilterStatus::ALL.iter().enumerate() {
            let count = stats.map_or_else(|| "-".into(), |s| s.count_for(*filter).to_string());
            let style = if *filter == active {
                theme::tab_active()
            } else {
                theme::tab_inactive()
            };
            spans.push(Span::styled(format!("{}", i + 1), theme::key_hint_key()));
            spans.push(Span::styled(
                format!(" {} ({count})   ", filter.label()),
                style,
            ));
        }

        let block = panel(" Status Filter ", false);
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn render_panels(&self, frame: &mut Frame, area: Rect) {
        let [stats_area, update_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(area);

        let stats_lines = match self.state.statistics() {
            Some(s) => vec![
                metric_line("Total Vehicles", s.total.to_string()),
                metric_line("Average Speed", format_speed(s.average_speed)),
                metric_line("Moving", s.moving().to_string()),
                metric_line("Last Update", self.last_update_clock()),
            ],
            None => vec![Line::from(Span::styled(
                "Waiting for statistics…",
                theme::key_hint(),
            ))],
        };
        frame.render_widget(
            Paragraph::new(stats_lines).block(panel(" Fleet Statistics ", false)),
            stats_area,
        );

        let push = if self.state.is_connected() {
            "connected"
        } else {
            "offline"
        };
        let update_lines = vec![
            metric_line(
                "Next update in",
                format_countdown(self.countdown.remaining()),
            ),
            metric_line("Push channel", push.into()),
            metric_line(
                "Showing",
                format!("{} of {}", self.visible.len(), self.state.vehicle_count()),
            ),
        ];
        frame.render_widget(
            Paragraph::new(update_lines).block(panel(" Update Status ", false)),
            update_area,
        );
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let title = format!(" Vehicles · {} ", self.state.active_filter().label());
        let block = panel(&title, !self.detail_open());

        if self.visible.is_empty() {
            let text = if self.state.is_loading() {
                "Loading vehicles…"
            } else {
                "No vehicles found"
            };
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .style(theme::key_hint()),
                inner,
            );
            return;
        }

        let header = Row::new(
            [
                "Vehicle",
                "Driver",
                "Status",
                "Speed",
                "Destination",
                "Battery",
                "Fuel",
                "Updated",
            ]
            .map(Cell::from),
        )
        .style(theme::table_header());

        let rows = self.visible.iter().map(|v| {
            Row::new(vec![
                Cell::from(v.vehicle_number.clone()),
                Cell::from(v.driver_name.clone()),
                Cell::from(status_span(v.status)),
                Cell::from(format_speed(v.speed)),
                Cell::from(v.destination.clone()),
                Cell::from(Span::styled(
                    format_level(v.battery_level),
                    theme::level_style(is_low_level(v.battery_level)),
                )),
                Cell::from(Span::styled(
                    format_level(v.fuel_level),
                    theme::level_style(is_low_level(v.fuel_level)),
                )),
                Cell::from(format_clock(&v.last_updated.with_timezone(&Local))),
            ])
            .style(theme::table_row())
        });

        let widths = [
            Constraint::Length(10),
            Constraint::Length(18),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Min(12),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(8),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("▶ ");

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let line = match self.state.error() {
            Some(error) => Line::from(Span::styled(
                format!(" ⚠ {error}"),
                Style::default().fg(theme::ERROR_RED),
            )),
            None => Line::from(vec![
                Span::styled(" 1-4", theme::key_hint_key()),
                Span::styled(" filter  ", theme::key_hint()),
                Span::styled("Enter", theme::key_hint_key()),
                Span::styled(" details  ", theme::key_hint()),
                Span::styled("r", theme::key_hint_key()),
                Span::styled(" refresh  ", theme::key_hint()),
                Span::styled("s", theme::key_hint_key()),
                Span::styled(" stats", theme::key_hint()),
            ]),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn last_update_clock(&self) -> String {
        self.state.last_update().map_or_else(
            || "--:--".into(),
            |at| format_clock(&at.with_timezone(&Local)),
        )
    }
}

fn panel(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .title(title.to_owned())
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        })
}

fn metric_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<16}"), theme::key_hint()),
        Span::styled(value, theme::metric_value()),
    ])
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.detail_open() {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Enter => Some(Action::CloseVehicle),
                _ => None,
            });
        }

        let action = match key.code {
            KeyCode::Char(c @ '1'..='4') => c
                .to_digit(10)
                .and_then(|d| usize::try_from(d).ok())
                .and_then(|d| d.checked_sub(1))
                .and_then(|i| FilterStatus::ALL.get(i))
                .map(|f| Action::SelectFilter(*f)),
            KeyCode::Tab => Some(Action::SelectFilter(self.state.active_filter().next())),
            KeyCode::BackTab => Some(Action::SelectFilter(self.state.active_filter().prev())),
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.move_selection(isize::MIN);
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.move_selection(isize::MAX);
                None
            }
            KeyCode::Enter => self.selected_row().map(|v| Action::OpenVehicle(v.id.clone())),
            KeyCode::Char('r') => Some(Action::RefreshVehicles),
            KeyCode::Char('s') => Some(Action::RefreshStatistics),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::StateUpdated(state) => self.apply_state(Arc::clone(state)),
            Action::Tick => {
                self.countdown.tick();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [banner, filters, panels, table, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_banner(frame, banner);
        self.render_filter_bar(frame, filters);
        self.render_panels(frame, panels);
        self.render_table(frame, table);
        self.render_footer(frame, footer);

        if let Some(vehicle) = self.state.selected_vehicle() {
            vehicle_detail::render(frame, area, vehicle);
        }
    }
}
