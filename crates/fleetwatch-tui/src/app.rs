//! Application core: event loop, action dispatch, intents, overlays.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use fleetwatch_core::Controller;

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Event, EventReader, Rates};
use crate::screens::dashboard::DashboardScreen;
use crate::screens::vehicle_detail::centered;
use crate::theme;
use crate::tui::Tui;

/// Top-level application state and event loop.
pub struct App {
    controller: Controller,
    dashboard: DashboardScreen,
    /// Whether the app should keep running.
    running: bool,
    /// Help overlay visibility.
    help_visible: bool,
    /// Last intent failure, shown in the status bar until the next key.
    notice: Option<String>,
    /// Action sender: components and tasks dispatch actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver: main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            dashboard: DashboardScreen::new(),
            running: true,
            help_visible: false,
            notice: None,
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::enter()?;

        let cancel = CancellationToken::new();
        let bridge = tokio::spawn(spawn_data_bridge(
            self.controller.clone(),
            self.action_tx.clone(),
            cancel.clone(),
        ));

        let mut events = EventReader::spawn(Rates::default());

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        cancel.cancel();
        if let Err(e) = bridge.await {
            warn!(error = %e, "data bridge task failed");
        }
        drop(tui);
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// dashboard keys are delegated to the screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        self.notice = None;

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (_, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            _ => {}
        }

        self.dashboard.handle_key_event(key)
    }

    /// Process a single action: update app state, start intents, and
    /// propagate to the dashboard.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::Notify(message) => self.notice = Some(message.clone()),
            Action::Render | Action::Resize(..) => {}
            intent if intent.is_intent() => self.dispatch_intent(intent.clone()),
            other => {
                if let Some(follow_up) = self.dashboard.update(other)? {
                    self.action_tx.send(follow_up)?;
                }
            }
        }
        Ok(())
    }

    /// Hand an intent to the controller without blocking the event loop.
    /// Fetch failures reach the dashboard through the store; only a
    /// refused intent comes back here.
    fn dispatch_intent(&self, intent: Action) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        debug!(?intent, "dispatching intent");

        tokio::spawn(async move {
            let result = match intent {
                Action::SelectFilter(filter) => controller.set_filter(filter).await,
                Action::OpenVehicle(id) => controller.open_vehicle(&id).await.map(|_| ()),
                Action::CloseVehicle => controller.close_vehicle().await,
                Action::RefreshVehicles => controller.refresh_vehicles().await.map(|_| ()),
                Action::RefreshStatistics => controller.refresh_statistics().await.map(|_| ()),
                _ => Ok(()),
            };
            if let Err(e) = result {
                warn!(error = %e, "intent refused");
                let _ = tx.send(Action::Notify(e.to_string()));
            }
        });
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        self.dashboard.render(frame, content);
        self.render_status_bar(frame, status);

        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::raw(" "),
            Span::styled(
                self.controller.config().api_url.to_string(),
                theme::key_hint(),
            ),
            Span::styled(" │ ? help  q quit", theme::key_hint()),
        ];
        if let Some(ref notice) = self.notice {
            spans.push(Span::styled(
                format!(" │ {notice}"),
                Style::default().fg(theme::WARNING_AMBER),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_area = centered(area, 48, 16);
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let row = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {keys:<10}"), theme::key_hint_key()),
            Span::styled(what, theme::key_hint()),
        ])
    };

    let help_text = vec![
        Line::from(""),
        row("1-4", "Filter by status"),
        row("Tab", "Next filter"),
        row("j/k ↑/↓", "Move up/down"),
        row("g/G", "Top / bottom"),
        row("Enter", "Vehicle details"),
        row("Esc", "Close details"),
        row("r", "Refresh vehicles"),
        row("s", "Refresh statistics"),
        row("?", "This help"),
        row("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled("          Esc or ? to close", theme::key_hint())),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}
