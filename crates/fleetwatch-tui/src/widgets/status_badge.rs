//! Vehicle status badge: colored dot plus label.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use fleetwatch_core::VehicleStatus;

use crate::theme;

/// Returns a styled `Span` with the status dot and label in status color.
pub fn status_span(status: VehicleStatus) -> Span<'static> {
    Span::styled(
        format!("{} {}", status_char(status), status.label()),
        Style::default()
            .fg(theme::status_color(status))
            .add_modifier(Modifier::BOLD),
    )
}

/// Returns the status dot character without styling.
pub fn status_char(status: VehicleStatus) -> &'static str {
    match status {
        VehicleStatus::EnRoute => "●",
        VehicleStatus::Delivered => "◉",
        VehicleStatus::Idle => "○",
        VehicleStatus::Unknown => "?",
    }
}
