//! Battery / fuel gauge with low-level highlighting.

use ratatui::style::Style;
use ratatui::widgets::Gauge;

use fleetwatch_core::format::{format_level, is_low_level};

use crate::theme;

/// A one-line gauge for a percentage reading. Missing readings render an
/// empty gauge labelled `N/A`.
pub fn level_gauge(title: &str, level: Option<u8>) -> Gauge<'static> {
    let low = is_low_level(level);
    let color = if low { theme::ERROR_RED } else { theme::LIVE_GREEN };

    Gauge::default()
        .gauge_style(Style::default().fg(color).bg(theme::BG_HIGHLIGHT))
        .percent(u16::from(level.unwrap_or(0)))
        .label(format!("{title} {}", format_level(level)))
        .style(theme::level_style(low))
}
