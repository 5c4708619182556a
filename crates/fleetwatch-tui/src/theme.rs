//! Dashboard palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

use fleetwatch_core::VehicleStatus;

// ── Status Palette ────────────────────────────────────────────────────

pub const STATUS_DELIVERED: Color = Color::Rgb(76, 175, 80); // #4CAF50
pub const STATUS_IDLE: Color = Color::Rgb(158, 158, 158); // #9E9E9E
pub const STATUS_EN_ROUTE: Color = Color::Rgb(33, 150, 243); // #2196F3

// ── Core Palette ──────────────────────────────────────────────────────

pub const ACCENT: Color = Color::Rgb(33, 150, 243); // #2196F3
pub const LIVE_GREEN: Color = Color::Rgb(76, 175, 80); // #4CAF50
pub const WARNING_AMBER: Color = Color::Rgb(255, 193, 7); // #FFC107
pub const ERROR_RED: Color = Color::Rgb(244, 67, 54); // #F44336

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

/// Color for a vehicle status badge.
pub fn status_color(status: VehicleStatus) -> Color {
    match status {
        VehicleStatus::Delivered => STATUS_DELIVERED,
        VehicleStatus::Idle => STATUS_IDLE,
        VehicleStatus::EnRoute => STATUS_EN_ROUTE,
        VehicleStatus::Unknown => DIM_WHITE,
    }
}

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(ACCENT)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(ACCENT)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Active filter chip.
pub fn tab_active() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Inactive filter chip.
pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Big numbers in the statistics panel.
pub fn metric_value() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

/// Battery/fuel reading; red and bold when low.
pub fn level_style(low: bool) -> Style {
    if low {
        Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DIM_WHITE)
    }
}
