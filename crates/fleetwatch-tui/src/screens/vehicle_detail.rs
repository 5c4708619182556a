//! Vehicle detail popup.

use chrono::{Local, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use fleetwatch_core::Vehicle;
use fleetwatch_core::format::{format_date_time, format_location, format_speed, seconds_ago};

use crate::theme;
use crate::widgets::level_gauge::level_gauge;
use crate::widgets::status_badge::status_span;

const POPUP_WIDTH: u16 = 60;
const POPUP_HEIGHT: u16 = 17;

/// Centered rect of at most `width` x `height` inside `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

pub fn render(frame: &mut Frame, area: Rect, vehicle: &Vehicle) {
    let popup = centered(area, POPUP_WIDTH, POPUP_HEIGHT);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!(" {} ", vehicle.vehicle_number))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(ratatui::style::Style::default().bg(theme::BG_DARK));

    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let [info, battery, fuel, hint] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let mut lines = vec![
        Line::from(vec![field("Status"), status_span(vehicle.status)]),
        Line::from(vec![field("Speed"), value(format_speed(vehicle.speed))]),
        Line::from(vec![field("Driver"), value(vehicle.driver_name.clone())]),
        Line::from(vec![
            field("Phone"),
            value(vehicle.driver_phone.clone().unwrap_or_else(|| "-".into())),
        ]),
        Line::from(vec![field("Destination"), value(vehicle.destination.clone())]),
        Line::from(vec![
            field("Location"),
            value(format_location(vehicle.current_location)),
        ]),
        Line::from(vec![
            field("Last Updated"),
            value(format!(
                "{} ({}s ago)",
                format_date_time(&vehicle.last_updated.with_timezone(&Local)),
                seconds_ago(vehicle.last_updated, Utc::now()).max(0)
            )),
        ]),
    ];
    if let Some(eta) = vehicle.estimated_arrival {
        lines.push(Line::from(vec![
            field("ETA"),
            value(format_date_time(&eta.with_timezone(&Local))),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), info);
    frame.render_widget(level_gauge("Battery", vehicle.battery_level), battery);
    frame.render_widget(level_gauge("Fuel", vehicle.fuel_level), fuel);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Esc", theme::key_hint_key()),
            Span::styled(" close", theme::key_hint()),
        ])),
        hint,
    );
}

fn field(label: &str) -> Span<'static> {
    Span::styled(format!("{label:<14}"), theme::key_hint())
}

fn value(text: String) -> Span<'static> {
    Span::styled(text, theme::table_row())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testing::{buffer_text, vehicle};
    use fleetwatch_core::VehicleStatus;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn centered_rect_fits_small_areas() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered(area, POPUP_WIDTH, POPUP_HEIGHT);
        assert_eq!(popup.width, 36);
        assert_eq!(popup.height, 8);
        assert_eq!(popup.x, 2);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn popup_shows_vehicle_fields() {
        let mut v = vehicle("v7", VehicleStatus::Delivered);
        v.fuel_level = Some(12);
        v.driver_phone = Some("+1-555-0142".into());

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, area, &v);
            })
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());

        assert!(text.contains("TRK-v7"), "{text}");
        assert!(text.contains("Delivered"), "{text}");
        assert!(text.contains("+1-555-0142"), "{text}");
        assert!(text.contains("Fuel 12%"), "{text}");
        assert!(text.contains("Battery 64%"), "{text}");
    }
}
