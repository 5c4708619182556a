//! Screen implementations. The dashboard is the only top-level screen;
//! the vehicle detail is a popup drawn over it.

pub mod dashboard;
pub mod vehicle_detail;

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{TimeZone, Utc};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    use fleetwatch_core::{Location, Statistics, Vehicle, VehicleStatus};

    use crate::component::Component;

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn vehicle(id: &str, status: VehicleStatus) -> Vehicle {
        Vehicle {
            id: id.into(),
            vehicle_number: format!("TRK-{id}"),
            driver_name: "Sam Rivera".into(),
            driver_phone: None,
            status,
            destination: "West Yard".into(),
            current_location: Location {
                lat: 51.507_4,
                lng: -0.127_8,
            },
            speed: 100.0,
            last_updated: Utc
                .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
                .single()
                .unwrap_or_default(),
            estimated_arrival: None,
            battery_level: Some(64),
            fuel_level: Some(48),
        }
    }

    pub fn statistics() -> Statistics {
        Statistics {
            total: 3,
            idle: 1,
            en_route: 1,
            delivered: 1,
            average_speed: 100.0,
            timestamp: None,
        }
    }

    /// Render a component into an off-screen buffer.
    #[allow(clippy::unwrap_used)]
    pub fn draw(component: &dyn Component, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                component.render(frame, area);
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    /// Buffer contents as text, one line per row.
    pub fn buffer_text(buffer: &Buffer) -> String {
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }
}
