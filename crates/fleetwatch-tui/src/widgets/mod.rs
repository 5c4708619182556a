pub mod level_gauge;
pub mod status_badge;
