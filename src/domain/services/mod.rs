pub mod availability;
pub mod calendar;
