pub mod clock_period;
pub mod clock_session;
pub mod employee;
pub mod location_point;
pub mod lookups;
pub mod time_entry;
pub mod workday;
