pub mod appointment;
pub mod request_log;
pub mod session;
