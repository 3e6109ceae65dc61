pub mod account;
pub mod dose_window;
pub mod health_metric;
pub mod http_date;
pub mod patient;
