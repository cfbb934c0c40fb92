pub mod app;
pub mod audit;
pub mod core;
pub mod notifications;
pub mod scan;
pub mod store;
