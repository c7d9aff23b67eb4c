pub mod config_service;
pub mod trip_service;
pub mod valuation_service;
