pub mod auth;
pub mod clients;
pub mod configs;
pub mod health;
pub mod logs;
pub mod opt_outs;
pub mod stats;
pub mod trips;
