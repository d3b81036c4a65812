pub mod core;
pub mod models;
pub mod storage;
pub mod journal;
pub mod services;
pub mod metrics;
pub mod utils;
pub mod handlers;
