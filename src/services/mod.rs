pub mod auth;
pub mod lockers;
