pub mod api;
pub mod locker;
pub mod user;
