pub mod auth;
pub mod availability;
pub mod closure;
pub mod health;
pub mod procedure;
pub mod reservation;
pub mod statistics;
