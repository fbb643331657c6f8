pub mod auth_service;
pub mod availability;
pub mod booking_service;
pub mod statistics;
pub mod validation;
