pub mod auth;
pub mod category;
pub mod closure;
pub mod interval;
pub mod office;
pub mod procedure;
pub mod reservation;
pub mod slot;
