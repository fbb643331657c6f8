pub mod postgres_closure_repo;
pub mod postgres_procedure_repo;
pub mod postgres_reservation_repo;
pub mod sqlite_closure_repo;
pub mod sqlite_procedure_repo;
pub mod sqlite_reservation_repo;
