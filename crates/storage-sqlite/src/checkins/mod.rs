//! Check-in storage.

pub mod model;
pub mod repository;

pub use model::CheckInDB;
pub use repository::CheckInRepository;
