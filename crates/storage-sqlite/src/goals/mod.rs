//! Goal and achievement storage.

pub mod model;
pub mod repository;

pub use model::{AchievementDB, GoalDB};
pub use repository::{AchievementRepository, GoalRepository};
