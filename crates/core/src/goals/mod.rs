//! Goals module - goal definitions and their closed-period achievements.

mod goals_model;
mod goals_traits;

pub use goals_model::{Achievement, Goal, GoalDateType, TrackingType};
pub use goals_traits::{AchievementRepositoryTrait, GoalRepositoryTrait};
