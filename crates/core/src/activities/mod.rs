//! Activities module - tracked metric definitions and their daily entries.

mod activities_model;
mod activities_traits;

pub use activities_model::{ActivityEntry, ActivityType, GoalPolarity, UiType};
pub use activities_traits::{ActivityEntryRepositoryTrait, ActivityTypeRepositoryTrait};
