// Business logic services

pub mod nutrition_service;
pub mod progress_service;
pub mod workout_plan_service;
pub mod trainer_request_service;

pub use nutrition_service::{GoalUpsert, NutritionService};
pub use progress_service::ProgressService;
pub use workout_plan_service::WorkoutPlanService;
pub use trainer_request_service::TrainerRequestService;
