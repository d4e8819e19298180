// Data models and request/response payloads

pub mod nutrition;
pub mod progress;
pub mod workout_plan;
pub mod trainer_request;

pub use nutrition::*;
pub use progress::*;
pub use workout_plan::*;
pub use trainer_request::*;
