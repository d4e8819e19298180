// API routes and handlers

pub mod health;
pub mod routes;
pub mod auth;
pub mod nutrition;
pub mod progress;
pub mod workout_plans;
pub mod trainer_requests;

pub use routes::create_routes;
