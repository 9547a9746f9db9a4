// Public modules that need to be accessible from tests
pub mod cache;
pub mod calculations;
pub mod dates;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod recurring;
pub mod seeding;
pub mod state;
pub mod validation;
pub mod workshops;
