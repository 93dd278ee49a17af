pub mod authentication;
pub mod common;
pub mod feedback;
pub mod food_analysis;
pub mod food_history;
pub mod health;
pub mod preferences;
pub mod profile;
pub mod prompt;
pub mod saved_recipe;
pub mod storage;
