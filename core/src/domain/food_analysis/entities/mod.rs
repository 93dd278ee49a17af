pub mod recipe_analysis;

pub use recipe_analysis::*;
