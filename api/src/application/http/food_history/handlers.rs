pub mod get_food_history;
