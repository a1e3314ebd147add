pub mod catalog;
pub mod edge;
pub mod recipe;
pub mod shopping_list;
pub mod user;
