pub mod lifecycle;
pub mod recipe_book;
pub mod recipe_detail;
pub mod repositories;
