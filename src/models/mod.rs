pub mod book_model;
pub mod patch;
