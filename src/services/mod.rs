pub mod book_service;
pub mod library_service;
