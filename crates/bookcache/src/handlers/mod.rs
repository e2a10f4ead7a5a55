pub mod authors;
pub mod books;
pub mod error;
pub mod health;
pub mod response;
