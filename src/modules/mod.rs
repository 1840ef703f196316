pub mod authors;
pub mod books;
pub mod users;
