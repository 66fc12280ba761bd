//! Domain models.

pub mod book;
pub mod user;
pub mod user_book;

pub use book::Book;
pub use user::{Role, User};
pub use user_book::UserBook;
