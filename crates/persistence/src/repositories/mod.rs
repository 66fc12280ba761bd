//! Repository implementations.

pub mod book;
pub mod user;
pub mod user_book;

pub use book::BookRepository;
pub use user::UserRepository;
pub use user_book::UserBookRepository;
