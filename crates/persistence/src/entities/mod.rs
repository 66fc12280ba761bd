//! Entity definitions (database row mappings).

pub mod book;
pub mod user;
pub mod user_book;

pub use book::BookEntity;
pub use user::UserEntity;
pub use user_book::UserBookEntity;
