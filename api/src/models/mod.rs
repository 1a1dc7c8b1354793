pub mod article;
pub mod sort;
pub mod user;
