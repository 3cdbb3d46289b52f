pub mod quote;
pub mod user;
