pub mod cookie;
pub mod jwt;
