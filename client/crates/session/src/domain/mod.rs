pub mod api;
pub mod resource;
pub mod user;
