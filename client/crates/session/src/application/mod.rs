pub mod guards;
pub mod manager;
