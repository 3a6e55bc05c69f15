pub mod audit;
pub mod auth;
pub mod fleet;
pub mod health;
pub mod trips;
pub mod users;
