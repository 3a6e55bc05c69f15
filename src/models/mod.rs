pub mod bus;
pub mod trip;
pub mod user;
