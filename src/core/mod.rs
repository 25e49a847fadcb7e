pub mod balance;
pub mod currency;
pub mod direct;
pub mod errors;
pub mod models;
pub mod services;
pub mod settlement;
