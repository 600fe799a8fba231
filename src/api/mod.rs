pub mod audit;
pub mod error;
pub mod health;
pub mod openapi;
