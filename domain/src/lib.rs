pub mod error;
pub mod meeting;
pub mod signature;
pub mod token_store;
pub mod zoom_connection;

pub mod gateway;
