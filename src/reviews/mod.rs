pub mod models;
pub mod error;
pub mod repository;
pub mod movie_client;
pub mod service;
pub mod handlers;

pub use models::*;
pub use error::*;
pub use repository::*;
pub use movie_client::*;
pub use service::*;
pub use handlers::*;

#[cfg(test)]
pub(crate) mod test_support;
