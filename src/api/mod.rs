mod error;
pub mod models;
pub mod server;
pub mod services;
pub mod state;

pub use error::ApiError;
pub use server::run;
