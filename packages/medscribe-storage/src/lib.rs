pub mod db;
pub mod models;
pub mod notes;
pub mod patients;
pub mod schema;
pub mod uploads;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
