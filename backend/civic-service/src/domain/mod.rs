pub mod models;
pub mod requests;

pub use models::*;
pub use requests::*;
