pub mod dates;
pub mod errors;
pub mod models;
pub mod protocol;

pub use dates::*;
pub use errors::*;
pub use models::*;
pub use protocol::*;
