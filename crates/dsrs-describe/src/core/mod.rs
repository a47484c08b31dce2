pub mod annotation;
pub mod classify;
pub mod describe;
pub mod description;
pub mod errors;
pub mod extract;
pub mod json_schema;
pub mod model;
pub mod settings;
pub mod signature;

pub use annotation::*;
pub use classify::*;
pub use describe::*;
pub use description::*;
pub use errors::*;
pub use extract::*;
pub use json_schema::*;
pub use model::*;
pub use settings::*;
pub use signature::*;
