pub mod resolvers;
pub mod schema;

pub use schema::{build_schema, AppSchema};
