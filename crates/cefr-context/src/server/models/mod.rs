pub mod filter;
pub mod message;
pub mod query;

pub use filter::{FilterCondition, MetadataFilter};
pub use message::{parse_user_message, ParseFailure, RequiredField};
pub use query::{ContextQuery, QueryParams};
