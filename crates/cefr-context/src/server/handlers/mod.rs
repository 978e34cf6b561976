pub mod context;
pub mod status;
