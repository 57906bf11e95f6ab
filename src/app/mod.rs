pub mod context;
pub mod wizard;
