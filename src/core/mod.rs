pub mod aggregation;
pub mod filter;
pub mod selection;

pub use crate::domain::model::{Application, Association, Product, StackSummary};
pub use crate::domain::ports::{CatalogApi, ConfigProvider};
pub use crate::utils::error::Result;
