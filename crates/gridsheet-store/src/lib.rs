pub mod config;
pub mod store;

pub use config::StoreConfig;
pub use store::{EditOutcome, GridStore, TextOp};
