pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod pivot;
pub mod reconcile;
pub mod regions;
pub mod session;

pub use error::{EvError, EvResult};
