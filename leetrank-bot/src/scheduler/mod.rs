pub mod runner;

pub use runner::{RefreshWorker, RefreshWorkerConfig};
