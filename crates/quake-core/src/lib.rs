pub mod config;
pub mod error;
pub mod tolerance;
pub mod traits;

pub use config::EngineConfig;
pub use error::{QuakeError, Result};
pub use tolerance::{CheckPolicy, Tolerance};
