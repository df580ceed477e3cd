pub mod config;
pub mod error;
pub mod error_log;
pub mod error_utils;
pub mod source;
pub mod timeframe;
pub mod types;

pub use config::*;
pub use error::*;
pub use error_log::*;
pub use error_utils::*;
pub use source::*;
pub use timeframe::*;
pub use types::*;
