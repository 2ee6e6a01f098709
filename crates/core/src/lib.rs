pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, BanditConfig, PolicyKind};
pub use error::{BanditError, BanditResult};
pub use types::{Action, Context, Log, Sample};
