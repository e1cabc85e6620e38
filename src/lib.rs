pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{Cli, Command};

pub use config::toml_config::TomlConfig;
pub use crate::core::calculator::{compute_rg5329, MINIMUM_THRESHOLD};
pub use crate::core::trigger::{TriggerEngine, TriggerOutcome};
pub use domain::model::{CalculationResult, Customer, Order, OrderLine, Product, Rg5329Status, Tax};
pub use domain::ports::OrderSnapshot;
pub use utils::error::{Result, Rg5329Error};
