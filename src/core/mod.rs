pub mod calculator;
pub mod trigger;

pub use crate::domain::model::{CalculationResult, Order, OrderLine, Rg5329Status};
pub use crate::domain::ports::{Notifier, OrderSnapshot, RemoteTaxApplier};
pub use crate::utils::error::Result;
