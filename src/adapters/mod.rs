// Adapters layer: concrete implementations for the host side (snapshot files, ERP RPC, notifications).

pub mod json_rpc;
pub mod notifier;
pub mod snapshot;

pub use json_rpc::JsonRpcApplier;
pub use notifier::TracingNotifier;
pub use snapshot::{load_order, parse_order};
