use crate::domain::model::{ApplyResponse, Customer, Notification, Order, OrderLine};
use crate::utils::error::Result;
use async_trait::async_trait;

/// What the calculator needs to see of a host order.
pub trait OrderSnapshot {
    fn customer(&self) -> Option<&Customer>;
    fn lines(&self) -> &[OrderLine];
}

impl OrderSnapshot for Order {
    fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    fn lines(&self) -> &[OrderLine] {
        &self.lines
    }
}

/// The server-side procedure that commits RG5329 taxes on an order.
#[async_trait]
pub trait RemoteTaxApplier: Send + Sync {
    async fn apply(&self, order_id: u64) -> Result<ApplyResponse>;
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}
