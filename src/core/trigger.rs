//! Change-driven trigger for the server-side RG5329 procedure.
//!
//! The host pushes a fresh [`Order`] snapshot on every customer or line
//! change. Snapshots are debounced; once the order is quiet the latest one is
//! evaluated and, when the perception applies, the remote procedure is called
//! once per order.

use crate::core::calculator::compute_rg5329;
use crate::domain::model::{Notification, NotificationLevel, Order, Rg5329Status};
use crate::domain::ports::{Notifier, RemoteTaxApplier};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    Skipped(Rg5329Status),
    AlreadyApplied { order_id: u64 },
    Applied { order_id: u64, new_total: Option<Decimal> },
    Fallback { order_id: Option<u64>, reason: String },
}

pub struct TriggerEngine<A: RemoteTaxApplier, N: Notifier> {
    applier: A,
    notifier: N,
    debounce: Duration,
    applied: HashSet<u64>,
}

impl<A: RemoteTaxApplier, N: Notifier> TriggerEngine<A, N> {
    pub fn new(applier: A, notifier: N) -> Self {
        Self::with_debounce(applier, notifier, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(applier: A, notifier: N, debounce: Duration) -> Self {
        Self {
            applier,
            notifier,
            debounce,
            applied: HashSet::new(),
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn is_applied(&self, order_id: u64) -> bool {
        self.applied.contains(&order_id)
    }

    /// Consumes snapshots until the sender side is dropped.
    pub async fn run(&mut self, mut changes: mpsc::Receiver<Order>) -> Vec<TriggerOutcome> {
        let mut outcomes = Vec::new();
        let mut pending: Option<Order> = None;
        let mut deadline = Instant::now();

        loop {
            tokio::select! {
                received = changes.recv() => match received {
                    Some(order) => {
                        tracing::debug!("RG5329: change on {}, debouncing", order.display_name());
                        pending = Some(order);
                        deadline = Instant::now() + self.debounce;
                    }
                    None => {
                        if let Some(order) = pending.take() {
                            outcomes.push(self.evaluate(&order).await);
                        }
                        break;
                    }
                },
                _ = sleep_until(deadline), if pending.is_some() => {
                    if let Some(order) = pending.take() {
                        outcomes.push(self.evaluate(&order).await);
                    }
                }
            }
        }

        tracing::info!("RG5329: trigger stopped after {} evaluations", outcomes.len());
        outcomes
    }

    pub async fn evaluate(&mut self, order: &Order) -> TriggerOutcome {
        let result = compute_rg5329(order);

        if !result.applicable {
            tracing::debug!(
                "RG5329: {} not applicable ({})",
                order.display_name(),
                result.status
            );
            if let Some(id) = order.id {
                self.applied.remove(&id);
            }
            return TriggerOutcome::Skipped(result.status);
        }

        let Some(order_id) = order.id else {
            let reason = "order has no id yet".to_string();
            tracing::warn!("RG5329: {}, falling back to notification", reason);
            self.notify_fallback(NotificationLevel::Warning);
            return TriggerOutcome::Fallback {
                order_id: None,
                reason,
            };
        };

        if self.applied.contains(&order_id) {
            return TriggerOutcome::AlreadyApplied { order_id };
        }

        tracing::info!(
            "RG5329: applying to order {} (perception {})",
            order_id,
            result.total_tax.round_dp(2)
        );

        match self.applier.apply(order_id).await {
            Ok(response) if response.success => {
                self.applied.insert(order_id);
                let message = match response.new_total {
                    Some(total) => format!(
                        "RG5329 tax applied to {}. New total: ${}",
                        order.display_name(),
                        total.round_dp(2)
                    ),
                    None => format!("RG5329 tax applied to {}", order.display_name()),
                };
                self.notifier.notify(&Notification::new(
                    NotificationLevel::Success,
                    "RG5329 Tax Applied",
                    message,
                ));
                TriggerOutcome::Applied {
                    order_id,
                    new_total: response.new_total,
                }
            }
            Ok(response) => {
                let reason = response
                    .message
                    .unwrap_or_else(|| "server reported failure".to_string());
                tracing::warn!("RG5329: backend refused order {}: {}", order_id, reason);
                self.notify_fallback(NotificationLevel::Warning);
                TriggerOutcome::Fallback {
                    order_id: Some(order_id),
                    reason,
                }
            }
            Err(e) => {
                tracing::error!("RG5329: backend call failed for order {}: {}", order_id, e);
                self.notify_fallback(NotificationLevel::Danger);
                TriggerOutcome::Fallback {
                    order_id: Some(order_id),
                    reason: e.to_string(),
                }
            }
        }
    }

    fn notify_fallback(&self, level: NotificationLevel) {
        self.notifier.notify(&Notification::new(
            level,
            "RG5329 Tax",
            "RG5329 should apply to this order. Save the order so the server recalculates its taxes.",
        ));
    }
}
