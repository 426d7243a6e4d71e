//! Daily billing of unconsumed past orders.
//!
//! Finds internal-user orders with a past service date and no live
//! consumption record, applies the exemption walk, charges the rest, and
//! writes a `Billed` consumption record per charged order. That record is
//! what excludes an order from every future run; the day marker only stops
//! same-day repeats. Order status is never changed here: billing and
//! physical retrieval are orthogonal.

use crate::billing::{self, BillingPolicy};
use crate::clients::{ConfigClient, OrderBookClient};
use crate::config_store::ConfigError;
use crate::guard::IdempotencyGuard;
use crate::model::{JobName, OrderStatus};
use crate::order_book::OrderQuery;
use crate::scheduling::{JobError, JobOutcome, ScheduledJob};
use async_trait::async_trait;
use canteen_actors::StoreHandle;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Audit identity stamped on billed and exempted orders.
const BILLING_ACTOR: &str = "billing-reconciler";

/// The daily billing job.
pub struct BillingReconciler {
    orders: OrderBookClient,
    config: ConfigClient,
    guard: IdempotencyGuard,
}

impl BillingReconciler {
    pub fn new(orders: OrderBookClient, config: ConfigClient, guard: IdempotencyGuard) -> Self {
        Self {
            orders,
            config,
            guard,
        }
    }

    async fn load_policy(&self) -> Result<BillingPolicy, ConfigError> {
        let entries = self.config.entries_with_prefix("FACTURATION_").await?;
        let values: HashMap<String, String> = entries
            .into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect();
        Ok(BillingPolicy::from_lookup(|key| values.get(key).cloned()))
    }
}

#[async_trait]
impl ScheduledJob for BillingReconciler {
    fn name(&self) -> JobName {
        JobName::Billing
    }

    fn poll_interval(&self) -> Duration {
        POLL_INTERVAL
    }

    fn guard(&self) -> &IdempotencyGuard {
        &self.guard
    }

    async fn execute(&self, now: NaiveDateTime) -> Result<JobOutcome, JobError> {
        let policy = self.load_policy().await?;
        if !policy.active {
            debug!("Billing of unconsumed orders is disabled");
            return Ok(JobOutcome::Skipped);
        }

        let today = now.date();
        if self.guard.has_run(JobName::Billing, today).await? {
            debug!("Billing already recorded today");
            return Ok(JobOutcome::Skipped);
        }

        // Candidates: past service date, status still billable, internal
        // user, and never validated. An existing live consumption record
        // excludes an order no matter what its status says.
        let candidates = self
            .orders
            .query(OrderQuery {
                statuses: vec![OrderStatus::PreOrdered, OrderStatus::Consumed],
                service_before: Some(today),
                internal_only: true,
                unconsumed_only: true,
                ..OrderQuery::default()
            })
            .await?;

        let plan = billing::plan(&candidates, &policy);
        let applied = self
            .orders
            .apply_billing(plan.decisions, BILLING_ACTOR.into(), now)
            .await?;

        let summary = serde_json::json!({
            "at": now.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "candidates": candidates.len(),
            "billed": applied.billed,
            "exempted": applied.exempted,
            "skipped": applied.skipped,
            "total": applied.total,
        })
        .to_string();
        self.guard
            .mark_completed(JobName::Billing, today, summary.clone(), now)
            .await?;
        Ok(JobOutcome::Completed(summary))
    }
}
