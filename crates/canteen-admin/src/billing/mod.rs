//! Billing of unconsumed past orders.
//!
//! [`plan`] is the pure decision step: given the candidate orders and the
//! policy, it produces one [`BillingDecision`] per order. Applying the
//! decisions (creating billing consumption records, stamping exempted
//! orders) is a single order-book command, so the whole batch lands
//! atomically or not at all.

pub mod holidays;
pub mod policy;

pub use policy::BillingPolicy;

use crate::model::{Order, OrderId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Why an order was exempted from billing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExemptionReason {
    Weekend,
    Holiday,
    GraceAbsence,
}

/// Outcome decided for one candidate order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BillingVerdict {
    Charge { amount: Decimal },
    Exempt { reason: ExemptionReason },
}

/// Decision for one order, ready to be applied by the order book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingDecision {
    pub order_id: OrderId,
    pub user_email: String,
    pub verdict: BillingVerdict,
}

/// The full outcome of one planning pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingPlan {
    pub decisions: Vec<BillingDecision>,
    pub billed_count: usize,
    pub exempt_count: usize,
    pub total: Decimal,
}

/// Amount charged for one order: `amount × percentage / 100`, rounded to
/// two decimals for currency display.
pub fn charge_amount(amount: Decimal, percentage: u32) -> Decimal {
    (amount * Decimal::from(percentage) / Decimal::from(100u32)).round_dp(2)
}

/// Walks the candidate orders and decides, per order, whether to charge or
/// exempt.
///
/// Orders are grouped by user and walked in service-date order; within each
/// user the exemptions apply in strict priority: weekend, then holiday, then
/// one of the user's grace absences, and only then a charge. Weekend and
/// holiday exemptions do not consume a grace absence, and the date ordering
/// is what makes "the earliest absence uses the allowance first" hold.
///
/// Candidates without an internal user are skipped; the candidate query
/// should not produce any.
pub fn plan(candidates: &[Order], policy: &BillingPolicy) -> BillingPlan {
    let mut by_user: BTreeMap<&str, Vec<&Order>> = BTreeMap::new();
    for order in candidates {
        match order.user_email() {
            Some(email) => by_user.entry(email).or_default().push(order),
            None => debug!(order_id = %order.id, "Skipping candidate without internal user"),
        }
    }

    let mut decisions = Vec::with_capacity(candidates.len());
    let mut billed_count = 0;
    let mut exempt_count = 0;
    let mut total = Decimal::ZERO;

    for (email, mut orders) in by_user {
        orders.sort_by_key(|o| (o.service_date, o.id.0));
        let mut grace_left = policy.grace_absences;

        for order in orders {
            let verdict = if !policy.bill_weekends && holidays::is_weekend(order.service_date) {
                BillingVerdict::Exempt {
                    reason: ExemptionReason::Weekend,
                }
            } else if !policy.bill_holidays && holidays::is_public_holiday(order.service_date) {
                BillingVerdict::Exempt {
                    reason: ExemptionReason::Holiday,
                }
            } else if grace_left > 0 {
                grace_left -= 1;
                BillingVerdict::Exempt {
                    reason: ExemptionReason::GraceAbsence,
                }
            } else {
                BillingVerdict::Charge {
                    amount: charge_amount(order.amount, policy.percentage),
                }
            };

            match &verdict {
                BillingVerdict::Charge { amount } => {
                    billed_count += 1;
                    total += *amount;
                }
                BillingVerdict::Exempt { .. } => exempt_count += 1,
            }

            decisions.push(BillingDecision {
                order_id: order.id,
                user_email: email.to_string(),
                verdict,
            });
        }
    }

    BillingPlan {
        decisions,
        billed_count,
        exempt_count,
        total,
    }
}
