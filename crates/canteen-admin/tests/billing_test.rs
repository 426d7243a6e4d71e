mod common;

use canteen_actors::StoreHandle;
use canteen_admin::guard::IdempotencyGuard;
use canteen_admin::model::config::keys;
use canteen_admin::model::{ConsumptionOutcome, JobName, OrderStatus};
use canteen_admin::scheduling::{BillingReconciler, JobOutcome, ScheduledJob};
use common::{at, d, internal_order, spawn_stores, TestStores};
use rust_decimal_macros::dec;

fn reconciler(stores: &TestStores) -> BillingReconciler {
    BillingReconciler::new(
        stores.orders.clone(),
        stores.config.clone(),
        IdempotencyGuard::new(stores.journal.clone()),
    )
}

async fn activate_billing(stores: &TestStores, percentage: &str, grace: &str) {
    stores
        .config
        .set(keys::BILLING_ACTIVE, "1", None)
        .await
        .unwrap();
    stores
        .config
        .set(keys::BILLING_PERCENTAGE, percentage, None)
        .await
        .unwrap();
    stores
        .config
        .set(keys::BILLING_GRACE_ABSENCES, grace, None)
        .await
        .unwrap();
}

// 2026-03-12 is a Thursday; 2026-03-09 a Monday.
const RUN_DAY: (i32, u32, u32) = (2026, 3, 12);

#[tokio::test]
async fn bills_eighty_percent_of_an_unconsumed_past_order_once() {
    let stores = spawn_stores(vec![]);
    activate_billing(&stores, "80", "0").await;

    let id = stores
        .orders
        .place_order(internal_order(
            "lea@site.example",
            d(2026, 3, 9),
            dec!(1000),
        ))
        .await
        .unwrap();

    let now = at(d(RUN_DAY.0, RUN_DAY.1, RUN_DAY.2), 6, 0);
    let job = reconciler(&stores);
    let outcome = job.run_once(now).await.unwrap();
    assert!(matches!(outcome, JobOutcome::Completed(_)), "{outcome:?}");

    let order = stores.orders.get(id).await.unwrap().unwrap();
    // Billing never touches the status.
    assert_eq!(order.status, OrderStatus::PreOrdered);
    // Exactly one billed record at 80% of 1000.
    assert_eq!(order.consumptions.len(), 1);
    let record = order.live_consumption().unwrap();
    assert_eq!(
        record.outcome,
        ConsumptionOutcome::Billed {
            amount: dec!(800),
            reason: "NOT RETRIEVED".into(),
        }
    );

    // Same-day re-run is a no-op thanks to the journal marker.
    let repeat = job.run_once(now).await.unwrap();
    assert_eq!(repeat, JobOutcome::Skipped);
    let order = stores.orders.get(id).await.unwrap().unwrap();
    assert_eq!(order.consumptions.len(), 1);

    assert!(stores
        .journal
        .has_completed(JobName::Billing, now.date())
        .await
        .unwrap());
}

#[tokio::test]
async fn a_restarted_reconciler_still_skips_the_day() {
    let stores = spawn_stores(vec![]);
    activate_billing(&stores, "100", "0").await;

    stores
        .orders
        .place_order(internal_order("lea@site.example", d(2026, 3, 9), dec!(10)))
        .await
        .unwrap();

    let now = at(d(RUN_DAY.0, RUN_DAY.1, RUN_DAY.2), 6, 0);
    let outcome = reconciler(&stores).run_once(now).await.unwrap();
    assert!(matches!(outcome, JobOutcome::Completed(_)));

    // A fresh job instance simulates a process restart: the marker is
    // durable, not in-memory.
    let repeat = reconciler(&stores).run_once(now).await.unwrap();
    assert_eq!(repeat, JobOutcome::Skipped);
}

#[tokio::test]
async fn validated_orders_are_never_billed() {
    let stores = spawn_stores(vec![]);
    activate_billing(&stores, "100", "0").await;

    let date = d(2026, 3, 9);
    let id = stores
        .orders
        .place_order(internal_order("lea@site.example", date, dec!(11.50)))
        .await
        .unwrap();
    stores
        .orders
        .record_consumption(
            id,
            "lea@site.example".into(),
            "main counter".into(),
            "scan-station-1".into(),
            at(date, 12, 0),
        )
        .await
        .unwrap();

    let now = at(d(RUN_DAY.0, RUN_DAY.1, RUN_DAY.2), 6, 0);
    reconciler(&stores).run_once(now).await.unwrap();

    let order = stores.orders.get(id).await.unwrap().unwrap();
    // Still only the physical record; no billing marker was added.
    assert_eq!(order.consumptions.len(), 1);
    assert!(matches!(
        order.live_consumption().unwrap().outcome,
        ConsumptionOutcome::Physical { .. }
    ));
}

#[tokio::test]
async fn the_earliest_absence_consumes_the_grace_allowance() {
    let stores = spawn_stores(vec![]);
    activate_billing(&stores, "100", "1").await;

    let first = stores
        .orders
        .place_order(internal_order("lea@site.example", d(2026, 3, 9), dec!(10)))
        .await
        .unwrap();
    let second = stores
        .orders
        .place_order(internal_order("lea@site.example", d(2026, 3, 10), dec!(10)))
        .await
        .unwrap();

    let now = at(d(RUN_DAY.0, RUN_DAY.1, RUN_DAY.2), 6, 0);
    reconciler(&stores).run_once(now).await.unwrap();

    // Monday's order used the single grace absence and stays unbilled
    // (and therefore eligible again tomorrow); Tuesday's was charged.
    let first = stores.orders.get(first).await.unwrap().unwrap();
    assert!(first.is_unconsumed());
    assert!(first.modified_by.is_some());

    let second = stores.orders.get(second).await.unwrap().unwrap();
    assert!(matches!(
        second.live_consumption().unwrap().outcome,
        ConsumptionOutcome::Billed { .. }
    ));
}

#[tokio::test]
async fn weekend_exemption_outranks_the_grace_allowance() {
    let stores = spawn_stores(vec![]);
    activate_billing(&stores, "100", "1").await;

    // 2026-03-07 is a Saturday.
    let saturday = stores
        .orders
        .place_order(internal_order("lea@site.example", d(2026, 3, 7), dec!(10)))
        .await
        .unwrap();
    let monday = stores
        .orders
        .place_order(internal_order("lea@site.example", d(2026, 3, 9), dec!(10)))
        .await
        .unwrap();

    let now = at(d(RUN_DAY.0, RUN_DAY.1, RUN_DAY.2), 6, 0);
    reconciler(&stores).run_once(now).await.unwrap();

    // The Saturday order is exempted as a weekend without spending the
    // grace absence, which then covers the Monday order: nothing billed.
    for id in [saturday, monday] {
        let order = stores.orders.get(id).await.unwrap().unwrap();
        assert!(order.is_unconsumed(), "{id} must not carry a billing record");
    }
}

#[tokio::test]
async fn disabled_billing_skips_entirely() {
    let stores = spawn_stores(vec![]);
    // BILLING_ACTIVE defaults to off.

    stores
        .orders
        .place_order(internal_order("lea@site.example", d(2026, 3, 9), dec!(10)))
        .await
        .unwrap();

    let now = at(d(RUN_DAY.0, RUN_DAY.1, RUN_DAY.2), 6, 0);
    let outcome = reconciler(&stores).run_once(now).await.unwrap();
    assert_eq!(outcome, JobOutcome::Skipped);

    // No marker is written by a disabled run.
    assert!(!stores
        .journal
        .has_completed(JobName::Billing, now.date())
        .await
        .unwrap());
}

#[tokio::test]
async fn same_day_orders_are_not_yet_candidates() {
    let stores = spawn_stores(vec![]);
    activate_billing(&stores, "100", "0").await;

    let today = d(RUN_DAY.0, RUN_DAY.1, RUN_DAY.2);
    let id = stores
        .orders
        .place_order(internal_order("lea@site.example", today, dec!(10)))
        .await
        .unwrap();

    reconciler(&stores).run_once(at(today, 6, 0)).await.unwrap();

    let order = stores.orders.get(id).await.unwrap().unwrap();
    assert!(order.is_unconsumed());
}
