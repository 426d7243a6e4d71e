mod common;

use canteen_actors::StoreHandle;
use canteen_admin::guard::IdempotencyGuard;
use canteen_admin::model::config::keys;
use canteen_admin::model::{
    ConsumptionOutcome, GroupId, MealKind, OrderStatus, ServicePeriod,
};
use canteen_admin::scheduling::{AutoConfirmScheduler, JobOutcome, ScheduledJob};
use common::{at, capped_group, d, group_order, internal_order, spawn_stores, TestStores};
use rust_decimal_macros::dec;

fn confirmer(stores: &TestStores) -> AutoConfirmScheduler {
    AutoConfirmScheduler::new(
        stores.orders.clone(),
        stores.config.clone(),
        IdempotencyGuard::new(stores.journal.clone()),
    )
}

#[tokio::test]
async fn auto_confirmation_is_off_by_default() {
    let stores = spawn_stores(vec![]);
    let today = d(2026, 3, 10);

    stores
        .orders
        .place_order(internal_order("lea@site.example", today, dec!(11.50)))
        .await
        .unwrap();

    let outcome = confirmer(&stores).run_once(at(today, 21, 5)).await.unwrap();
    assert_eq!(outcome, JobOutcome::Skipped);
}

#[tokio::test]
async fn confirms_todays_unvalidated_internal_orders_after_nine_pm() {
    let stores = spawn_stores(vec![capped_group(1, 10, false)]);
    stores
        .config
        .set(keys::AUTO_CONFIRMATION, "1", None)
        .await
        .unwrap();
    let today = d(2026, 3, 10);

    let pending = stores
        .orders
        .place_order(internal_order("lea@site.example", today, dec!(11.50)))
        .await
        .unwrap();
    let scanned = stores
        .orders
        .place_order(internal_order("marc@site.example", today, dec!(11.50)))
        .await
        .unwrap();
    stores
        .orders
        .record_consumption(
            scanned,
            "marc@site.example".into(),
            "main counter".into(),
            "scan-station-1".into(),
            at(today, 12, 0),
        )
        .await
        .unwrap();
    // Group orders have no user to credit, so trust mode leaves them alone.
    let group = stores
        .orders
        .place_order(group_order(
            GroupId(1),
            today,
            ServicePeriod::Day,
            1,
            MealKind::Standard,
        ))
        .await
        .unwrap();

    let job = confirmer(&stores);
    // Too early.
    assert_eq!(job.run_once(at(today, 20, 55)).await.unwrap(), JobOutcome::Skipped);

    let outcome = job.run_once(at(today, 21, 5)).await.unwrap();
    match outcome {
        JobOutcome::Completed(summary) => assert!(summary.starts_with("1 "), "{summary}"),
        other => panic!("expected completion, got {other:?}"),
    }

    let pending = stores.orders.get(pending).await.unwrap().unwrap();
    assert_eq!(pending.status, OrderStatus::Consumed);
    assert_eq!(
        pending.live_consumption().unwrap().outcome,
        ConsumptionOutcome::Physical {
            location: "auto-confirmation".into(),
        }
    );

    // The scanned order kept its single original record.
    let scanned = stores.orders.get(scanned).await.unwrap().unwrap();
    assert_eq!(scanned.consumptions.len(), 1);

    let group = stores.orders.get(group).await.unwrap().unwrap();
    assert_eq!(group.status, OrderStatus::PreOrdered);

    // The marker blocks a second pass.
    assert_eq!(job.run_once(at(today, 21, 10)).await.unwrap(), JobOutcome::Skipped);
}
