mod common;

use canteen_actors::StoreHandle;
use canteen_admin::guard::IdempotencyGuard;
use canteen_admin::model::OrderStatus;
use canteen_admin::scheduling::{JobOutcome, ScheduledJob, StatusSweepScheduler};
use common::{at, d, internal_order, spawn_stores, TestStores};
use rust_decimal_macros::dec;

fn sweeper(stores: &TestStores) -> StatusSweepScheduler {
    StatusSweepScheduler::new(
        stores.orders.clone(),
        IdempotencyGuard::new(stores.journal.clone()),
    )
}

#[tokio::test]
async fn sweep_flips_only_todays_pre_orders() {
    let stores = spawn_stores(vec![]);
    let today = d(2026, 3, 10);
    let tomorrow = d(2026, 3, 11);

    let due = stores
        .orders
        .place_order(internal_order("lea@site.example", today, dec!(11.50)))
        .await
        .unwrap();
    let cancelled = stores
        .orders
        .place_order(internal_order("marc@site.example", today, dec!(11.50)))
        .await
        .unwrap();
    stores
        .orders
        .cancel_order(
            cancelled,
            "sick leave".into(),
            "marc@site.example".into(),
            at(today, 9, 0),
        )
        .await
        .unwrap();
    let future = stores
        .orders
        .place_order(internal_order("lea@site.example", tomorrow, dec!(11.50)))
        .await
        .unwrap();
    let consumed = stores
        .orders
        .place_order(internal_order("nadia@site.example", today, dec!(11.50)))
        .await
        .unwrap();
    stores
        .orders
        .record_consumption(
            consumed,
            "nadia@site.example".into(),
            "main counter".into(),
            "scan-station-1".into(),
            at(today, 12, 0),
        )
        .await
        .unwrap();

    let outcome = sweeper(&stores).run_once(at(today, 23, 59)).await.unwrap();
    match outcome {
        JobOutcome::Completed(summary) => assert!(summary.starts_with("1 "), "{summary}"),
        other => panic!("expected a completed sweep, got {other:?}"),
    }

    let status_of = |id| {
        let orders = stores.orders.clone();
        async move { orders.get(id).await.unwrap().unwrap().status }
    };
    assert_eq!(status_of(due).await, OrderStatus::NotRetrieved);
    assert_eq!(status_of(cancelled).await, OrderStatus::Cancelled);
    assert_eq!(status_of(future).await, OrderStatus::PreOrdered);
    assert_eq!(status_of(consumed).await, OrderStatus::Consumed);
}

#[tokio::test]
async fn sweep_only_fires_in_the_last_minute() {
    let stores = spawn_stores(vec![]);
    let today = d(2026, 3, 10);

    stores
        .orders
        .place_order(internal_order("lea@site.example", today, dec!(11.50)))
        .await
        .unwrap();

    let job = sweeper(&stores);
    assert_eq!(job.run_once(at(today, 22, 59)).await.unwrap(), JobOutcome::Skipped);
    assert_eq!(job.run_once(at(today, 23, 58)).await.unwrap(), JobOutcome::Skipped);
    assert!(matches!(
        job.run_once(at(today, 23, 59)).await.unwrap(),
        JobOutcome::Completed(_)
    ));
}

#[tokio::test]
async fn the_day_marker_survives_a_restart() {
    let stores = spawn_stores(vec![]);
    let today = d(2026, 3, 10);

    stores
        .orders
        .place_order(internal_order("lea@site.example", today, dec!(11.50)))
        .await
        .unwrap();

    let first = sweeper(&stores).run_once(at(today, 23, 59)).await.unwrap();
    assert!(matches!(first, JobOutcome::Completed(_)));

    // A fresh scheduler instance sharing the journal stands in for a
    // restarted process: the guard is durable, so no second sweep.
    let second = sweeper(&stores).run_once(at(today, 23, 59)).await.unwrap();
    assert_eq!(second, JobOutcome::Skipped);

    // The next day is a fresh window.
    let tomorrow = d(2026, 3, 11);
    stores
        .orders
        .place_order(internal_order("lea@site.example", tomorrow, dec!(11.50)))
        .await
        .unwrap();
    let next_day = sweeper(&stores)
        .run_once(at(tomorrow, 23, 59))
        .await
        .unwrap();
    assert!(matches!(next_day, JobOutcome::Completed(_)));
}
