mod common;

use canteen_actors::mock::MockClient;
use canteen_actors::StoreHandle;
use canteen_admin::clients::QuotaClient;
use canteen_admin::model::quota::DailyQuota;
use canteen_admin::model::{GroupId, MealKind, OrderStatus, ServicePeriod};
use canteen_admin::order_book::{self, OrderContext, OrderError};
use canteen_admin::quota::{QuotaError, QuotaReply};
use common::{at, capped_group, d, group_order, internal_order, spawn_stores};
use rust_decimal_macros::dec;

#[tokio::test]
async fn group_orders_consume_and_release_quota() {
    let stores = spawn_stores(vec![capped_group(1, 2, false)]);
    let date = d(2026, 3, 10);

    let id = stores
        .orders
        .place_order(group_order(
            GroupId(1),
            date,
            ServicePeriod::Day,
            2,
            MealKind::Standard,
        ))
        .await
        .unwrap();
    assert_eq!(
        stores
            .quotas
            .remaining(GroupId(1), date, ServicePeriod::Day)
            .await
            .unwrap(),
        Some(0)
    );

    // The quota is spent, so the next group order fails.
    let err = stores
        .orders
        .place_order(group_order(
            GroupId(1),
            date,
            ServicePeriod::Day,
            1,
            MealKind::Standard,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::QuotaExhausted { .. }), "{err:?}");

    // Cancelling gives the slots back.
    let cancelled = stores
        .orders
        .cancel_order(id, "site closed".into(), "admin".into(), at(date, 9, 0))
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.cancel_reason.as_deref(), Some("site closed"));
    assert_eq!(
        stores
            .quotas
            .remaining(GroupId(1), date, ServicePeriod::Day)
            .await
            .unwrap(),
        Some(2)
    );

    // A cancelled order cannot be cancelled again.
    let err = stores
        .orders
        .cancel_order(id, "again".into(), "admin".into(), at(date, 10, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidTransition { .. }), "{err:?}");
}

#[tokio::test]
async fn restricted_groups_only_get_standard_formulas() {
    let stores = spawn_stores(vec![capped_group(1, 10, true)]);

    let err = stores
        .orders
        .place_order(group_order(
            GroupId(1),
            d(2026, 3, 10),
            ServicePeriod::Day,
            1,
            MealKind::Improved,
        ))
        .await
        .unwrap_err();
    assert_eq!(err, OrderError::RestrictedFormula(GroupId(1)));

    // The rejected order must not have consumed a slot.
    assert_eq!(
        stores
            .quotas
            .remaining(GroupId(1), d(2026, 3, 10), ServicePeriod::Day)
            .await
            .unwrap(),
        Some(10)
    );
}

#[tokio::test]
async fn unknown_groups_are_rejected() {
    let stores = spawn_stores(vec![]);
    let err = stores
        .orders
        .place_order(group_order(
            GroupId(9),
            d(2026, 3, 10),
            ServicePeriod::Day,
            1,
            MealKind::Standard,
        ))
        .await
        .unwrap_err();
    assert_eq!(err, OrderError::UnknownGroup(GroupId(9)));
}

#[tokio::test]
async fn consumption_is_recorded_exactly_once() {
    let stores = spawn_stores(vec![]);
    let date = d(2026, 3, 10);

    let id = stores
        .orders
        .place_order(internal_order("lea@site.example", date, dec!(11.50)))
        .await
        .unwrap();

    let consumed = stores
        .orders
        .record_consumption(
            id,
            "lea@site.example".into(),
            "main counter".into(),
            "scan-station-1".into(),
            at(date, 12, 15),
        )
        .await
        .unwrap();
    assert_eq!(consumed.status, OrderStatus::Consumed);
    assert!(consumed.live_consumption().is_some());

    // A second scan is refused: one live record per order.
    let err = stores
        .orders
        .record_consumption(
            id,
            "lea@site.example".into(),
            "main counter".into(),
            "scan-station-1".into(),
            at(date, 12, 16),
        )
        .await
        .unwrap_err();
    assert_eq!(err, OrderError::AlreadyConsumed(id));
}

#[tokio::test]
async fn consuming_a_cancelled_order_is_an_invalid_transition() {
    let stores = spawn_stores(vec![]);
    let date = d(2026, 3, 10);

    let id = stores
        .orders
        .place_order(internal_order("lea@site.example", date, dec!(11.50)))
        .await
        .unwrap();
    stores
        .orders
        .cancel_order(id, "sick leave".into(), "lea@site.example".into(), at(date, 9, 0))
        .await
        .unwrap();

    let err = stores
        .orders
        .record_consumption(
            id,
            "lea@site.example".into(),
            "main counter".into(),
            "scan-station-1".into(),
            at(date, 12, 0),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        OrderError::InvalidTransition {
            from: OrderStatus::Cancelled,
            to: OrderStatus::Consumed,
        }
    );
}

/// Real order actor with a mocked quota ledger: exercises the placement
/// side effects in isolation.
#[tokio::test]
async fn placement_reserves_quota_through_the_ledger_client() {
    let mut quota_mock = MockClient::<DailyQuota>::new();

    let group = capped_group(1, 5, false);
    let date = d(2026, 3, 10);
    let row = DailyQuota::from_group(&group, date);
    quota_mock
        .expect_command()
        .return_ok(QuotaReply::Quota(row));
    quota_mock.expect_command().return_ok(QuotaReply::Consumed);

    let quota_client = QuotaClient::new(quota_mock.client());
    let (order_actor, order_client) = order_book::new();
    let handle = tokio::spawn(order_actor.run(OrderContext {
        quotas: quota_client,
    }));

    let id = order_client
        .place_order(group_order(
            GroupId(1),
            date,
            ServicePeriod::Day,
            1,
            MealKind::Standard,
        ))
        .await
        .unwrap();
    assert!(order_client.get(id).await.unwrap().is_some());

    quota_mock.verify();
    drop(order_client);
    handle.await.unwrap();
}

/// The ledger's refusal propagates as a typed placement error.
#[tokio::test]
async fn placement_fails_when_the_ledger_refuses() {
    let mut quota_mock = MockClient::<DailyQuota>::new();

    let group = capped_group(1, 0, false);
    let date = d(2026, 3, 10);
    quota_mock
        .expect_command()
        .return_ok(QuotaReply::Quota(DailyQuota::from_group(&group, date)));
    quota_mock
        .expect_command()
        .return_err(canteen_actors::ActorError::entity(QuotaError::Exhausted {
            group: GroupId(1),
            date,
            period: ServicePeriod::Day,
            remaining: 0,
            requested: 1,
        }));

    let quota_client = QuotaClient::new(quota_mock.client());
    let (order_actor, order_client) = order_book::new();
    tokio::spawn(order_actor.run(OrderContext {
        quotas: quota_client,
    }));

    let err = order_client
        .place_order(group_order(
            GroupId(1),
            date,
            ServicePeriod::Day,
            1,
            MealKind::Standard,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::QuotaExhausted { .. }), "{err:?}");
    quota_mock.verify();
}
