//! Shared wiring for integration tests: real store actors, no schedulers,
//! so every test drives the pipeline with pinned clocks.

#![allow(dead_code)]

use canteen_admin::clients::{ConfigClient, JournalClient, OrderBookClient, QuotaClient};
use canteen_admin::guard::IdempotencyGuard;
use canteen_admin::model::{
    ClientKind, FormulaId, Group, GroupCatalog, GroupId, MealKind, OrderCreate, ServicePeriod,
};
use canteen_admin::order_book::OrderContext;
use canteen_admin::{config_store, journal, order_book, quota};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

pub struct TestStores {
    pub orders: OrderBookClient,
    pub quotas: QuotaClient,
    pub config: ConfigClient,
    pub journal: JournalClient,
    pub guard: IdempotencyGuard,
}

/// Spawns the four store actors with the given group catalog.
pub fn spawn_stores(groups: Vec<Group>) -> TestStores {
    let catalog = GroupCatalog::new(groups);

    let (quota_actor, quota_client) = quota::new();
    let (order_actor, order_client) = order_book::new();
    let (config_actor, config_client) = config_store::new();
    let (journal_actor, journal_client) = journal::new();

    tokio::spawn(quota_actor.run(catalog));
    tokio::spawn(order_actor.run(OrderContext {
        quotas: quota_client.clone(),
    }));
    tokio::spawn(config_actor.run(()));
    tokio::spawn(journal_actor.run(()));

    TestStores {
        orders: order_client,
        quotas: quota_client,
        config: config_client,
        journal: journal_client.clone(),
        guard: IdempotencyGuard::new(journal_client),
    }
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0).unwrap()
}

pub fn internal_order(email: &str, date: NaiveDate, amount: Decimal) -> OrderCreate {
    OrderCreate {
        service_date: date,
        period: ServicePeriod::Day,
        quantity: 1,
        client: ClientKind::Internal {
            user_email: email.to_string(),
        },
        formula: FormulaId(1),
        meal: MealKind::Standard,
        amount,
        created_by: email.to_string(),
        created_at: at(date, 8, 0),
    }
}

pub fn group_order(
    group: GroupId,
    date: NaiveDate,
    period: ServicePeriod,
    quantity: u32,
    meal: MealKind,
) -> OrderCreate {
    OrderCreate {
        service_date: date,
        period,
        quantity,
        client: ClientKind::Group { group_id: group },
        formula: FormulaId(1),
        meal,
        amount: Decimal::new(1150, 2) * Decimal::from(quantity),
        created_by: "reception".to_string(),
        created_at: at(date, 8, 0),
    }
}

pub fn capped_group(id: u32, day_quota: u32, standard_only: bool) -> Group {
    Group {
        id: GroupId(id),
        name: format!("Group {id}"),
        code: format!("G{id}"),
        day_quota: Some(day_quota),
        night_quota: None,
        standard_only,
    }
}
