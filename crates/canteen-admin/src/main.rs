//! Demo host: wires the canteen system, seeds a little data, and exercises
//! one billing pass end to end.

use canteen_actors::tracing::setup_tracing;
use canteen_admin::clients::ConfigClient;
use canteen_admin::guard::IdempotencyGuard;
use canteen_admin::lifecycle::CanteenSystem;
use canteen_admin::model::config::keys;
use canteen_admin::model::{
    ClientKind, FormulaId, Group, GroupId, MealKind, OrderCreate, ServicePeriod,
};
use canteen_admin::scheduling::{BillingReconciler, ScheduledJob};
use chrono::{Days, Local};
use rust_decimal::Decimal;
use tracing::info;

async fn seed_config(config: &ConfigClient) -> Result<(), String> {
    let entries = [
        (keys::BILLING_ACTIVE, "1", "Bill unconsumed past orders"),
        (keys::BILLING_PERCENTAGE, "80", "Charge 80% of the amount"),
        (keys::BILLING_GRACE_ABSENCES, "0", "No free absences"),
        (keys::CLOSURE_WEEKDAY, "5", "Close orders on Friday"),
        (keys::CLOSURE_HOUR, "12", "Close orders at noon"),
        (keys::AUTO_CONFIRMATION, "0", "Badge scans required"),
    ];
    for (key, value, description) in entries {
        config
            .set(key, value, Some(description))
            .await
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting canteen administration core");

    let groups = vec![Group {
        id: GroupId(1),
        name: "Chantier Est".to_string(),
        code: "CE".to_string(),
        day_quota: Some(40),
        night_quota: None,
        standard_only: true,
    }];
    let system = CanteenSystem::start(groups);

    seed_config(&system.config).await?;

    let now = Local::now().naive_local();
    let today = now.date();
    let yesterday = today - Days::new(1);

    // An internal order from yesterday that was never picked up: billing
    // fodder.
    let missed = system
        .orders
        .place_order(OrderCreate {
            service_date: yesterday,
            period: ServicePeriod::Day,
            quantity: 1,
            client: ClientKind::Internal {
                user_email: "lea.martin@site.example".to_string(),
            },
            formula: FormulaId(3),
            meal: MealKind::Standard,
            amount: Decimal::new(1150, 2),
            created_by: "lea.martin@site.example".to_string(),
            created_at: now,
        })
        .await
        .map_err(|e| e.to_string())?;
    info!(order_id = %missed, "Placed yesterday's unconsumed order");

    // A group order for today, consumed at the counter.
    let group_order = system
        .orders
        .place_order(OrderCreate {
            service_date: today,
            period: ServicePeriod::Day,
            quantity: 2,
            client: ClientKind::Group {
                group_id: GroupId(1),
            },
            formula: FormulaId(3),
            meal: MealKind::Standard,
            amount: Decimal::new(2300, 2),
            created_by: "reception".to_string(),
            created_at: now,
        })
        .await
        .map_err(|e| e.to_string())?;
    system
        .orders
        .record_consumption(
            group_order,
            "chef.chantier@site.example".to_string(),
            "main counter".to_string(),
            "scan-station-1".to_string(),
            now,
        )
        .await
        .map_err(|e| e.to_string())?;
    info!(order_id = %group_order, "Group order placed and scanned");

    // Drive one billing pass by hand instead of waiting for the hourly poll.
    let reconciler = BillingReconciler::new(
        system.orders.clone(),
        system.config.clone(),
        IdempotencyGuard::new(system.journal.clone()),
    );
    let outcome = reconciler.run_once(now).await.map_err(|e| e.to_string())?;
    info!(?outcome, "First billing pass");

    // The day marker makes the second pass a no-op.
    let repeat = reconciler.run_once(now).await.map_err(|e| e.to_string())?;
    info!(?repeat, "Second billing pass");

    system.shutdown().await;

    info!("Done");
    Ok(())
}
