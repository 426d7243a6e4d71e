use crate::clients::{ConfigClient, JournalClient, OrderBookClient, QuotaClient};
use crate::guard::IdempotencyGuard;
use crate::model::{Group, GroupCatalog};
use crate::order_book::OrderContext;
use crate::scheduling::{
    self, AutoConfirmScheduler, BillingReconciler, ClosureScheduler, StatusSweepScheduler,
};
use crate::{config_store, journal, order_book, quota};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// The running canteen core: four store actors and four schedulers.
///
/// `CanteenSystem` owns the lifecycle: it creates the actors, wires their
/// dependencies, spawns the scheduler poll loops, and coordinates a clean
/// shutdown. The public clients are the only way in; clone them freely.
pub struct CanteenSystem {
    /// Client for the order book actor.
    pub orders: OrderBookClient,

    /// Client for the quota ledger actor.
    pub quotas: QuotaClient,

    /// Client for the configuration store actor.
    pub config: ConfigClient,

    /// Client for the job journal actor.
    pub journal: JournalClient,

    shutdown: watch::Sender<bool>,
    scheduler_handles: Vec<JoinHandle<()>>,
    order_handle: JoinHandle<()>,
    quota_handle: JoinHandle<()>,
    config_handle: JoinHandle<()>,
    journal_handle: JoinHandle<()>,
}

impl CanteenSystem {
    /// Creates and starts the whole system.
    ///
    /// Actors are created first (no dependencies), then started with their
    /// context injected: the order actor receives the quota client so group
    /// orders can reserve their slots. The schedulers share one shutdown
    /// signal and each gets its own clients and guard.
    pub fn start(groups: Vec<Group>) -> Self {
        let catalog = GroupCatalog::new(groups);

        // 1. Create actors.
        let (quota_actor, quota_client) = quota::new();
        let (order_actor, order_client) = order_book::new();
        let (config_actor, config_client) = config_store::new();
        let (journal_actor, journal_client) = journal::new();

        // 2. Start actors with injected context.
        let quota_handle = tokio::spawn(quota_actor.run(catalog));
        let order_handle = tokio::spawn(order_actor.run(OrderContext {
            quotas: quota_client.clone(),
        }));
        let config_handle = tokio::spawn(config_actor.run(()));
        let journal_handle = tokio::spawn(journal_actor.run(()));

        // 3. Spawn the scheduler poll loops.
        let (shutdown, shutdown_rx) = watch::channel(false);
        let guard = IdempotencyGuard::new(journal_client.clone());
        let scheduler_handles = vec![
            scheduling::spawn(
                ClosureScheduler::new(
                    order_client.clone(),
                    config_client.clone(),
                    guard.clone(),
                ),
                shutdown_rx.clone(),
            ),
            scheduling::spawn(
                StatusSweepScheduler::new(order_client.clone(), guard.clone()),
                shutdown_rx.clone(),
            ),
            scheduling::spawn(
                BillingReconciler::new(
                    order_client.clone(),
                    config_client.clone(),
                    guard.clone(),
                ),
                shutdown_rx.clone(),
            ),
            scheduling::spawn(
                AutoConfirmScheduler::new(order_client.clone(), config_client.clone(), guard),
                shutdown_rx,
            ),
        ];

        info!("Canteen system started");

        Self {
            orders: order_client,
            quotas: quota_client,
            config: config_client,
            journal: journal_client,
            shutdown,
            scheduler_handles,
            order_handle,
            quota_handle,
            config_handle,
            journal_handle,
        }
    }

    /// Gracefully shuts the system down.
    ///
    /// Schedulers observe the signal between iterations, so in-flight store
    /// commands run to completion. Actors drain and exit as their last
    /// client drops; the order actor goes first because its context holds a
    /// quota client.
    pub async fn shutdown(self) {
        let Self {
            orders,
            quotas,
            config,
            journal,
            shutdown,
            scheduler_handles,
            order_handle,
            quota_handle,
            config_handle,
            journal_handle,
        } = self;

        info!("Shutting down canteen system");
        let _ = shutdown.send(true);
        for handle in scheduler_handles {
            let _ = handle.await;
        }

        drop(orders);
        let _ = order_handle.await;
        drop(quotas);
        let _ = quota_handle.await;
        drop(config);
        let _ = config_handle.await;
        drop(journal);
        let _ = journal_handle.await;

        info!("Canteen system stopped");
    }
}
