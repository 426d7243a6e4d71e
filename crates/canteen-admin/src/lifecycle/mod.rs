//! # System Lifecycle & Orchestration
//!
//! Wiring the actors together is where the coordination complexity lives:
//! creation order, dependency injection, and clean termination. This module
//! provides the conductor.
//!
//! ## The wiring pattern
//!
//! 1. **Create** every actor first; none has dependencies at construction.
//! 2. **Start** each actor with its context injected (the order actor gets
//!    the quota client).
//! 3. **Spawn** the scheduler poll loops with a shared shutdown signal.
//!
//! ## Shutdown
//!
//! 1. Flip the shutdown watch; schedulers exit between iterations, so an
//!    in-flight store command always finishes.
//! 2. Drop the clients; each actor detects channel closure, drains its
//!    mailbox, logs its final state, and exits.
//! 3. Await every task. The dependency graph is acyclic (orders depend on
//!    quotas only), so the drop order in [`CanteenSystem::shutdown`]
//!    terminates deterministically.

pub mod system;

pub use system::CanteenSystem;
