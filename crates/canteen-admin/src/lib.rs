//! # Canteen Administration Core
//!
//! Order lifecycle, quota bookkeeping, and the scheduled reconciliation and
//! billing pipeline of a canteen administration platform, built on the
//! store-actor framework in `canteen-actors`.
//!
//! ## Architecture
//!
//! - **[model]**: domain data types (orders, consumption records, quotas,
//!   configuration entries, journal lines) and the order status machine.
//! - **[order_book]**, **[quota]**, **[config_store]**, **[journal]**: one
//!   store actor per data family. Each actor owns its state exclusively and
//!   processes messages sequentially, so a batch command (nightly sweep,
//!   billing application) is atomic.
//! - **[clients]**: type-safe wrappers hiding the message passing.
//! - **[billing]**: the pure billing decision walk and its policy.
//! - **[scheduling]**: the poll-loop harness and the four background jobs
//!   (weekly closure, nightly sweep, daily billing, evening
//!   auto-confirmation), each guarded by the durable once-per-day journal
//!   marker in [`guard`].
//! - **[lifecycle]**: orchestration of startup, wiring, and shutdown.

pub mod billing;
pub mod clients;
pub mod config_store;
pub mod guard;
pub mod journal;
pub mod lifecycle;
pub mod model;
pub mod order_book;
pub mod quota;
pub mod scheduling;
