//! Type-safe client wrappers hiding the message passing behind each store
//! actor.

pub mod config_client;
pub mod journal_client;
pub mod order_client;
pub mod quota_client;

pub use config_client::ConfigClient;
pub use journal_client::JournalClient;
pub use order_client::OrderBookClient;
pub use quota_client::QuotaClient;
