//! Domain data types: orders, consumption records, quotas, configuration
//! entries, and the job journal.

pub mod config;
pub mod journal;
pub mod order;
pub mod quota;
pub mod status;

pub use config::{ConfigEntry, ConfigSet};
pub use journal::{JobName, JournalAppend, JournalEntry, JournalOutcome};
pub use order::{
    ClientKind, ConsumptionOutcome, ConsumptionRecord, FormulaId, MealKind, Order, OrderCreate,
    OrderId, ServicePeriod,
};
pub use quota::{DailyQuota, Group, GroupCatalog, GroupId, QuotaKey};
pub use status::OrderStatus;
