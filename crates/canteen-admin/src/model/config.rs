//! Configuration entries and the operational keys this core reads.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

/// Keys consumed by the schedulers. Idempotency and error markers live in
/// the job journal, not here.
pub mod keys {
    /// Weekday of the weekly order closure, 1 = Monday … 7 = Sunday.
    pub const CLOSURE_WEEKDAY: &str = "COMMANDE_JOUR_CLOTURE";
    /// Hour of day (0–23) of the weekly order closure.
    pub const CLOSURE_HOUR: &str = "COMMANDE_HEURE_CLOTURE";
    /// Enables the evening auto-confirmation of same-day orders.
    pub const AUTO_CONFIRMATION: &str = "COMMANDE_AUTO_CONFIRMATION";
    /// Master switch for billing unconsumed orders.
    pub const BILLING_ACTIVE: &str = "FACTURATION_NON_CONSOMMEES_ACTIVE";
    /// Percentage of the order amount to charge, 0–100.
    pub const BILLING_PERCENTAGE: &str = "FACTURATION_POURCENTAGE";
    /// Free grace absences per user before charges apply.
    pub const BILLING_GRACE_ABSENCES: &str = "FACTURATION_ABSENCES_GRATUITES";
    /// Free-cancellation window in hours. Loaded but not used by the
    /// exemption walk.
    pub const BILLING_FREE_CANCEL_HOURS: &str = "FACTURATION_DELAI_ANNULATION_GRATUITE";
    /// Whether weekend orders are billed.
    pub const BILLING_WEEKENDS: &str = "FACTURATION_WEEKEND";
    /// Whether public-holiday orders are billed.
    pub const BILLING_HOLIDAYS: &str = "FACTURATION_JOURS_FERIES";
}

/// A key/value configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub deleted: bool,
}

/// Payload for storing a configuration entry.
#[derive(Debug, Clone)]
pub struct ConfigSet {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

/// Parses an optional raw value, falling back to `default` when the value is
/// absent or unparseable. Misconfiguration must never crash a scheduler, so
/// the failure is only logged.
pub fn parse_or<T>(raw: Option<&str>, default: T, key: &str) -> T
where
    T: FromStr + Display + Copy,
{
    match raw {
        None => default,
        Some(text) => match text.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = text, %default, "Unparseable config value, using default");
                default
            }
        },
    }
}

/// Parses a boolean flag: `1`, `true`, `oui` (any case) are true; everything
/// else, including an absent value, falls back to `default`.
pub fn parse_flag(raw: Option<&str>, default: bool, key: &str) -> bool {
    match raw {
        None => default,
        Some(text) => match text.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "oui" => true,
            "0" | "false" | "non" => false,
            other => {
                warn!(key, value = other, default, "Unparseable config flag, using default");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_falls_back_on_garbage() {
        assert_eq!(parse_or(Some("not-a-number"), 12u32, "K"), 12);
        assert_eq!(parse_or(None, 12u32, "K"), 12);
        assert_eq!(parse_or(Some(" 15 "), 12u32, "K"), 15);
    }

    #[test]
    fn parse_flag_accepts_common_spellings() {
        assert!(parse_flag(Some("1"), false, "K"));
        assert!(parse_flag(Some("TRUE"), false, "K"));
        assert!(parse_flag(Some("oui"), false, "K"));
        assert!(!parse_flag(Some("non"), true, "K"));
        assert!(parse_flag(Some("maybe"), true, "K"));
        assert!(!parse_flag(None, false, "K"));
    }
}
