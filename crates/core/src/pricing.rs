//! Order total computation against the service catalog.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::Cents;

/// Highest base price a catalog entry may carry ($1,000,000.00).
pub const MAX_SERVICE_PRICE_CENTS: Cents = 100_000_000;

/// A priced entry in the service catalog.
///
/// Implemented by the `service_pricing` row model so pricing stays free of
/// database types.
pub trait PricedService {
    fn name(&self) -> &str;
    fn base_price_cents(&self) -> Cents;
    fn is_active(&self) -> bool;
}

/// Sum the base prices of `selected` services.
///
/// Every selected name must match an active catalog entry exactly, and
/// each may appear only once. An empty selection is rejected.
pub fn order_total<S: PricedService>(selected: &[String], catalog: &[S]) -> Result<Cents, CoreError> {
    if selected.is_empty() {
        return Err(CoreError::Validation(
            "At least one service must be selected".into(),
        ));
    }

    let mut seen = HashSet::with_capacity(selected.len());
    let mut total: Cents = 0;

    for name in selected {
        if !seen.insert(name.as_str()) {
            return Err(CoreError::Validation(format!(
                "Service '{name}' was selected more than once"
            )));
        }

        let entry = catalog
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| CoreError::Validation(format!("Unknown service '{name}'")))?;

        if !entry.is_active() {
            return Err(CoreError::Validation(format!(
                "Service '{name}' is not currently offered"
            )));
        }

        total = total
            .checked_add(entry.base_price_cents())
            .ok_or_else(|| CoreError::Validation("Order total is out of range".into()))?;
    }

    Ok(total)
}

/// Format cents as a US-dollar string, e.g. `$1,234.50`.
pub fn format_usd(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = (abs / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{:02}", abs % 100)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    struct Svc(&'static str, Cents, bool);

    impl PricedService for Svc {
        fn name(&self) -> &str {
            self.0
        }
        fn base_price_cents(&self) -> Cents {
            self.1
        }
        fn is_active(&self) -> bool {
            self.2
        }
    }

    fn catalog() -> Vec<Svc> {
        vec![
            Svc("HDR Photography", 19_900, true),
            Svc("Drone", 14_900, true),
            Svc("3D Tour", 24_900, true),
            Svc("Twilight Photos", 9_900, false),
        ]
    }

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sums_selected_services() {
        let total = order_total(&names(&["HDR Photography", "Drone"]), &catalog()).unwrap();
        assert_eq!(total, 34_800);
    }

    #[test]
    fn empty_selection_rejected() {
        assert_matches!(order_total(&[], &catalog()), Err(CoreError::Validation(_)));
    }

    #[test]
    fn unknown_service_rejected() {
        let err = order_total(&names(&["Helicopter"]), &catalog());
        assert_matches!(err, Err(CoreError::Validation(msg)) if msg.contains("Unknown service"));
    }

    #[test]
    fn inactive_service_rejected() {
        let err = order_total(&names(&["Twilight Photos"]), &catalog());
        assert_matches!(err, Err(CoreError::Validation(msg)) if msg.contains("not currently offered"));
    }

    #[test]
    fn duplicate_selection_rejected() {
        let err = order_total(&names(&["Drone", "Drone"]), &catalog());
        assert_matches!(err, Err(CoreError::Validation(msg)) if msg.contains("more than once"));
    }

    #[test]
    fn overflowing_total_rejected() {
        let catalog = vec![Svc("Estate", Cents::MAX, true), Svc("Drone", 1, true)];
        let err = order_total(&names(&["Estate", "Drone"]), &catalog);
        assert_matches!(err, Err(CoreError::Validation(msg)) if msg.contains("out of range"));
    }

    #[test]
    fn formats_dollars() {
        assert_eq!(format_usd(0), "$0.00");
        assert_eq!(format_usd(34_800), "$348.00");
        assert_eq!(format_usd(123_456_789), "$1,234,567.89");
        assert_eq!(format_usd(-1_050), "-$10.50");
    }
}
