//! Impact resolution
//!
//! Pairs impact links with their parent events and computes when each
//! modeled effect switches on. A link whose parent event cannot be found is
//! inert: it is skipped, never an error.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Event, ImpactLink};
use crate::records::RecordStore;

/// An impact link bound to its event, with the date its effect begins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedImpact {
    pub link_id: String,
    pub event_id: String,
    pub event_label: String,
    pub indicator_code: String,
    /// Signed, percentage points
    pub estimate: f64,
    pub lag_months: i32,
    pub activation_date: NaiveDate,
}

impl ResolvedImpact {
    /// Whether the effect applies to a point dated `date`
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.activation_date
    }
}

/// Event date shifted by whole calendar months.
///
/// Day-of-month is kept where it exists and clamped to the month's last day
/// otherwise (Jan 31 + 1 month = Feb 28/29). Negative lags move backwards.
pub fn activation_date(event_date: NaiveDate, lag_months: i32) -> Option<NaiveDate> {
    let months = Months::new(lag_months.unsigned_abs());
    if lag_months >= 0 {
        event_date.checked_add_months(months)
    } else {
        event_date.checked_sub_months(months)
    }
}

fn bind(event: &Event, link: &ImpactLink) -> Option<ResolvedImpact> {
    let Some(activation) = activation_date(event.date, link.lag_months) else {
        debug!(
            link = %link.link_id,
            lag = link.lag_months,
            "Activation date out of range; skipping impact link"
        );
        return None;
    };

    Some(ResolvedImpact {
        link_id: link.link_id.clone(),
        event_id: event.record_id.clone(),
        event_label: event.label.clone(),
        indicator_code: link.indicator_code.clone(),
        estimate: link.estimate,
        lag_months: link.lag_months,
        activation_date: activation,
    })
}

/// Links belonging to `event` (exact id match), each with its activation date
pub fn resolve_event_impacts(event: &Event, links: &[ImpactLink]) -> Vec<ResolvedImpact> {
    links
        .iter()
        .filter(|l| l.parent_id == event.record_id)
        .filter_map(|l| bind(event, l))
        .collect()
}

/// Every resolvable impact aimed at an indicator. Inert links are dropped.
pub fn resolve_indicator_impacts(store: &RecordStore, indicator_code: &str) -> Vec<ResolvedImpact> {
    store
        .links_for_indicator(indicator_code)
        .into_iter()
        .filter_map(|link| match store.event(&link.parent_id) {
            Some(event) => bind(event, link),
            None => {
                debug!(
                    link = %link.link_id,
                    parent = %link.parent_id,
                    "Impact link references unknown event; ignoring"
                );
                None
            }
        })
        .collect()
}

/// Links in the store whose parent event does not exist
pub fn inert_links(store: &RecordStore) -> Vec<&ImpactLink> {
    store
        .impact_links()
        .iter()
        .filter(|l| store.event(&l.parent_id).is_none())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventCategory;
    use crate::test_utils::{event, link, sample_store};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_activation_date_calendar_months() {
        assert_eq!(
            activation_date(date(2021, 5, 15), 6),
            Some(date(2021, 11, 15))
        );
        assert_eq!(
            activation_date(date(2023, 8, 10), 12),
            Some(date(2024, 8, 10))
        );
        assert_eq!(activation_date(date(2024, 1, 15), 0), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_activation_date_clamps_to_month_end() {
        assert_eq!(activation_date(date(2023, 1, 31), 1), Some(date(2023, 2, 28)));
        assert_eq!(activation_date(date(2024, 1, 31), 1), Some(date(2024, 2, 29)));
        assert_eq!(activation_date(date(2023, 8, 31), 1), Some(date(2023, 9, 30)));
    }

    #[test]
    fn test_activation_date_negative_lag() {
        assert_eq!(activation_date(date(2021, 5, 15), -3), Some(date(2021, 2, 15)));
    }

    #[test]
    fn test_resolve_event_impacts_exact_match() {
        let evt = event("EVT_001", date(2021, 5, 15), EventCategory::ProductLaunch, "Telebirr Launch");
        let links = vec![
            link("IMP_001", "EVT_001", "ACC_MM_ACCOUNT", 4.0, 6),
            link("IMP_002", "EVT_001", "USG_DIGITAL_PAYMENT", 5.0, 12),
            link("IMP_003", "EVT_0011", "ACC_MM_ACCOUNT", 2.0, 6),
            link("IMP_004", "evt_001", "ACC_MM_ACCOUNT", 2.0, 6),
        ];

        let resolved = resolve_event_impacts(&evt, &links);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].link_id, "IMP_001");
        assert_eq!(resolved[0].activation_date, date(2021, 11, 15));
        assert_eq!(resolved[1].activation_date, date(2022, 5, 15));
    }

    #[test]
    fn test_telebirr_activation_boundary() {
        let store = sample_store();
        let resolved = resolve_indicator_impacts(&store, "ACC_MM_ACCOUNT");
        let telebirr = resolved.iter().find(|r| r.link_id == "IMP_001").unwrap();

        assert_eq!(telebirr.activation_date, date(2021, 11, 15));
        assert!(telebirr.is_active_on(date(2022, 6, 30)));
        assert!(telebirr.is_active_on(date(2021, 11, 15)));
        assert!(!telebirr.is_active_on(date(2021, 6, 30)));
    }

    #[test]
    fn test_inert_links_ignored() {
        let store = crate::records::RecordStore::new(
            vec![],
            vec![event("EVT_1", date(2020, 1, 1), EventCategory::Market, "Real")],
            vec![
                link("IMP_1", "EVT_1", "X", 1.0, 0),
                link("IMP_2", "EVT_MISSING", "X", 9.0, 0),
                link("IMP_3", "", "X", 9.0, 0),
            ],
            vec![],
        );

        let resolved = resolve_indicator_impacts(&store, "X");
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].link_id, "IMP_1");

        let inert: Vec<&str> = inert_links(&store).iter().map(|l| l.link_id.as_str()).collect();
        assert_eq!(inert, vec!["IMP_2", "IMP_3"]);
    }

    #[test]
    fn test_resolve_indicator_without_links() {
        let store = sample_store();
        assert!(resolve_indicator_impacts(&store, "MM_TELEBIRR_USERS").is_empty());
    }
}
