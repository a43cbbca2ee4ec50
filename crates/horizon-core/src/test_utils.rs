//! Test utilities for horizon-core
//!
//! Record builders and the reference sample store (Ethiopian financial
//! inclusion indicators, Telebirr/M-Pesa events, NFIS-II targets).

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::{
    Confidence, Event, EventCategory, ImpactDirection, ImpactLink, Observation, Source, Target,
};
use crate::records::RecordStore;

fn ymd(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Minimal observation for an indicator
pub fn observation(code: &str, date: NaiveDate, value: f64) -> Observation {
    Observation {
        record_id: format!("OBS_{}_{}", code, date),
        indicator_code: code.to_string(),
        indicator: code.to_string(),
        date,
        value,
        pillar: None,
        source: Source::default(),
    }
}

/// Minimal event
pub fn event(id: &str, date: NaiveDate, category: EventCategory, label: &str) -> Event {
    Event {
        record_id: id.to_string(),
        date,
        category,
        label: label.to_string(),
        source: Source::default(),
        notes: None,
    }
}

/// Minimal impact link
pub fn link(id: &str, parent: &str, code: &str, estimate: f64, lag_months: i32) -> ImpactLink {
    ImpactLink {
        link_id: id.to_string(),
        parent_id: parent.to_string(),
        indicator_code: code.to_string(),
        estimate,
        lag_months,
        direction: Some(if estimate < 0.0 {
            ImpactDirection::Negative
        } else {
            ImpactDirection::Positive
        }),
        magnitude: None,
        evidence_basis: None,
        confidence: None,
        notes: None,
    }
}

/// Minimal target
pub fn target(code: &str, date: NaiveDate, value: f64) -> Target {
    Target {
        record_id: format!("TGT_{}", code),
        target_code: code.to_string(),
        label: code.to_string(),
        value,
        date,
        source: Source::default(),
    }
}

fn labelled(code: &str, label: &str, rows: &[(&str, f64)]) -> Vec<Observation> {
    rows.iter()
        .map(|(d, v)| Observation {
            indicator: label.to_string(),
            source: Source {
                name: Some("World Bank Global Findex".to_string()),
                url: None,
                confidence: Some(Confidence::High),
            },
            ..observation(code, ymd(d), *v)
        })
        .collect()
}

/// The reference fixture used across engine tests
pub fn sample_store() -> RecordStore {
    let mut observations = Vec::new();
    observations.extend(labelled(
        "ACC_OWNERSHIP",
        "Account Ownership Rate",
        &[
            ("2011-06-30", 14.0),
            ("2014-06-30", 22.0),
            ("2017-06-30", 35.0),
            ("2021-06-30", 46.0),
            ("2024-06-30", 49.0),
        ],
    ));
    observations.extend(labelled(
        "ACC_MM_ACCOUNT",
        "Mobile Money Account",
        &[
            ("2014-06-30", 1.5),
            ("2017-06-30", 4.7),
            ("2021-06-30", 4.7),
            ("2024-06-30", 9.45),
        ],
    ));
    observations.extend(labelled(
        "USG_DIGITAL_PAYMENT",
        "Digital Payment Usage",
        &[
            ("2017-06-30", 15.0),
            ("2021-06-30", 25.0),
            ("2024-06-30", 35.0),
        ],
    ));
    observations.extend(labelled(
        "MM_TELEBIRR_USERS",
        "Telebirr Users",
        &[
            ("2021-05-15", 0.0),
            ("2022-06-30", 20.0),
            ("2023-06-30", 34.3),
            ("2024-06-30", 54.84),
        ],
    ));

    let events = vec![
        event(
            "EVT_001",
            ymd("2021-05-15"),
            EventCategory::ProductLaunch,
            "Telebirr Launch",
        ),
        event(
            "EVT_002",
            ymd("2022-08-10"),
            EventCategory::Policy,
            "Telecom Liberalization",
        ),
        event(
            "EVT_003",
            ymd("2023-08-10"),
            EventCategory::ProductLaunch,
            "M-Pesa Launch",
        ),
        event(
            "EVT_004",
            ymd("2024-01-15"),
            EventCategory::Infrastructure,
            "EthSwitch Interoperability",
        ),
        event(
            "EVT_005",
            ymd("2023-03-01"),
            EventCategory::Policy,
            "NBE Digital Strategy",
        ),
    ];

    let impact_links = vec![
        link("IMP_001", "EVT_001", "ACC_MM_ACCOUNT", 4.0, 6),
        link("IMP_002", "EVT_001", "USG_DIGITAL_PAYMENT", 5.0, 12),
        link("IMP_003", "EVT_003", "ACC_MM_ACCOUNT", 2.0, 6),
        link("IMP_004", "EVT_003", "USG_DIGITAL_PAYMENT", 3.0, 12),
        link("IMP_005", "EVT_004", "USG_DIGITAL_PAYMENT", 4.0, 3),
        link("IMP_006", "EVT_004", "ACC_OWNERSHIP", 1.5, 6),
        link("IMP_007", "EVT_005", "ACC_OWNERSHIP", 2.0, 18),
        link("IMP_008", "EVT_002", "ACC_MM_ACCOUNT", 1.0, 12),
    ];

    let targets = vec![
        target("TGT_ACC_OWNERSHIP", ymd("2027-12-31"), 60.0),
        target("TGT_DIGITAL_PAYMENT", ymd("2027-12-31"), 50.0),
    ];

    let mappings = HashMap::from([
        (
            "TGT_ACC_OWNERSHIP".to_string(),
            "ACC_OWNERSHIP".to_string(),
        ),
        (
            "TGT_DIGITAL_PAYMENT".to_string(),
            "USG_DIGITAL_PAYMENT".to_string(),
        ),
    ]);

    RecordStore::new(observations, events, impact_links, targets).with_target_mappings(mappings)
}
