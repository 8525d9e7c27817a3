use crate::derived_field::check_digit_rule::CheckDigitRuleConfig;
use crate::derived_field::config::{
    DerivedFieldRule, InvalidIdentifierPolicy, RuleConfig, UpdaterConfig,
};
use crate::derived_field::error::{CreateUpdaterError, UpdateError};
use crate::derived_field::full_name_rule::FullNameRuleConfig;
use crate::derived_field::{DerivedFieldUpdater, FieldUpdate, FormEvent};
use crate::simple_record::SimpleRecord;
use crate::tercero::Tercero;
use crate::validation::{CheckDigitError, InvalidIdentifierReason};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};


fn tercero_updater() -> DerivedFieldUpdater {
    UpdaterConfig::dian_tercero().build().unwrap()
}

fn writes(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

#[test]
fn changing_the_nit_updates_only_the_check_digit() {
    let updater = tercero_updater();
    let mut record = SimpleRecord::new(&[("nit", "800.197.268"), ("primer_nombre", "Ana")]);

    let updates = updater.on_field_change(&mut record, "nit").unwrap();

    assert_eq!(
        updates,
        vec![FieldUpdate {
            rule_index: 0,
            field: "div".to_string(),
            value: "4".to_string(),
            invalid_identifier: None,
        }]
    );
    assert_eq!(record.writes(), writes(&[("div", "4")]));
    assert_eq!(record.get("nombre_completo"), None);
}

#[test]
fn changing_a_name_part_updates_only_the_full_name() {
    let updater = tercero_updater();
    let mut record = SimpleRecord::new(&[
        ("nit", "800197268"),
        ("primer_apellido", "Gomez"),
        ("primer_nombre", "Ana"),
    ]);

    for field in [
        "razon_social",
        "primer_apellido",
        "segundo_apellido",
        "primer_nombre",
        "otros_nombres",
    ] {
        record.clear_writes();
        let updates = updater.on_field_change(&mut record, field).unwrap();
        assert_eq!(updates.len(), 1, "field: {field}");
        assert_eq!(record.writes(), writes(&[("nombre_completo", "Gomez Ana")]));
    }
    assert_eq!(record.get("div"), None);
}

#[test]
fn refresh_runs_every_rule_in_order() {
    let updater = tercero_updater();
    let mut record = SimpleRecord::new(&[
        ("nit", "900373051"),
        ("razon_social", ""),
        ("primer_apellido", "Gomez"),
        ("segundo_apellido", ""),
        ("primer_nombre", "Ana"),
        ("otros_nombres", ""),
    ]);

    let updates = updater.handle(&mut record, FormEvent::Refresh).unwrap();

    assert_eq!(
        updates.iter().map(|u| u.rule_index).collect::<Vec<_>>(),
        vec![0, 1]
    );
    assert_eq!(
        record.writes(),
        writes(&[("div", "0"), ("nombre_completo", "Gomez Ana")])
    );
}

#[test]
fn unrelated_field_changes_nothing() {
    let updater = tercero_updater();
    let mut record = SimpleRecord::new(&[("nit", "800197268"), ("pais", "Colombia")]);

    let updates = updater
        .handle(&mut record, FormEvent::FieldChanged("pais"))
        .unwrap();

    assert!(updates.is_empty());
    assert!(record.writes().is_empty());
}

#[test]
fn emptying_the_nit_clears_the_check_digit() {
    let updater = tercero_updater();
    let mut record = SimpleRecord::new(&[("nit", "800197268")]);
    updater.on_field_change(&mut record, "nit").unwrap();
    assert_eq!(record.get("div"), Some("4"));

    record.edit("nit", "");
    let updates = updater.on_field_change(&mut record, "nit").unwrap();

    assert_eq!(record.get("div"), Some(""));
    assert_eq!(updates[0].invalid_identifier, None);
}

#[test]
fn recomputing_is_idempotent() {
    let updater = tercero_updater();
    let mut record = SimpleRecord::new(&[("nit", "860.002.964"), ("razon_social", "ACME")]);

    let first = updater.on_refresh(&mut record).unwrap();
    let after_first = record.clone();
    let second = updater.on_refresh(&mut record).unwrap();

    assert_eq!(first, second);
    assert_eq!(record.get("div"), after_first.get("div"));
    assert_eq!(record.get("nombre_completo"), after_first.get("nombre_completo"));
}

#[test]
fn invalid_nit_clears_the_check_digit_silently_by_default() {
    let updater = tercero_updater();
    let mut record = SimpleRecord::new(&[("nit", "800197268")]);
    updater.on_field_change(&mut record, "nit").unwrap();

    record.edit("nit", "80019726X");
    let updates = updater.on_field_change(&mut record, "nit").unwrap();

    assert_eq!(record.get("div"), Some(""));
    assert_eq!(
        updates[0].invalid_identifier,
        Some(CheckDigitError::InvalidIdentifier(
            InvalidIdentifierReason::NonDigit
        ))
    );
}

#[test]
fn invalid_nit_is_reported_when_asked() {
    let updater = UpdaterConfig::dian_tercero()
        .invalid_identifier_policy(InvalidIdentifierPolicy::Report)
        .build()
        .unwrap();
    let mut record = SimpleRecord::new(&[
        ("nit", "8001972681234567"),
        ("div", "4"),
        ("primer_nombre", "Ana"),
    ]);

    let result = updater.on_refresh(&mut record);

    assert_eq!(
        result,
        Err(UpdateError::InvalidIdentifier {
            source_field: "nit".to_string(),
            target_field: "div".to_string(),
            error: CheckDigitError::InvalidIdentifier(InvalidIdentifierReason::TooLong {
                length: 16,
                max: 15
            }),
        })
    );
    // the stale digit is gone and the other rule still ran
    assert_eq!(record.get("div"), Some(""));
    assert_eq!(record.get("nombre_completo"), Some("Ana"));
}

#[test]
fn report_policy_passes_valid_nits() {
    let updater = UpdaterConfig::dian_tercero()
        .invalid_identifier_policy(InvalidIdentifierPolicy::Report)
        .build()
        .unwrap();
    let mut record = SimpleRecord::new(&[("nit", "")]);

    assert!(updater.on_refresh(&mut record).is_ok());
    assert_eq!(record.get("div"), Some(""));
}

#[test]
fn updates_a_typed_tercero() {
    let updater = tercero_updater();
    let mut tercero = Tercero::new("800.197.268");
    tercero.razon_social = Some("U.A.E. DIAN".to_string());

    updater.on_refresh(&mut tercero).unwrap();

    assert_eq!(tercero.div.as_deref(), Some("4"));
    assert_eq!(tercero.nombre_completo.as_deref(), Some("U.A.E. DIAN"));
    assert_eq!(tercero.party_label(), "800.197.268: U.A.E. DIAN");

    tercero.nit = String::new();
    updater.on_field_change(&mut tercero, "nit").unwrap();
    assert_eq!(tercero.div, None);
}

#[test]
fn several_rules_on_the_same_source() {
    let rules: Vec<Arc<dyn RuleConfig>> = vec![
        CheckDigitRuleConfig::new("nit", "div").build(),
        FullNameRuleConfig::new(&["nit", "nit", "name"], "label")
            .separator(" - ")
            .build(),
    ];
    let updater = DerivedFieldUpdater::builder(&rules).build().unwrap();
    let mut record = SimpleRecord::new(&[("nit", "52"), ("name", "Ana")]);

    let updates = updater.on_field_change(&mut record, "nit").unwrap();

    // the second rule lists `nit` twice but runs once
    assert_eq!(updates.len(), 2);
    assert_eq!(
        record.writes(),
        writes(&[("div", "3"), ("label", "52 - 52 - Ana")])
    );
}

#[test]
fn duplicate_targets_are_rejected() {
    let rules: Vec<Arc<dyn RuleConfig>> = vec![
        CheckDigitRuleConfig::new("nit", "div").build(),
        FullNameRuleConfig::new(&["name"], "full_name").build(),
        CheckDigitRuleConfig::new("other_nit", "div").build(),
    ];

    assert_eq!(
        DerivedFieldUpdater::builder(&rules).build().err(),
        Some(CreateUpdaterError::DuplicateTarget {
            first_rule_index: 0,
            rule_index: 2,
            field: "div".to_string(),
        })
    );
}

#[test]
fn invalid_rule_fails_the_build() {
    let rules: Vec<Arc<dyn RuleConfig>> = vec![
        CheckDigitRuleConfig::new("nit", "div").build(),
        FullNameRuleConfig::new(&["name", "label"], "label").build(),
    ];

    assert_eq!(
        DerivedFieldUpdater::builder(&rules).build().err(),
        Some(CreateUpdaterError::TargetIsSource {
            rule_index: 1,
            field: "label".to_string(),
        })
    );
}

#[test]
fn empty_updater_does_nothing() {
    let updater = UpdaterConfig::default().build().unwrap();
    let mut record = SimpleRecord::new(&[("nit", "800197268")]);

    assert_eq!(updater.rule_count(), 0);
    assert_eq!(updater.on_refresh(&mut record), Ok(vec![]));
    assert_eq!(updater.on_field_change(&mut record, "nit"), Ok(vec![]));
    assert!(record.writes().is_empty());
}

#[test]
fn updater_from_json_config() {
    let updater = UpdaterConfig::from_json(
        r#"{"rules": [{"type": "CheckDigit", "source": "tax_id", "target": "tax_id_dv"}]}"#,
    )
    .unwrap()
    .build()
    .unwrap();
    let mut doc = serde_json::json!({"tax_id": 800197268});

    updater.on_field_change(&mut doc, "tax_id").unwrap();

    assert_eq!(doc["tax_id_dv"], serde_json::json!("4"));
}

#[test]
fn rules_reading_a_derived_field_are_rejected() {
    let config = UpdaterConfig {
        rules: vec![
            DerivedFieldRule::FullName(FullNameRuleConfig::new(&["raw_nit"], "nit")),
            DerivedFieldRule::CheckDigit(CheckDigitRuleConfig::new("nit", "div")),
        ],
        ..UpdaterConfig::default()
    };

    // `div` would keep the digit of the previous `nit` when `raw_nit` changes
    assert_eq!(
        config.build().err(),
        Some(CreateUpdaterError::SourceIsDerived {
            target_rule_index: 0,
            rule_index: 1,
            field: "nit".to_string(),
        })
    );
}

#[test]
fn derived_field_read_by_an_earlier_rule_is_rejected() {
    let rules: Vec<Arc<dyn RuleConfig>> = vec![
        CheckDigitRuleConfig::new("nit", "div").build(),
        FullNameRuleConfig::new(&["raw_nit"], "nit").build(),
    ];

    assert_eq!(
        DerivedFieldUpdater::builder(&rules).build().err(),
        Some(CreateUpdaterError::SourceIsDerived {
            target_rule_index: 1,
            rule_index: 0,
            field: "nit".to_string(),
        })
    );
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn clearing_the_check_digit_is_logged() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let updater = tercero_updater();
        let mut record = SimpleRecord::new(&[("nit", "80019726X")]);
        updater.on_field_change(&mut record, "nit").unwrap();
    });

    let logs = logs.contents();
    assert!(logs.contains("DEBUG"), "{logs}");
    assert!(
        logs.contains("identifier is not computable, clearing the dependent field"),
        "{logs}"
    );
    assert!(logs.contains("source_field=nit"), "{logs}");
    assert!(logs.contains("target_field=div"), "{logs}");
}

#[test]
fn valid_nit_logs_nothing() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let updater = tercero_updater();
        let mut record = SimpleRecord::new(&[("nit", "800197268")]);
        updater.on_field_change(&mut record, "nit").unwrap();
    });

    assert_eq!(logs.contents(), "");
}
