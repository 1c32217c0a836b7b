//! Band classification and template resolution properties

use netconv_band::{
    BandClassifier, DefaultTemplateResolver, SourceAttributes, Template, B2_THRESHOLD_GERAN,
    B2_THRESHOLD_GERAN_QCI1, UNKNOWN_BAND,
};
use netconv_model::{ObjectId, ParameterSet, StateMap};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn template() -> Template {
    Template::from_rows([
        ("Parametr", json!("Value")),
        ("nccperm", json!(1)),
        ("nccperm", json!(255)),
        ("hoPrio", json!("high")),
        (B2_THRESHOLD_GERAN, json!(r#"{"LTE_1800_20": -110}"#)),
        (B2_THRESHOLD_GERAN_QCI1, json!(r#"{"LTE_1800_20": -112}"#)),
    ])
    .unwrap()
}

fn cell(n: u32) -> ObjectId {
    ObjectId::new(format!("PLMN-PLMN/MRBTS-1/LNBTS-1/LNCEL-{n}/LNCEL_FDD-0")).unwrap()
}

#[test]
fn rows_drop_header_and_later_rows_win() {
    let template = template();
    assert!(!template.defaults().contains("Parametr"));
    assert_eq!(template.defaults().get("nccperm").unwrap().canonical(), "255");
    assert!(template.is_band_keyed(B2_THRESHOLD_GERAN));
    assert!(!template.defaults().contains(B2_THRESHOLD_GERAN));
}

#[test]
fn cell_attributes_resolve_onto_managed_child() {
    let cells = StateMap::from_iter([
        (cell(1), ParameterSet::new().with("earfcnDL", 1500_i64).with("dlChBw", "20 MHz")),
        (cell(2), ParameterSet::new().with("earfcnDL", 3000_i64).with("dlChBw", "15 MHz")),
    ]);
    let sources = SourceAttributes::from_cell_attributes(&cells, "LNHOG", "0");
    let resolver = DefaultTemplateResolver::new(template(), sources);

    let child = |n: u32| ObjectId::new(format!("PLMN-PLMN/MRBTS-1/LNBTS-1/LNCEL-{n}/LNHOG-0")).unwrap();
    let listed = resolver.resolve_effective_desired(&child(1), &ParameterSet::new()).unwrap();
    assert_eq!(listed.get(B2_THRESHOLD_GERAN_QCI1).unwrap().canonical(), "-112");

    let unlisted = resolver.resolve_effective_desired(&child(2), &ParameterSet::new()).unwrap();
    assert_eq!(unlisted.get(B2_THRESHOLD_GERAN).unwrap().canonical(), "-120");

    let error = resolver.resolve_effective_desired(&child(3), &ParameterSet::new()).unwrap_err();
    assert!(error.is_per_object());
}

#[test]
fn blank_width_resolves_to_fallback() {
    let cells = StateMap::from_iter([(
        cell(1),
        ParameterSet::new().with("earfcnDL", 1500_i64).with("dlChBw", " "),
    )]);
    let resolver = DefaultTemplateResolver::new(
        template(),
        SourceAttributes::from_cell_attributes(&cells, "LNHOG", "0"),
    );
    let id = ObjectId::new("PLMN-PLMN/MRBTS-1/LNBTS-1/LNCEL-1/LNHOG-0").unwrap();
    assert_eq!(resolver.band_key(&id).unwrap().as_str(), "LTE_1800_");

    let resolved = resolver.resolve_effective_desired(&id, &ParameterSet::new()).unwrap();
    assert_eq!(resolved.get(B2_THRESHOLD_GERAN).unwrap().canonical(), "-120");
    assert_eq!(resolved.get(B2_THRESHOLD_GERAN_QCI1).unwrap().canonical(), "-120");
}

proptest! {
    #[test]
    fn lte_1800_key(channel in 1200_i64..=1949, width in 1_u32..=20) {
        let key = BandClassifier::lte().band_key(channel, Some(&format!("{width} MHz"))).unwrap();
        prop_assert_eq!(key.as_str(), format!("LTE_1800_{width}"));
    }

    #[test]
    fn uncovered_channels_are_unknown(channel in 60_000_i64..1_000_000) {
        let classifier = BandClassifier::lte();
        prop_assert_eq!(classifier.band_label(channel), UNKNOWN_BAND);
    }

    #[test]
    fn dynamic_values_win(value in -200_i64..0, name in "[a-z]{3,8}") {
        let cells = StateMap::from_iter([(
            cell(1),
            ParameterSet::new().with("earfcnDL", 1500_i64).with("dlChBw", "20 MHz"),
        )]);
        let resolver = DefaultTemplateResolver::new(
            template(),
            SourceAttributes::from_cell_attributes(&cells, "LNHOG", "0"),
        );
        let id = ObjectId::new("PLMN-PLMN/MRBTS-1/LNBTS-1/LNCEL-1/LNHOG-0").unwrap();
        let dynamic = ParameterSet::new()
            .with(B2_THRESHOLD_GERAN, value)
            .with(name.clone(), value);
        let resolved = resolver.resolve_effective_desired(&id, &dynamic).unwrap();

        prop_assert_eq!(resolved.get(B2_THRESHOLD_GERAN).unwrap().canonical(), value.to_string());
        prop_assert_eq!(resolved.get(&name).unwrap().canonical(), value.to_string());
        prop_assert!(resolved.contains(B2_THRESHOLD_GERAN_QCI1));
        prop_assert!(resolved.contains("hoPrio"));
    }
}
