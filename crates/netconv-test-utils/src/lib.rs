//! Testing utilities for the netconv workspace
//!
//! Shared fixtures: cell DNs, a band-keyed template and a small simulated
//! region exercising every reconciliation path.

#![allow(missing_docs)]

use netconv_band::{Template, B2_THRESHOLD_GERAN, B2_THRESHOLD_GERAN_QCI1};
use netconv_core::{CellTarget, NetworkSnapshot, Neighbour, RunConfig, SimulatedNetwork};
use netconv_engine::{OperationMode, GERAN_FREQUENCY_LIST};
use netconv_model::{ObjectId, ParamValue, ParameterSet, StateMap};
use serde_json::json;

pub const REGION: &str = "North";
pub const REPORT_PREFIX: &str = "weekly";

pub fn cell_dn(n: u32) -> ObjectId {
    ObjectId::new(format!("PLMN-PLMN/MRBTS-{n}/LNBTS-{n}/LNCEL-{n}")).unwrap()
}

pub fn managed_child(n: u32, index: u32) -> ObjectId {
    cell_dn(n).child("LNHOG", &index.to_string())
}

pub fn fdd_cell(n: u32) -> ObjectId {
    cell_dn(n).child("LNCEL_FDD", "0")
}

pub fn tdd_cell(n: u32) -> ObjectId {
    cell_dn(n).child("LNCEL_TDD", "0")
}

pub fn fdd_attributes(channel: i64, width: &str) -> ParameterSet {
    ParameterSet::new().with("earfcnDL", channel).with("dlChBw", width)
}

pub fn tdd_attributes(channel: i64, width: &str) -> ParameterSet {
    ParameterSet::new().with("earfcn", channel).with("chBw", width)
}

pub fn frequencies(values: &[&str]) -> ParamValue {
    ParamValue::list(values.iter().copied())
}

/// Template with two defaults and LTE 1800/800 band tables
pub fn template_json() -> serde_json::Value {
    json!({
        "Parametr": "Value",
        "nccperm": 255,
        "hoPrio": "high",
        "b2Threshold1GERAN": r#"{"LTE_1800_20": -110, "LTE_800_10": -108}"#,
        "b2Threshold1GERANQci1": r#"{"LTE_1800_20": -112, "LTE_800_10": -106}"#,
        "unsetParameter": null,
    })
}

pub fn sample_template() -> Template {
    let serde_json::Value::Object(rows) = template_json() else {
        unreachable!()
    };
    Template::from_rows(rows).unwrap()
}

/// Region of five cells
///
/// 1. LTE 1800, child with a stale frequency list plus an extra instance
/// 2. LTE 800, no child
/// 3. TDD 2300 (no table entry), no child
/// 4. locked, with a stale child
/// 5. no radio attributes, no child
pub fn sample_objects() -> StateMap {
    StateMap::from_iter([
        (fdd_cell(1), fdd_attributes(1500, "20 MHz")),
        (
            managed_child(1, 0),
            ParameterSet::new()
                .with(GERAN_FREQUENCY_LIST, frequencies(&["640"]))
                .with(B2_THRESHOLD_GERAN, -110_i64)
                .with(B2_THRESHOLD_GERAN_QCI1, -112_i64)
                .with("nccperm", 255_i64)
                .with("hoPrio", "high"),
        ),
        (managed_child(1, 1), ParameterSet::new().with("nccperm", 255_i64)),
        (fdd_cell(2), fdd_attributes(6300, "10 MHz")),
        (tdd_cell(3), tdd_attributes(38700, "20 MHz")),
        (fdd_cell(4), fdd_attributes(1500, "20 MHz")),
        (managed_child(4, 0), ParameterSet::new().with("nccperm", 1_i64)),
    ])
}

pub fn sample_targets() -> Vec<CellTarget> {
    vec![
        CellTarget::new(cell_dn(1))
            .with_neighbour(Neighbour::gsm(641))
            .with_neighbour(Neighbour::gsm(640)),
        CellTarget::new(cell_dn(2)).with_neighbour(Neighbour::gsm(20)),
        CellTarget::new(cell_dn(3))
            .with_neighbour(Neighbour::gsm(512))
            .with_neighbour(Neighbour::gsm(512)),
        CellTarget::new(cell_dn(4)).with_neighbour(Neighbour::gsm(700)).locked(),
        CellTarget::new(cell_dn(5)).with_neighbour(Neighbour::gsm(800)),
    ]
}

pub fn sample_snapshot() -> NetworkSnapshot {
    NetworkSnapshot {
        cells: sample_targets(),
        objects: sample_objects(),
    }
}

pub fn sample_network() -> SimulatedNetwork {
    SimulatedNetwork::new(sample_objects())
}

pub fn closed_loop_config() -> RunConfig {
    RunConfig::default()
        .with_operation_mode(OperationMode::ClosedLoop)
        .with_region(REGION)
        .with_report_prefix(REPORT_PREFIX)
}
