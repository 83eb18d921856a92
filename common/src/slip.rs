//! 明細生成モジュール
//!
//! 照合済みレコードを `Slip` に変換する。項目の並びは
//! `FieldSelection` の順序そのまま（2段組レイアウトの分割に使われる）。

use crate::matcher::{resolve_slip_name, MatchOutcome};
use crate::types::{CellValue, FieldSelection, Record, Slip, SlipStat, TargetSpec};

/// 1レコード分の明細を生成
pub fn build_slip(record: &Record, fields: &FieldSelection, targets: &TargetSpec) -> Slip {
    let value_of = |key: &str| record.get(key).cloned().unwrap_or(CellValue::Blank);

    let stats = match fields {
        FieldSelection::Requested(mappings) => mappings
            .iter()
            .map(|m| SlipStat {
                label: m.label.clone(),
                value: value_of(&m.key),
            })
            .collect(),
        FieldSelection::AllColumns(keys) => keys
            .iter()
            .map(|k| SlipStat {
                label: k.clone(),
                value: value_of(k),
            })
            .collect(),
    };

    Slip {
        name: resolve_slip_name(record, targets),
        stats,
    }
}

/// 照合結果の全レコードを明細に変換
pub fn build_slips(outcome: &MatchOutcome) -> Vec<Slip> {
    outcome
        .records
        .iter()
        .map(|record| build_slip(record, &outcome.fields, &outcome.targets))
        .collect()
}
