//! レコード照合モジュール
//!
//! 対象者指定でレコードを絞り込み、項目指定を列キーに解決する。
//!
//! ## 項目解決の流れ
//! 1. 先頭の一致レコードの列名と完全一致（大文字小文字無視）
//! 2. 見つからなければ全レコードのセル値を検索し、その列を採用
//! 3. どちらでも見つからない項目は黙って除外

use crate::error::{Error, Result};
use crate::types::{is_placeholder_key, FieldMapping, FieldSelection, FieldSpec, Record, TargetSpec};

/// 名前が見つからない場合の表示
pub const UNKNOWN_NAME: &str = "Unknown";

/// 照合結果
#[derive(Debug, Clone)]
pub struct MatchOutcome<'a> {
    /// 一致したレコード（取り込み順）
    pub records: Vec<&'a Record>,
    /// 明細に載せる項目
    pub fields: FieldSelection,
    /// 照合に使った対象者指定
    pub targets: TargetSpec,
}

/// レコードを照合する
///
/// 入力不足は `Error::NoInputs`、一致なしは `Error::NoMatch`。
/// 区切り文字や空白だけの対象者指定は入力ありとして扱い、一致なしになる。
pub fn match_records<'a>(
    records: &'a [Record],
    targets: &TargetSpec,
    fields: &FieldSpec,
) -> Result<MatchOutcome<'a>> {
    if records.is_empty() || !targets.is_provided() {
        return Err(Error::NoInputs);
    }

    let matched: Vec<&Record> = if targets.is_wildcard() {
        records.iter().collect()
    } else {
        records
            .iter()
            .filter(|record| record.values().any(|v| targets.contains(&v.normalized())))
            .collect()
    };

    let Some(first) = matched.first() else {
        return Err(Error::NoMatch);
    };

    let fields = resolve_fields(first, records, fields);

    Ok(MatchOutcome {
        records: matched,
        fields,
        targets: targets.clone(),
    })
}

/// 項目指定を解決する
///
/// `first` は先頭の一致レコード、`all` は取り込んだ全レコード。
pub fn resolve_fields(first: &Record, all: &[Record], fields: &FieldSpec) -> FieldSelection {
    if fields.is_empty() {
        let keys = first
            .keys()
            .filter(|k| !is_placeholder_key(k))
            .map(str::to_string)
            .collect();
        return FieldSelection::AllColumns(keys);
    }

    let mappings = fields
        .identifiers()
        .iter()
        .filter_map(|requested| {
            let mapping = resolve_by_column(first, requested).or_else(|| resolve_by_value(all, requested));
            if mapping.is_none() {
                tracing::debug!(field = %requested, "項目を解決できないため除外");
            }
            mapping
        })
        .collect();

    FieldSelection::Requested(mappings)
}

/// 列名で解決（ラベルは入力どおり）
fn resolve_by_column(record: &Record, requested: &str) -> Option<FieldMapping> {
    let search = requested.to_lowercase();
    record
        .keys()
        .find(|k| k.trim().to_lowercase() == search)
        .map(|k| FieldMapping {
            key: k.to_string(),
            label: requested.to_string(),
        })
}

/// セル値で解決（ラベルはセルの元の表記）
fn resolve_by_value(records: &[Record], requested: &str) -> Option<FieldMapping> {
    let search = requested.to_lowercase();
    records.iter().find_map(|record| {
        record
            .iter()
            .find(|(_, value)| value.normalized() == search)
            .map(|(key, value)| FieldMapping {
                key: key.to_string(),
                label: value.to_string().trim().to_string(),
            })
    })
}

/// 明細に表示する名前を決める
///
/// ワイルドカード時は先頭の値、それ以外は対象者トークンに一致した最初の値。
/// 見つかった値が空・0・false の場合も `Unknown`。
pub fn resolve_slip_name(record: &Record, targets: &TargetSpec) -> String {
    let wildcard = targets.is_wildcard();
    record
        .values()
        .find(|v| wildcard || targets.contains(&v.normalized()))
        .filter(|v| !v.is_falsy())
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}
