//! 給与明細の型定義
//!
//! CLIとデスクトップで共有される型:
//! - Record: 取り込んだスプレッドシートの1行
//! - TargetSpec / FieldSpec: ユーザー入力（対象者・項目）
//! - FieldMapping / FieldSelection: 項目解決結果
//! - Slip: PDF 1ページ分の明細

use serde::{Deserialize, Serialize};
use std::fmt;

/// ワイルドカード（全レコード対象）
pub const WILDCARD_TOKEN: &str = "*";

/// 見出しが空の列に付与するキーの接頭辞
pub const PLACEHOLDER_PREFIX: &str = "__EMPTY";

/// セルの値
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    #[default]
    Blank,
}

impl CellValue {
    /// 比較用の正規化（表示形式 → trim → 小文字化）
    pub fn normalized(&self) -> String {
        self.to_string().trim().to_lowercase()
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Blank => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// 名前として使えない値（空・0・NaN・false）
    pub fn is_falsy(&self) -> bool {
        match self {
            CellValue::Number(n) => *n == 0.0 || n.is_nan(),
            CellValue::Bool(b) => !b,
            _ => self.is_blank(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            // 5000.0 → "5000"（f64のDisplayは末尾の.0を出さない）
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Blank => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// プレースホルダ列（見出しが空）かどうか
pub fn is_placeholder_key(key: &str) -> bool {
    key == PLACEHOLDER_PREFIX || key.starts_with("__EMPTY_")
}

/// スプレッドシートの1行（列キー → 値、列順を保持）
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    entries: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// 列を追加（同じキーは上書き）
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// 対象者指定（カンマ区切り、小文字化済み）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TargetSpec {
    tokens: Vec<String>,
    /// 入力文字列が空でなかったか（`" , "` も入力ありとみなす）
    provided: bool,
}

impl TargetSpec {
    pub fn parse(input: &str) -> Self {
        let tokens = input
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self {
            tokens,
            provided: !input.is_empty(),
        }
    }

    pub fn is_provided(&self) -> bool {
        self.provided
    }

    pub fn is_wildcard(&self) -> bool {
        self.tokens.iter().any(|t| t == WILDCARD_TOKEN)
    }

    /// 正規化済みの値がいずれかのトークンと一致するか
    pub fn contains(&self, normalized: &str) -> bool {
        self.tokens.iter().any(|t| t == normalized)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// 項目指定（カンマ区切り、大文字小文字は保持）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldSpec {
    identifiers: Vec<String>,
}

impl FieldSpec {
    pub fn parse(input: &str) -> Self {
        let identifiers = input
            .split(',')
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        Self { identifiers }
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

/// 解決済みの項目（列キー, 表示ラベル）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub key: String,
    pub label: String,
}

/// 明細に載せる項目の選択結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelection {
    /// 項目指定あり: 指定順のマッピング
    Requested(Vec<FieldMapping>),
    /// 項目指定なし: プレースホルダ以外の全列（元の列順）
    AllColumns(Vec<String>),
}

impl FieldSelection {
    pub fn len(&self) -> usize {
        match self {
            FieldSelection::Requested(m) => m.len(),
            FieldSelection::AllColumns(k) => k.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 明細の1項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlipStat {
    pub label: String,
    pub value: CellValue,
}

/// 給与明細（1人分）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slip {
    pub name: String,
    pub stats: Vec<SlipStat>,
}
