use crate::error::{PayrollError, Result};
use omvetan_common::layout::TWO_COLUMN_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 既定のタイトル
pub const DEFAULT_SLIP_HEADER: &str = "SALARY SLIP";
/// 出力ファイル名の接頭辞
pub const DEFAULT_FILE_PREFIX: &str = "OmVetan_Batch";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// PDFのタイトル（`--header` 省略時）
    pub slip_header: String,
    /// 出力ファイル名の接頭辞
    pub file_prefix: String,
    /// この項目数を超えると2段組
    pub two_column_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            slip_header: DEFAULT_SLIP_HEADER.into(),
            file_prefix: DEFAULT_FILE_PREFIX.into(),
            two_column_threshold: TWO_COLUMN_THRESHOLD,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（無ければ既定値）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PayrollError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("omvetan").join("config.json"))
    }

    pub fn set_slip_header(&mut self, header: String) -> Result<()> {
        self.slip_header = header;
        self.save()
    }
}
