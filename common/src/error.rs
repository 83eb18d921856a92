//! エラー型定義

use thiserror::Error;

/// 共通エラー型
///
/// どれも致命的ではなく、呼び出し側でアクティビティログに変換される。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Data source or targets missing.")]
    NoInputs,

    #[error("No records found for specified targets.")]
    NoMatch,

    #[error("Layout error: {0}")]
    Layout(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_no_inputs() {
        assert_eq!(Error::NoInputs.to_string(), "Data source or targets missing.");
    }

    #[test]
    fn test_error_display_no_match() {
        assert_eq!(Error::NoMatch.to_string(), "No records found for specified targets.");
    }

    #[test]
    fn test_error_display_layout() {
        let error = Error::Layout("ページ幅が足りません".to_string());
        assert_eq!(error.to_string(), "Layout error: ページ幅が足りません");
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Layout("テスト".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Layout"));
        assert!(debug.contains("テスト"));
    }
}
