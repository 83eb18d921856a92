//! レイアウト設定モジュール
//!
//! 給与明細ページのmm基準レイアウト定義。
//! 座標は左上原点・下向きY（PDFへの変換は描画側で行う）。

// ============================================
// ページ寸法（mm）
// ============================================

/// A4サイズ（mm）
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// 余白（mm）
pub const MARGIN_MM: f32 = 20.0;

/// 印字可能幅（mm）
pub const PRINTABLE_WIDTH_MM: f32 = A4_WIDTH_MM - MARGIN_MM * 2.0; // 170mm

// ============================================
// ヘッダー部
// ============================================

/// タイトル1行目のベースライン（mm）
pub const HEADER_TOP_MM: f32 = 25.0;
/// タイトル1行あたりの送り（mm）
pub const HEADER_LINE_ADVANCE_MM: f32 = 8.0;
pub const HEADER_FONT_PT: f32 = 18.0;

/// 生成日時・ページ番号
pub const META_FONT_PT: f32 = 9.0;
/// 「Employee Slip: i / K」の右端からのオフセット（mm）
pub const SLIP_INDEX_OFFSET_MM: f32 = 35.0;
/// メタ行 → 区切り線
pub const DIVIDER_GAP_MM: f32 = 6.0;
/// 区切り線 → 「Employee Name:」
pub const NAME_LABEL_GAP_MM: f32 = 10.0;
pub const NAME_LABEL_FONT_PT: f32 = 10.0;
/// 「Employee Name:」 → 氏名
pub const NAME_GAP_MM: f32 = 6.0;
pub const NAME_FONT_PT: f32 = 12.0;
/// 氏名 → 項目表
pub const TABLE_GAP_MM: f32 = 8.0;

// ============================================
// 項目表
// ============================================

/// この件数を超えると2段組
pub const TWO_COLUMN_THRESHOLD: usize = 12;

pub const TABLE_FONT_PT: f32 = 8.5;
pub const CELL_PADDING_MM: f32 = 4.0;
pub const LINE_HEIGHT_FACTOR: f32 = 1.15;

pub const SINGLE_TABLE_HEAD: &[&str] = &["Description", "Value"];
pub const TWO_COLUMN_TABLE_HEAD: &[&str] = &["Description", "Value", "Description", "Value"];

// ============================================
// 色
// ============================================

/// RGB色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const TITLE_COLOR: Rgb = Rgb(30, 41, 59);
pub const META_COLOR: Rgb = Rgb(100, 116, 139);
pub const DIVIDER_COLOR: Rgb = Rgb(226, 232, 240);
pub const TABLE_HEAD_FILL: Rgb = Rgb(79, 70, 229);
pub const TABLE_HEAD_TEXT: Rgb = Rgb(255, 255, 255);
pub const TABLE_STRIPE_FILL: Rgb = Rgb(245, 245, 245);
pub const TABLE_BODY_TEXT: Rgb = Rgb(80, 80, 80);

// ============================================
// 変換係数
// ============================================

/// mm → pt変換 (1mm = 72/25.4 pt ≈ 2.835pt)
pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// mm → pt 変換
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// pt → mm 変換
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / MM_TO_PT
}

/// 項目表1行の高さ（mm）
pub fn table_row_height_mm() -> f32 {
    pt_to_mm(TABLE_FONT_PT * LINE_HEIGHT_FACTOR) + CELL_PADDING_MM * 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        assert!((PRINTABLE_WIDTH_MM - 170.0).abs() < 0.01);
    }

    #[test]
    fn test_conversion() {
        assert!((MM_TO_PT - 2.835).abs() < 0.01);
        assert!((mm_to_pt(10.0) - 28.35).abs() < 0.1);
        assert!((pt_to_mm(mm_to_pt(42.0)) - 42.0).abs() < 0.001);
    }

    #[test]
    fn test_row_height_fits_padding() {
        let h = table_row_height_mm();
        assert!(h > CELL_PADDING_MM * 2.0);
        assert!(h < 15.0);
    }
}
