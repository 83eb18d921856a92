//! PDF export core utilities shared by CLI/desktop.
//!
//! 明細1件につき1ページを描く。描画先は `SlipCanvas` で抽象化し、
//! printpdf 実装は CLI 側、テストでは記録用キャンバスを使う。

use crate::error::{Error, Result};
use crate::layout::*;
use crate::metrics::{truncate_to_width, wrap_text, FontWeight};
use crate::types::{Slip, SlipStat};

/// テキスト描画スタイル
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_pt: f32,
    pub weight: FontWeight,
    pub color: Rgb,
    /// 複数行を描くときの行送り（mm）
    pub line_advance_mm: f32,
}

impl TextStyle {
    pub fn new(size_pt: f32, weight: FontWeight, color: Rgb) -> Self {
        Self {
            size_pt,
            weight,
            color,
            line_advance_mm: pt_to_mm(size_pt * LINE_HEIGHT_FACTOR),
        }
    }
}

/// 描画先（mm単位、左上原点、yはベースライン）
pub trait SlipCanvas {
    /// 新しいページを追加し、以降の描画先にする
    fn add_page(&mut self);
    fn write_text(&mut self, lines: &[String], x_mm: f32, y_mm: f32, style: &TextStyle);
    fn draw_line(&mut self, x1_mm: f32, y1_mm: f32, x2_mm: f32, y2_mm: f32, color: Rgb);
    fn fill_rect(&mut self, x_mm: f32, y_mm: f32, width_mm: f32, height_mm: f32, color: Rgb);
    fn page_count(&self) -> usize;
}

/// ページ共通の設定
#[derive(Debug, Clone)]
pub struct SlipLayoutOptions {
    /// タイトル（大文字化して描く）
    pub header: String,
    /// 「Generated on:」に続く日時文字列
    pub generated_on: String,
    /// この件数を超えると2段組
    pub two_column_threshold: usize,
}

impl Default for SlipLayoutOptions {
    fn default() -> Self {
        Self {
            header: "SALARY SLIP".to_string(),
            generated_on: String::new(),
            two_column_threshold: TWO_COLUMN_THRESHOLD,
        }
    }
}

/// 項目表（見出し行 + 本体）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTable {
    pub head: Vec<String>,
    pub body: Vec<Vec<String>>,
}

impl FieldTable {
    pub fn columns(&self) -> usize {
        self.head.len()
    }
}

/// 項目表を組み立てる
///
/// `threshold` を超える場合は `ceil(n/2)` で分割し、行 i に
/// `stats[i]`（左）と `stats[i + half]`（右）を並べる。右が無い行は空セル。
pub fn build_field_table(stats: &[SlipStat], threshold: usize) -> FieldTable {
    let cells = |s: &SlipStat| [s.label.clone(), s.value.to_string()];

    if stats.len() > threshold {
        let half = stats.len().div_ceil(2);
        let body = (0..half)
            .map(|i| {
                let mut row = cells(&stats[i]).to_vec();
                match stats.get(i + half) {
                    Some(right) => row.extend(cells(right)),
                    None => row.extend([String::new(), String::new()]),
                }
                row
            })
            .collect();
        FieldTable {
            head: TWO_COLUMN_TABLE_HEAD.iter().map(|s| s.to_string()).collect(),
            body,
        }
    } else {
        FieldTable {
            head: SINGLE_TABLE_HEAD.iter().map(|s| s.to_string()).collect(),
            body: stats.iter().map(|s| cells(s).to_vec()).collect(),
        }
    }
}

/// タイトルの折り返し結果
pub fn header_lines(header: &str) -> Vec<String> {
    wrap_text(&header.to_uppercase(), PRINTABLE_WIDTH_MM, HEADER_FONT_PT, FontWeight::Bold)
}

/// タイトル行数からメタ行のY座標を求める
pub fn meta_line_y(header_line_count: usize) -> f32 {
    HEADER_TOP_MM + header_line_count as f32 * HEADER_LINE_ADVANCE_MM
}

/// タイトル行数から項目表の開始Y座標を求める
pub fn table_start_y(header_line_count: usize) -> f32 {
    meta_line_y(header_line_count) + DIVIDER_GAP_MM + NAME_LABEL_GAP_MM + NAME_GAP_MM + TABLE_GAP_MM
}

/// 表の描画結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableCursor {
    /// 表の直後のY座標
    pub y_mm: f32,
    /// 改ページで追加したページ数
    pub pages_added: usize,
}

/// 折り返し済みの1行
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedRow {
    /// セルごとの行リスト
    pub cells: Vec<Vec<String>>,
    pub height_mm: f32,
}

/// 行の高さ: 最多行数 × 行送り + 上下の余白
pub fn row_height_mm(line_count: usize, style: &TextStyle) -> f32 {
    line_count.max(1) as f32 * style.line_advance_mm + CELL_PADDING_MM * 2.0
}

/// セル幅に合わせて各セルを折り返す
pub fn wrap_row(cells: &[String], col_w: f32, style: &TextStyle) -> WrappedRow {
    let text_w = col_w - CELL_PADDING_MM * 2.0;
    let cells: Vec<Vec<String>> = cells
        .iter()
        .map(|cell| {
            if cell.is_empty() {
                Vec::new()
            } else {
                wrap_text(cell, text_w, style.size_pt, style.weight)
            }
        })
        .collect();
    let lines = cells.iter().map(Vec::len).max().unwrap_or(0);
    WrappedRow {
        height_mm: row_height_mm(lines, style),
        cells,
    }
}

/// 1ページに収まらない行は収まる行数で切り詰める
fn clamp_to_page(mut row: WrappedRow, style: &TextStyle, max_height_mm: f32) -> WrappedRow {
    if row.height_mm <= max_height_mm {
        return row;
    }
    let max_lines = (((max_height_mm - CELL_PADDING_MM * 2.0) / style.line_advance_mm).floor() as usize).max(1);
    tracing::warn!(max_lines, "1ページに収まらないセルを切り詰め");
    for cell in &mut row.cells {
        cell.truncate(max_lines);
    }
    row.height_mm = row_height_mm(max_lines, style);
    row
}

/// 表を描く
///
/// セルは列幅で折り返し、行の高さは最も行数の多いセルに合わせる。
/// 行はページをまたいで分割しない。収まらない行は次ページへ送り、
/// 見出し行を繰り返す。
pub fn add_table(canvas: &mut dyn SlipCanvas, table: &FieldTable, start_y_mm: f32) -> TableCursor {
    let bottom = A4_HEIGHT_MM - MARGIN_MM;
    let columns = table.columns().max(1);
    let col_w = PRINTABLE_WIDTH_MM / columns as f32;
    let head_style = TextStyle::new(TABLE_FONT_PT, FontWeight::Bold, TABLE_HEAD_TEXT);
    let body_style = TextStyle::new(TABLE_FONT_PT, FontWeight::Regular, TABLE_BODY_TEXT);

    let head = wrap_row(&table.head, col_w, &head_style);
    let page_room = bottom - MARGIN_MM - head.height_mm;
    let body: Vec<WrappedRow> = table
        .body
        .iter()
        .map(|row| clamp_to_page(wrap_row(row, col_w, &body_style), &body_style, page_room))
        .collect();

    let mut y = start_y_mm;
    let mut pages_added = 0;

    // 見出し行だけが前ページに残らないようにする
    if let Some(first) = body.first() {
        if y + head.height_mm + first.height_mm > bottom {
            canvas.add_page();
            pages_added += 1;
            y = MARGIN_MM;
        }
    }
    draw_row(canvas, &head, y, col_w, Some(TABLE_HEAD_FILL), &head_style);
    y += head.height_mm;

    for (index, row) in body.iter().enumerate() {
        if y + row.height_mm > bottom {
            canvas.add_page();
            pages_added += 1;
            y = MARGIN_MM;
            draw_row(canvas, &head, y, col_w, Some(TABLE_HEAD_FILL), &head_style);
            y += head.height_mm;
        }
        let fill = (index % 2 == 1).then_some(TABLE_STRIPE_FILL);
        draw_row(canvas, row, y, col_w, fill, &body_style);
        y += row.height_mm;
    }

    TableCursor { y_mm: y, pages_added }
}

fn draw_row(
    canvas: &mut dyn SlipCanvas,
    row: &WrappedRow,
    top_mm: f32,
    col_w: f32,
    fill: Option<Rgb>,
    style: &TextStyle,
) {
    if let Some(color) = fill {
        canvas.fill_rect(MARGIN_MM, top_mm, PRINTABLE_WIDTH_MM, row.height_mm, color);
    }
    let baseline = top_mm + CELL_PADDING_MM + pt_to_mm(style.size_pt) * 0.85;

    for (i, lines) in row.cells.iter().enumerate() {
        if lines.is_empty() {
            continue;
        }
        let x = MARGIN_MM + col_w * i as f32 + CELL_PADDING_MM;
        canvas.write_text(lines, x, baseline, style);
    }
}

/// 明細1件を新しいページに描く
///
/// `index` は0始まり、ページ上には `index + 1 / total` を印字する。
pub fn render_slip(
    canvas: &mut dyn SlipCanvas,
    slip: &Slip,
    index: usize,
    total: usize,
    options: &SlipLayoutOptions,
) -> Result<TableCursor> {
    let title = header_lines(&options.header);
    let table = build_field_table(&slip.stats, options.two_column_threshold);
    let start_y = table_start_y(title.len());

    // 長すぎるタイトルで見出し行すら置けない場合
    if start_y + table_row_height_mm() > A4_HEIGHT_MM - MARGIN_MM {
        return Err(Error::Layout(format!(
            "header occupies {} lines and leaves no room for the field table",
            title.len()
        )));
    }

    canvas.add_page();

    let title_style = TextStyle {
        line_advance_mm: HEADER_LINE_ADVANCE_MM,
        ..TextStyle::new(HEADER_FONT_PT, FontWeight::Bold, TITLE_COLOR)
    };
    canvas.write_text(&title, MARGIN_MM, HEADER_TOP_MM, &title_style);

    let mut y = meta_line_y(title.len());
    let meta_style = TextStyle::new(META_FONT_PT, FontWeight::Regular, META_COLOR);
    canvas.write_text(
        &[format!("Generated on: {}", options.generated_on)],
        MARGIN_MM,
        y,
        &meta_style,
    );
    canvas.write_text(
        &[format!("Employee Slip: {} / {}", index + 1, total)],
        A4_WIDTH_MM - MARGIN_MM - SLIP_INDEX_OFFSET_MM,
        y,
        &meta_style,
    );

    y += DIVIDER_GAP_MM;
    canvas.draw_line(MARGIN_MM, y, A4_WIDTH_MM - MARGIN_MM, y, DIVIDER_COLOR);

    y += NAME_LABEL_GAP_MM;
    let label_style = TextStyle::new(NAME_LABEL_FONT_PT, FontWeight::Regular, TITLE_COLOR);
    canvas.write_text(&["Employee Name:".to_string()], MARGIN_MM, y, &label_style);

    y += NAME_GAP_MM;
    let name_style = TextStyle::new(NAME_FONT_PT, FontWeight::Bold, TITLE_COLOR);
    let name = truncate_to_width(
        &slip.name.to_uppercase(),
        PRINTABLE_WIDTH_MM,
        NAME_FONT_PT,
        FontWeight::Bold,
    );
    canvas.write_text(&[name], MARGIN_MM, y, &name_style);

    Ok(add_table(canvas, &table, y + TABLE_GAP_MM))
}

/// 全明細を描く。戻り値は総ページ数。
pub fn render_slips(canvas: &mut dyn SlipCanvas, slips: &[Slip], options: &SlipLayoutOptions) -> Result<usize> {
    let total = slips.len();
    for (index, slip) in slips.iter().enumerate() {
        render_slip(canvas, slip, index, total, options)?;
    }
    Ok(canvas.page_count())
}
