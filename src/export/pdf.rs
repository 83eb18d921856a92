//! PDF生成（printpdf）
//!
//! `SlipCanvas` を printpdf の描画命令に変換する。フォントはPDF標準の
//! Helvetica / Helvetica-Bold を使う（埋め込み不要）。

use crate::error::{PayrollError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use omvetan_common::export::pdf_core::{render_slip, SlipCanvas, SlipLayoutOptions, TextStyle};
use omvetan_common::layout::{mm_to_pt, Rgb, A4_HEIGHT_MM, A4_WIDTH_MM};
use omvetan_common::metrics::FontWeight;
use omvetan_common::Slip;
use printpdf::graphics::{LinePoint, Polygon, PolygonRing, WindingOrder};
use printpdf::text::TextItem;
use printpdf::{BuiltinFont, Mm, Op, PaintMode, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, TextMatrix};
use std::path::Path;

const LINE_THICKNESS_PT: f32 = 0.5;

/// printpdf 用キャンバス（ページごとの描画命令を保持）
#[derive(Default)]
pub struct PrintPdfCanvas {
    pages: Vec<Vec<Op>>,
}

impl PrintPdfCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    fn ops(&mut self) -> &mut Vec<Op> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// PDFバイト列を生成
    pub fn finish(self, title: &str) -> Vec<u8> {
        let pages = self
            .pages
            .into_iter()
            .map(|ops| PdfPage::new(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), ops))
            .collect();

        let mut doc = PdfDocument::new(title);
        doc.pages = pages;
        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            tracing::debug!(count = warnings.len(), "PDF保存時の警告");
        }
        bytes
    }
}

fn to_pdf_color(c: Rgb) -> printpdf::color::Color {
    printpdf::color::Color::Rgb(printpdf::Rgb::new(
        c.0 as f32 / 255.0,
        c.1 as f32 / 255.0,
        c.2 as f32 / 255.0,
        None,
    ))
}

fn builtin_font(weight: FontWeight) -> BuiltinFont {
    match weight {
        FontWeight::Regular => BuiltinFont::Helvetica,
        FontWeight::Bold => BuiltinFont::HelveticaBold,
    }
}

/// 左上原点mm → PDF座標pt
fn to_point(x_mm: f32, y_mm: f32) -> Point {
    Point {
        x: Pt(mm_to_pt(x_mm)),
        y: Pt(mm_to_pt(A4_HEIGHT_MM - y_mm)),
    }
}

/// mm座標の頂点列から多角形を作る
fn polygon(points_mm: &[(f32, f32)], mode: PaintMode) -> Polygon {
    Polygon {
        rings: vec![PolygonRing {
            points: points_mm
                .iter()
                .map(|&(x, y)| LinePoint { p: to_point(x, y), bezier: false })
                .collect(),
        }],
        mode,
        winding_order: WindingOrder::EvenOdd,
    }
}

impl SlipCanvas for PrintPdfCanvas {
    fn add_page(&mut self) {
        self.pages.push(Vec::new());
    }

    fn write_text(&mut self, lines: &[String], x_mm: f32, y_mm: f32, style: &TextStyle) {
        let ops = self.ops();
        ops.push(Op::StartTextSection);
        ops.push(Op::SetFillColor { col: to_pdf_color(style.color) });
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(style.size_pt),
            font: builtin_font(style.weight),
        });
        for (i, line) in lines.iter().enumerate() {
            let p = to_point(x_mm, y_mm + i as f32 * style.line_advance_mm);
            ops.push(Op::SetTextMatrix { matrix: TextMatrix::Translate(p.x, p.y) });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(line.clone())],
                font: builtin_font(style.weight),
            });
        }
        ops.push(Op::EndTextSection);
    }

    fn draw_line(&mut self, x1_mm: f32, y1_mm: f32, x2_mm: f32, y2_mm: f32, color: Rgb) {
        let ops = self.ops();
        ops.push(Op::SetOutlineColor { col: to_pdf_color(color) });
        ops.push(Op::SetOutlineThickness { pt: Pt(LINE_THICKNESS_PT) });
        ops.push(Op::DrawPolygon {
            polygon: polygon(&[(x1_mm, y1_mm), (x2_mm, y2_mm)], PaintMode::Stroke),
        });
    }

    fn fill_rect(&mut self, x_mm: f32, y_mm: f32, width_mm: f32, height_mm: f32, color: Rgb) {
        let ops = self.ops();
        ops.push(Op::SetFillColor { col: to_pdf_color(color) });
        ops.push(Op::DrawPolygon {
            polygon: polygon(
                &[
                    (x_mm, y_mm),
                    (x_mm + width_mm, y_mm),
                    (x_mm + width_mm, y_mm + height_mm),
                    (x_mm, y_mm + height_mm),
                ],
                PaintMode::Fill,
            ),
        });
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// 明細一覧からPDFバイト列を生成（1明細1ページ）
pub fn render_pdf_bytes(slips: &[Slip], options: &SlipLayoutOptions, show_progress: bool) -> Result<(Vec<u8>, usize)> {
    if slips.is_empty() {
        return Err(PayrollError::NothingToExport);
    }

    let progress = if show_progress {
        let pb = ProgressBar::new(slips.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:30} {pos}/{len} slips") {
            pb.set_style(style);
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut canvas = PrintPdfCanvas::new();
    for (index, slip) in slips.iter().enumerate() {
        render_slip(&mut canvas, slip, index, slips.len(), options)?;
        progress.inc(1);
    }
    progress.finish_and_clear();

    let pages = canvas.page_count();
    let title = options.header.to_uppercase();
    Ok((canvas.finish(&title), pages))
}

/// PDFを生成してファイルに保存。戻り値はページ数。
pub fn generate_pdf(
    slips: &[Slip],
    output_path: &Path,
    options: &SlipLayoutOptions,
    show_progress: bool,
) -> Result<usize> {
    let (bytes, pages) = render_pdf_bytes(slips, options, show_progress)?;
    std::fs::write(output_path, bytes)
        .map_err(|e| PayrollError::PdfGeneration(format!("PDF保存エラー: {}", e)))?;
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use omvetan_common::{CellValue, SlipStat};

    fn slip(name: &str, n: usize) -> Slip {
        Slip {
            name: name.to_string(),
            stats: (0..n)
                .map(|i| SlipStat {
                    label: format!("Item {}", i),
                    value: CellValue::Number(i as f64),
                })
                .collect(),
        }
    }

    #[test]
    fn test_canvas_counts_pages() {
        let mut canvas = PrintPdfCanvas::new();
        canvas.add_page();
        canvas.write_text(
            &["hello".to_string()],
            20.0,
            25.0,
            &TextStyle::new(12.0, FontWeight::Bold, Rgb(0, 0, 0)),
        );
        canvas.add_page();
        assert_eq!(canvas.page_count(), 2);
    }

    #[test]
    fn test_to_point_flips_y() {
        let p = to_point(0.0, 0.0);
        assert!((p.y.0 - mm_to_pt(A4_HEIGHT_MM)).abs() < 0.01);
        let q = to_point(10.0, A4_HEIGHT_MM);
        assert!(q.y.0.abs() < 0.01);
        assert!((q.x.0 - mm_to_pt(10.0)).abs() < 0.01);
    }

    #[test]
    fn test_render_pdf_bytes() {
        let slips = vec![slip("Alice", 3), slip("Bob", 13)];
        let (bytes, pages) = render_pdf_bytes(&slips, &SlipLayoutOptions::default(), false).unwrap();
        assert_eq!(pages, 2);
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_empty_is_error() {
        let result = render_pdf_bytes(&[], &SlipLayoutOptions::default(), false);
        assert!(matches!(result, Err(PayrollError::NothingToExport)));
    }
}
