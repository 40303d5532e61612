//! Paginated PDF report generation.
//!
//! The layout is an A4 top-down cursor in millimetres, mirroring the report
//! structure users see on screen: title, metadata, summary metrics, the two
//! chart rasters side by side, then the per-line type distribution listing.
//! Chart rasters arrive as explicit inputs (base64 PNG data URLs captured
//! from the rendered canvases); this module never inspects the view.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use image::{DynamicImage, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

use crate::errors::ExportError;
use crate::report::{derive_distribution_series, UploadedSummary};

use super::BinaryArtifact;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const TOP_MARGIN_MM: f32 = 15.0;
const MARGIN_MM: f32 = 10.0;
const INDENT_MM: f32 = 12.0;
const CHART_HEIGHT_MM: f32 = 60.0;
const MM_TO_PT: f32 = 72.0 / 25.4;

/// At most two chart rasters are embedded, side by side.
const MAX_EMBEDDED_CHARTS: usize = 2;

const TITLE_COLOR: (u8, u8, u8) = (15, 51, 102);
const SECTION_COLOR: (u8, u8, u8) = (30, 90, 150);
const META_COLOR: (u8, u8, u8) = (100, 100, 100);
const BODY_COLOR: (u8, u8, u8) = (0, 0, 0);
const FOOTER_COLOR: (u8, u8, u8) = (150, 150, 150);

/// Build the report for the current summary. `None` means nothing has been
/// uploaded yet and the export fails with NoData; a snapshot that cannot be
/// decoded fails with RenderFailure. No snapshots at all simply skips the
/// chart section.
pub fn export_pdf(
    summary: Option<&UploadedSummary>,
    chart_snapshots: &[String],
) -> Result<BinaryArtifact, ExportError> {
    let summary = summary.ok_or(ExportError::NoData)?;

    let rasters: Vec<ChartRaster> = chart_snapshots
        .iter()
        .take(MAX_EMBEDDED_CHARTS)
        .map(|snapshot| decode_snapshot(snapshot))
        .collect::<Result<_, _>>()?;

    let bytes = render_report(summary, &rasters)?;
    let filename = format!("chemical-report-{}.pdf", super::artifact_token());
    Ok(BinaryArtifact { filename, bytes })
}

/// A chart snapshot re-encoded for embedding: JPEG data for a DCTDecode
/// image XObject, plus its pixel dimensions.
struct ChartRaster {
    jpeg: Vec<u8>,
    width: u32,
    height: u32,
}

fn decode_snapshot(data_url: &str) -> Result<ChartRaster, ExportError> {
    let encoded = data_url
        .rsplit_once("base64,")
        .map(|(_, rest)| rest)
        .unwrap_or(data_url);
    let png = BASE64
        .decode(encoded.trim())
        .map_err(|err| ExportError::RenderFailure(err.to_string()))?;
    let decoded = image::load_from_memory(&png)
        .map_err(|err| ExportError::RenderFailure(err.to_string()))?;

    // Flatten any alpha channel; JPEG embedding wants plain RGB.
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());
    let mut jpeg = Cursor::new(Vec::new());
    rgb.write_to(&mut jpeg, ImageFormat::Jpeg)
        .map_err(|err| ExportError::RenderFailure(err.to_string()))?;

    Ok(ChartRaster {
        jpeg: jpeg.into_inner(),
        width: rgb.width(),
        height: rgb.height(),
    })
}

fn render_report(
    summary: &UploadedSummary,
    rasters: &[ChartRaster],
) -> Result<Vec<u8>, ExportError> {
    let mut layout = ReportLayout::new();

    layout.text(
        MARGIN_MM,
        20.0,
        TITLE_COLOR,
        "Chemical Equipment Analysis Report",
    );
    layout.advance(12.0);

    layout.text(
        MARGIN_MM,
        10.0,
        META_COLOR,
        &format!("Generated: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),
    );
    layout.advance(6.0);
    layout.text(
        MARGIN_MM,
        10.0,
        META_COLOR,
        &format!("File: {}", summary.source_filename),
    );
    layout.advance(6.0);
    layout.text(
        MARGIN_MM,
        10.0,
        META_COLOR,
        &format!("Total Equipment: {}", summary.total_items),
    );
    layout.advance(10.0);

    layout.text(MARGIN_MM, 12.0, SECTION_COLOR, "Summary Metrics");
    layout.advance(8.0);
    layout.text(
        INDENT_MM,
        9.0,
        BODY_COLOR,
        &format!("Average Flowrate: {} L/min", fmt_avg(summary.avg_flowrate)),
    );
    layout.advance(5.0);
    layout.text(
        INDENT_MM,
        9.0,
        BODY_COLOR,
        &format!("Average Pressure: {} bar", fmt_avg(summary.avg_pressure)),
    );
    layout.advance(5.0);
    layout.text(
        INDENT_MM,
        9.0,
        BODY_COLOR,
        &format!(
            "Average Temperature: {} \u{b0}C",
            fmt_avg(summary.avg_temperature)
        ),
    );
    layout.advance(12.0);

    if !rasters.is_empty() {
        layout.text(MARGIN_MM, 12.0, SECTION_COLOR, "Analysis Charts");
        layout.advance(8.0);

        let chart_width = (PAGE_WIDTH_MM - 2.0 * MARGIN_MM) / 2.0 - 5.0;
        for (index, raster) in rasters.iter().enumerate() {
            layout.ensure_room(110.0);
            let x = MARGIN_MM + index as f32 * (chart_width + 5.0);
            layout.image(raster, x, chart_width, CHART_HEIGHT_MM);
        }
        layout.advance(CHART_HEIGHT_MM + 5.0);
    }

    layout.advance(15.0);
    layout.ensure_room(80.0);
    layout.text(MARGIN_MM, 12.0, SECTION_COLOR, "Equipment Distribution");
    layout.advance(8.0);

    let series = derive_distribution_series(summary);
    for (category, count) in series.categories.iter().zip(&series.counts) {
        layout.ensure_room(20.0);
        layout.text(
            INDENT_MM,
            9.0,
            BODY_COLOR,
            &format!("{category}: {count} units"),
        );
        layout.advance(5.0);
    }

    layout.footer(
        8.0,
        FOOTER_COLOR,
        "Chemical Equipment Visualizer | Industrial Analytics Dashboard",
    );

    layout.finish()
}

fn fmt_avg(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        "-".to_string()
    }
}

#[derive(Default)]
struct PageBuilder {
    ops: Vec<Operation>,
    images: Vec<Stream>,
}

/// Top-down cursor layout over A4 pages. Before each block the caller states
/// the bottom margin that block needs; crossing it starts a fresh page with
/// the cursor back at the top margin.
struct ReportLayout {
    done: Vec<PageBuilder>,
    current: PageBuilder,
    y_mm: f32,
}

impl ReportLayout {
    fn new() -> Self {
        Self {
            done: Vec::new(),
            current: PageBuilder::default(),
            y_mm: TOP_MARGIN_MM,
        }
    }

    fn advance(&mut self, delta_mm: f32) {
        self.y_mm += delta_mm;
    }

    fn ensure_room(&mut self, bottom_mm: f32) {
        if self.y_mm > PAGE_HEIGHT_MM - bottom_mm {
            self.done.push(std::mem::take(&mut self.current));
            self.y_mm = TOP_MARGIN_MM;
        }
    }

    /// Draw a text line with its baseline at the current cursor.
    fn text(&mut self, x_mm: f32, size_pt: f32, color: (u8, u8, u8), text: &str) {
        let x = x_mm * MM_TO_PT;
        let y = (PAGE_HEIGHT_MM - self.y_mm) * MM_TO_PT;
        self.text_at(x, y, size_pt, color, text);
    }

    /// Footer line anchored near the bottom of the current page, independent
    /// of the cursor.
    fn footer(&mut self, size_pt: f32, color: (u8, u8, u8), text: &str) {
        let x = MARGIN_MM * MM_TO_PT;
        let y = 8.0 * MM_TO_PT;
        self.text_at(x, y, size_pt, color, text);
    }

    fn text_at(&mut self, x_pt: f32, y_pt: f32, size_pt: f32, color: (u8, u8, u8), text: &str) {
        let (r, g, b) = (
            color.0 as f32 / 255.0,
            color.1 as f32 / 255.0,
            color.2 as f32 / 255.0,
        );
        self.current.ops.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), size_pt.into()]),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new("Td", vec![x_pt.into(), y_pt.into()]),
            Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Place an image with its top edge at the current cursor.
    fn image(&mut self, raster: &ChartRaster, x_mm: f32, width_mm: f32, height_mm: f32) {
        let name = format!("Im{}", self.current.images.len());
        self.current.images.push(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => raster.width as i64,
                "Height" => raster.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            raster.jpeg.clone(),
        ));

        let w = width_mm * MM_TO_PT;
        let h = height_mm * MM_TO_PT;
        let x = x_mm * MM_TO_PT;
        let y = (PAGE_HEIGHT_MM - self.y_mm - height_mm) * MM_TO_PT;
        self.current.ops.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![w.into(), 0.into(), 0.into(), h.into(), x.into(), y.into()],
            ),
            Operation::new("Do", vec![name.as_str().into()]),
            Operation::new("Q", vec![]),
        ]);
    }

    fn finish(mut self) -> Result<Vec<u8>, ExportError> {
        self.done.push(self.current);

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in self.done {
            let content = Content {
                operations: page.ops,
            };
            let encoded = content
                .encode()
                .map_err(|err| ExportError::RenderFailure(err.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

            let mut resources = dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            };
            if !page.images.is_empty() {
                let mut xobjects = Dictionary::new();
                for (index, stream) in page.images.into_iter().enumerate() {
                    let image_id = doc.add_object(stream);
                    xobjects.set(format!("Im{index}"), Object::Reference(image_id));
                }
                resources.set("XObject", Object::Dictionary(xobjects));
            }

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    (PAGE_WIDTH_MM * MM_TO_PT).into(),
                    (PAGE_HEIGHT_MM * MM_TO_PT).into(),
                ],
                "Contents" => content_id,
                "Resources" => resources,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|err| ExportError::RenderFailure(err.to_string()))?;
        Ok(bytes)
    }
}

/// Standard-font text encoding: ASCII passes through, the degree sign maps
/// to its WinAnsi code point, anything else degrades to '?'.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{b0}' => 0xB0,
            ' '..='~' => c as u8,
            _ => b'?',
        })
        .collect()
}
