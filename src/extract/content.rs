//! Content stream interpretation for the lopdf backend.
//!
//! Walks a page's content stream and reconstructs the block → line →
//! span geometry: one text block per BT..ET pair, a new line on every
//! baseline move, one span per text-showing operator. The fill color is
//! tracked across the whole stream so spans carry the packed RGB value
//! that was current when they were shown.

use std::collections::{BTreeMap, HashSet};

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::error::{Error, Result};
use crate::extract::backend::decode_text_simple;
use crate::model::{RawBlock, RawLine, RawPage, RawSpan};

/// Kerning adjustment in 1/1000 text space units treated as a word
/// space inside TJ arrays.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Font size assumed before any Tf operator has been seen.
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Interpret one page's content stream into raw page geometry.
pub(crate) fn extract_page(
    doc: &LopdfDocument,
    content: &[u8],
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    image_xobjects: &HashSet<Vec<u8>>,
) -> Result<RawPage> {
    let content =
        lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

    let mut blocks: Vec<RawBlock> = Vec::new();
    let mut block_lines: Vec<RawLine> = Vec::new();
    let mut line_spans: Vec<RawSpan> = Vec::new();

    let mut fill_color: u32 = 0x000000;
    let mut color_stack: Vec<u32> = Vec::new();

    let mut current_font_name: Vec<u8> = Vec::new();
    let mut current_font_family = String::new();
    let mut current_font_size: f32 = DEFAULT_FONT_SIZE;
    let mut text_matrix = TextMatrix::default();
    let mut in_text_block = false;

    for op in content.operations {
        match op.operator.as_str() {
            "q" => color_stack.push(fill_color),
            "Q" => {
                if let Some(color) = color_stack.pop() {
                    fill_color = color;
                }
            }
            "rg" => {
                if op.operands.len() >= 3 {
                    fill_color = pack_rgb(
                        get_number(&op.operands[0]).unwrap_or(0.0),
                        get_number(&op.operands[1]).unwrap_or(0.0),
                        get_number(&op.operands[2]).unwrap_or(0.0),
                    );
                }
            }
            "g" => {
                if let Some(gray) = op.operands.first().and_then(get_number) {
                    fill_color = pack_rgb(gray, gray, gray);
                }
            }
            "k" => {
                if op.operands.len() >= 4 {
                    fill_color = pack_cmyk(
                        get_number(&op.operands[0]).unwrap_or(0.0),
                        get_number(&op.operands[1]).unwrap_or(0.0),
                        get_number(&op.operands[2]).unwrap_or(0.0),
                        get_number(&op.operands[3]).unwrap_or(0.0),
                    );
                }
            }
            "sc" | "scn" => {
                // Operand count picks the color space; pattern names are ignored.
                let nums: Vec<f32> = op.operands.iter().filter_map(get_number).collect();
                match nums.len() {
                    1 => fill_color = pack_rgb(nums[0], nums[0], nums[0]),
                    3 => fill_color = pack_rgb(nums[0], nums[1], nums[2]),
                    4 => fill_color = pack_cmyk(nums[0], nums[1], nums[2], nums[3]),
                    _ => {}
                }
            }
            "BT" => {
                in_text_block = true;
                text_matrix = TextMatrix::default();
            }
            "ET" => {
                flush_line(&mut line_spans, &mut block_lines);
                flush_block(&mut block_lines, &mut blocks);
                in_text_block = false;
            }
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Object::Name(font_name) = &op.operands[0] {
                        current_font_name = font_name.clone();
                        current_font_family = fonts
                            .get(font_name.as_slice())
                            .and_then(|f| f.get(b"BaseFont").ok())
                            .and_then(|o| o.as_name().ok())
                            .map(|n| String::from_utf8_lossy(n).to_string())
                            .unwrap_or_else(|| {
                                String::from_utf8_lossy(font_name.as_slice()).to_string()
                            });
                    }
                    current_font_size = get_number(&op.operands[1]).unwrap_or(DEFAULT_FONT_SIZE);
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    let previous_baseline = text_matrix.baseline();
                    text_matrix.translate(tx, ty);
                    if text_matrix.baseline() != previous_baseline {
                        flush_line(&mut line_spans, &mut block_lines);
                    }
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    let previous_baseline = text_matrix.baseline();
                    text_matrix.set(
                        get_number(&op.operands[0]).unwrap_or(1.0),
                        get_number(&op.operands[1]).unwrap_or(0.0),
                        get_number(&op.operands[2]).unwrap_or(0.0),
                        get_number(&op.operands[3]).unwrap_or(1.0),
                        get_number(&op.operands[4]).unwrap_or(0.0),
                        get_number(&op.operands[5]).unwrap_or(0.0),
                    );
                    if text_matrix.baseline() != previous_baseline {
                        flush_line(&mut line_spans, &mut block_lines);
                    }
                }
            }
            "T*" => {
                text_matrix.next_line();
                flush_line(&mut line_spans, &mut block_lines);
            }
            "Tj" | "TJ" => {
                if in_text_block {
                    // Get encoding for current font
                    let encoding = fonts
                        .get(&current_font_name)
                        .and_then(|f| f.get_font_encoding(doc).ok());

                    let text = if op.operator == "TJ" {
                        // TJ: array of strings and kerning adjustments in
                        // 1/1000 text space units. Large negative values
                        // stand in for word spaces.
                        if let Some(Object::Array(arr)) = op.operands.first() {
                            let mut combined = String::new();
                            for item in arr {
                                match item {
                                    Object::String(bytes, _) => {
                                        let decoded = if let Some(ref enc) = encoding {
                                            LopdfDocument::decode_text(enc, bytes)
                                                .unwrap_or_default()
                                        } else {
                                            decode_text_simple(bytes)
                                        };
                                        combined.push_str(&decoded);
                                    }
                                    _ => {
                                        if let Some(n) = get_number(item) {
                                            if -n > TJ_SPACE_THRESHOLD
                                                && !combined.is_empty()
                                                && !combined.ends_with(' ')
                                            {
                                                combined.push(' ');
                                            }
                                        }
                                    }
                                }
                            }
                            combined
                        } else {
                            String::new()
                        }
                    } else if let Some(Object::String(bytes, _)) = op.operands.first() {
                        // Tj: single string
                        if let Some(ref enc) = encoding {
                            LopdfDocument::decode_text(enc, bytes).unwrap_or_default()
                        } else {
                            decode_text_simple(bytes)
                        }
                    } else {
                        String::new()
                    };

                    if !text.trim().is_empty() {
                        let size = current_font_size * text_matrix.scale();
                        line_spans.push(RawSpan::new(
                            size,
                            current_font_family.clone(),
                            fill_color,
                            text,
                        ));
                    }
                }
            }
            "'" | "\"" => {
                text_matrix.next_line();
                flush_line(&mut line_spans, &mut block_lines);
                if in_text_block {
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let encoding = fonts
                            .get(&current_font_name)
                            .and_then(|f| f.get_font_encoding(doc).ok());

                        let text = if let Some(ref enc) = encoding {
                            LopdfDocument::decode_text(enc, bytes).unwrap_or_default()
                        } else {
                            decode_text_simple(bytes)
                        };

                        if !text.trim().is_empty() {
                            let size = current_font_size * text_matrix.scale();
                            line_spans.push(RawSpan::new(
                                size,
                                current_font_family.clone(),
                                fill_color,
                                text,
                            ));
                        }
                    }
                }
            }
            "Do" => {
                if !in_text_block {
                    if let Some(Object::Name(name)) = op.operands.first() {
                        if image_xobjects.contains(name.as_slice()) {
                            blocks.push(RawBlock::image());
                        }
                    }
                }
            }
            _ => {}
        }
    }

    // Don't forget an unterminated text block
    flush_line(&mut line_spans, &mut block_lines);
    flush_block(&mut block_lines, &mut blocks);

    Ok(RawPage::new(blocks))
}

/// Push the pending spans as a finished line.
fn flush_line(spans: &mut Vec<RawSpan>, lines: &mut Vec<RawLine>) {
    if !spans.is_empty() {
        lines.push(RawLine::new(std::mem::take(spans)));
    }
}

/// Push the pending lines as a finished text block.
fn flush_block(lines: &mut Vec<RawLine>, blocks: &mut Vec<RawBlock>) {
    if !lines.is_empty() {
        blocks.push(RawBlock::text(std::mem::take(lines)));
    }
}

/// Pack unit-interval RGB components into 0xRRGGBB.
fn pack_rgb(r: f32, g: f32, b: f32) -> u32 {
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    (byte(r) << 16) | (byte(g) << 8) | byte(b)
}

/// Convert CMYK components to packed RGB.
fn pack_cmyk(c: f32, m: f32, y: f32, k: f32) -> u32 {
    pack_rgb(
        (1.0 - c) * (1.0 - k),
        (1.0 - m) * (1.0 - k),
        (1.0 - y) * (1.0 - k),
    )
}

/// Text matrix for tracking baseline moves in a BT..ET block.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
    line_y: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_y: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
        self.line_y = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
        if ty != 0.0 {
            self.line_y = self.f;
        }
    }

    fn next_line(&mut self) {
        // Default line leading (could be set by TL operator)
        self.f -= DEFAULT_FONT_SIZE * self.d;
        self.line_y = self.f;
    }

    fn baseline(&self) -> f32 {
        self.line_y
    }

    fn scale(&self) -> f32 {
        // Vertical scale factor of the matrix
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
