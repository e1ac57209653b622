//! Fixed page layout shared by the text and Word converters.
//!
//! Paragraphs are set in 12 pt Helvetica on A4 paper with a 10 mm line
//! pitch. Lines are word-wrapped to the text width and the page breaks
//! automatically once the next line would cross the bottom margin.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, StringFormat, dictionary};
use std::path::Path;

use super::{PageSink, flate_stream};
use crate::error::Result;

/// Points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// A4 width in points.
pub const A4_WIDTH: f32 = 210.0 * PT_PER_MM;

/// A4 height in points.
pub const A4_HEIGHT: f32 = 297.0 * PT_PER_MM;

/// Helvetica advance widths for 0x20..=0x7E, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica advance widths for WinAnsi bytes 0x80..=0xFF; 0 marks an
/// unassigned code.
const HELVETICA_HIGH_WIDTHS: [u16; 128] = [
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0, // 0x80
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667, // 0x90
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // 0xA0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // 0xB0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // 0xC0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // 0xD0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // 0xE0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // 0xF0
];

/// Characters WinAnsiEncoding places in 0x80..=0x9F.
const WIN_ANSI_EXTRAS: [(char, u8); 27] = [
    ('\u{20AC}', 0x80), // €
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85), // …
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

const DEFAULT_WIDTH: u16 = 556;

const TAB_WIDTH: usize = 4;

/// Geometry of the text page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayout {
    /// Page width in points.
    pub page_width: f32,
    /// Page height in points.
    pub page_height: f32,
    /// Font size in points.
    pub font_size: f32,
    /// Distance between consecutive baselines, in points.
    pub line_height: f32,
    /// Left, right and top margin, in points.
    pub margin: f32,
    /// Bottom margin that triggers a page break, in points.
    pub bottom_margin: f32,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            font_size: 12.0,
            line_height: 10.0 * PT_PER_MM,
            margin: 10.0 * PT_PER_MM,
            bottom_margin: 15.0 * PT_PER_MM,
        }
    }
}

impl TextLayout {
    /// Width available to a line of text.
    pub fn text_width(&self) -> f32 {
        // Cells keep a small inner padding on each side.
        self.page_width - 2.0 * self.margin - 2.0 * self.cell_padding()
    }

    fn cell_padding(&self) -> f32 {
        self.margin / 10.0
    }

    /// Number of lines that fit on one page.
    pub fn lines_per_page(&self) -> usize {
        let usable = self.page_height - self.margin - self.bottom_margin;
        ((usable / self.line_height).floor() as usize).max(1)
    }

    /// Rendered width of `text` in points.
    pub fn measure(&self, text: &str) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(glyph_width(c))).sum();
        units as f32 * self.font_size / 1000.0
    }

    /// Break one paragraph into lines that fit [`Self::text_width`].
    ///
    /// An empty paragraph still occupies one (blank) line. Words wider
    /// than the line are split between characters.
    pub fn wrap(&self, paragraph: &str) -> Vec<String> {
        let max = self.text_width();
        let mut lines = Vec::new();

        for segment in paragraph.split('\n') {
            let mut line = String::new();

            for word in segment.split(' ') {
                let candidate = if line.is_empty() {
                    word.to_string()
                } else {
                    format!("{line} {word}")
                };

                if self.measure(&candidate) <= max {
                    line = candidate;
                    continue;
                }

                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }

                for c in word.chars() {
                    line.push(c);
                    if self.measure(&line) > max && line.chars().count() > 1 {
                        line.pop();
                        lines.push(std::mem::take(&mut line));
                        line.push(c);
                    }
                }
            }

            lines.push(line);
        }

        lines
    }

    /// Lay out paragraphs into pages of lines. Always yields at least one page.
    pub fn paginate<S: AsRef<str>>(&self, paragraphs: &[S]) -> Vec<Vec<String>> {
        let per_page = self.lines_per_page();
        let lines: Vec<String> = paragraphs
            .iter()
            .flat_map(|p| self.wrap(&expand_tabs(p.as_ref())))
            .collect();

        if lines.is_empty() {
            return vec![Vec::new()];
        }

        lines.chunks(per_page).map(<[String]>::to_vec).collect()
    }

    /// Content stream drawing `lines` top-down on one page.
    fn page_content(&self, lines: &[String]) -> Content {
        let mut operations = Vec::with_capacity(lines.len() * 5);

        let x = self.margin + self.cell_padding();
        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }

            let top = self.margin + i as f32 * self.line_height;
            let baseline = top + self.line_height / 2.0 + 0.3 * self.font_size;
            let y = self.page_height - baseline;

            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), self.font_size.into()]));
            operations.push(Operation::new("Td", vec![x.into(), y.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(to_win_ansi(line), StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        Content { operations }
    }

    /// Render paragraphs into a PDF at `output`; returns the page count.
    pub fn render<S: AsRef<str>>(&self, paragraphs: &[S], output: &Path) -> Result<usize> {
        let mut sink = PageSink::new();

        let font_id = sink.document_mut().add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = sink.document_mut().add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        for lines in self.paginate(paragraphs) {
            let content = self.page_content(&lines).encode()?;
            let stream = flate_stream(Dictionary::new(), &content)?;
            let content_id = sink.document_mut().add_object(stream);

            sink.push_page(dictionary! {
                "MediaBox" => vec![0.into(), 0.into(), self.page_width.into(), self.page_height.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
        }

        sink.save(output)
    }
}

fn glyph_width(c: char) -> u16 {
    match win_ansi_byte(c) {
        Some(code @ 0x20..=0x7E) => HELVETICA_WIDTHS[usize::from(code - 0x20)],
        Some(code @ 0x80..=0xFF) => match HELVETICA_HIGH_WIDTHS[usize::from(code - 0x80)] {
            0 => DEFAULT_WIDTH,
            width => width,
        },
        _ => DEFAULT_WIDTH,
    }
}

/// The WinAnsiEncoding byte for `c`, if the encoding has one.
fn win_ansi_byte(c: char) -> Option<u8> {
    match u32::from(c) {
        code @ (0x00..=0x7F | 0xA0..=0xFF) => u8::try_from(code).ok(),
        _ => WIN_ANSI_EXTRAS
            .iter()
            .find(|(extra, _)| *extra == c)
            .map(|&(_, byte)| byte),
    }
}

/// Replace tabs with spaces up to the next tab stop.
pub fn expand_tabs(text: &str) -> String {
    if !text.contains('\t') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + TAB_WIDTH);
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = TAB_WIDTH - column % TAB_WIDTH;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// Encode for the standard Type1 font; characters WinAnsiEncoding lacks
/// become `?`.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .filter(|c| !c.is_control())
        .map(|c| win_ansi_byte(c).unwrap_or(b'?'))
        .collect()
}
