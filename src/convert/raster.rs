//! PNG and JPEG images to single-page PDFs.

use image::{DynamicImage, ImageError, ImageReader, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, dictionary};
use std::path::Path;

use super::{PageSink, flate_stream};
use crate::error::{CompileError, Result};

/// Nominal resolution used to size the page.
pub const DPI: f32 = 100.0;

/// Page size in points for an image of `width` x `height` pixels.
pub fn page_size(width: u32, height: u32) -> (f32, f32) {
    (width as f32 * 72.0 / DPI, height as f32 * 72.0 / DPI)
}

/// Decode the image and write it as one page sized at [`DPI`].
///
/// # Errors
///
/// Returns [`CompileError::ImageDecode`] for unreadable, unsupported or
/// corrupt image data.
pub fn convert(input: &Path, output: &Path) -> Result<()> {
    let decode_error = |source: ImageError| CompileError::ImageDecode {
        path: input.to_path_buf(),
        source,
    };

    let decoded = ImageReader::open(input)
        .map_err(|e| decode_error(ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_error(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_error)?;

    if decoded.color().has_alpha() {
        log::debug!("Flattening alpha channel of {}", input.display());
    }
    let rgb = flatten(decoded);
    let (width, height) = rgb.dimensions();

    let mut sink = PageSink::new();
    let image = flate_stream(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        rgb.as_raw(),
    )?;
    let image_id = sink.document_mut().add_object(image);

    let (page_width, page_height) = page_size(width, height);
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    page_width.into(),
                    0.into(),
                    0.into(),
                    page_height.into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = sink
        .document_mut()
        .add_object(flate_stream(Dictionary::new(), &content.encode()?)?);

    sink.push_page(dictionary! {
        "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
    });

    sink.save(output)?;
    Ok(())
}

/// Opaque RGB, compositing any alpha over white.
fn flatten(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.into_rgb8();
    }

    let rgba = image.into_rgba8();
    let (width, height) = rgba.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};
    use lopdf::Document;
    use tempfile::TempDir;

    #[test]
    fn test_page_size() {
        assert_eq!(page_size(100, 200), (72.0, 144.0));
    }

    #[test]
    fn test_flatten_over_white() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        rgba.put_pixel(1, 0, Rgba([10, 20, 30, 255]));

        let rgb = flatten(DynamicImage::ImageRgba8(rgba));
        assert_eq!(*rgb.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*rgb.get_pixel(1, 0), Rgb([10, 20, 30]));
    }

    #[test]
    fn test_convert_png_with_alpha() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("logo.png");
        let output = dir.path().join("logo.pdf");
        RgbaImage::from_pixel(50, 20, Rgba([200, 0, 0, 128]))
            .save(&input)
            .unwrap();

        convert(&input, &output).unwrap();

        let doc = Document::load(&output).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page = doc.get_dictionary(pages[&1]).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_float().unwrap(), 36.0);
        assert!((media_box[3].as_float().unwrap() - 14.4).abs() < 0.01);
    }

    #[test]
    fn test_corrupt_image_rejected() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("broken.png");
        let output = dir.path().join("broken.pdf");
        std::fs::write(&input, b"\x89PNG\r\n\x1a\nnot really").unwrap();

        let result = convert(&input, &output);
        assert!(matches!(result, Err(CompileError::ImageDecode { .. })));
        assert!(!output.exists());
    }
}
