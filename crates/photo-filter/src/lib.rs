mod error;

pub use error::*;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, RgbaImage};
use std::{path::Path, str::FromStr};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

pub const FILTERED_IMAGE_FILE_NAME: &str = "filtered_image.png";

const SEPIA_DARK: [u8; 3] = [0x70, 0x42, 0x14];
const SEPIA_LIGHT: [u8; 3] = [0xC0, 0xA0, 0x80];

const BRIGHTNESS_FACTOR: f32 = 1.5;
const COOL_TONE_BLUE_FACTOR: f32 = 1.3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, AsRefStr, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum PhotoFilter {
    #[default]
    Original,
    #[strum(serialize = "Black & White")]
    BlackAndWhite,
    Sepia,
    #[strum(serialize = "Bright Boost")]
    BrightBoost,
    #[strum(serialize = "Cool Tone")]
    CoolTone,
}

impl PhotoFilter {
    pub fn from_name(name: &str) -> FilterResult<Self> {
        Self::from_str(name.trim()).map_err(|_| FilterError::UnknownFilter(name.to_string()))
    }
}

fn scale_channel(value: u8, factor: f32) -> u8 {
    (value as f32 * factor).round().min(255.0) as u8
}

fn lerp_channel(dark: u8, light: u8, luma: u8) -> u8 {
    let t = luma as f32 / 255.0;
    (dark as f32 + (light as f32 - dark as f32) * t).round() as u8
}

fn sepia(image: &DynamicImage) -> DynamicImage {
    let gray = image.to_luma8();
    let colored = ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        let luma = gray.get_pixel(x, y).0[0];
        Rgb([
            lerp_channel(SEPIA_DARK[0], SEPIA_LIGHT[0], luma),
            lerp_channel(SEPIA_DARK[1], SEPIA_LIGHT[1], luma),
            lerp_channel(SEPIA_DARK[2], SEPIA_LIGHT[2], luma),
        ])
    });
    DynamicImage::ImageRgb8(colored)
}

/// Scale the colour channels selected by `mask`, alpha is left alone.
fn scale_rgb(image: &DynamicImage, factor: f32, mask: [bool; 3]) -> DynamicImage {
    let mut buffer: RgbaImage = image.to_rgba8();
    for pixel in buffer.pixels_mut() {
        for (channel, scaled) in pixel.0.iter_mut().zip(mask) {
            if scaled {
                *channel = scale_channel(*channel, factor);
            }
        }
    }
    DynamicImage::ImageRgba8(buffer)
}

/// Apply a filter to an image. The input is never modified.
pub fn apply(image: &DynamicImage, filter: PhotoFilter) -> DynamicImage {
    tracing::debug!("apply filter: {}", filter);

    match filter {
        PhotoFilter::Original => image.clone(),
        PhotoFilter::BlackAndWhite => image.grayscale(),
        PhotoFilter::Sepia => sepia(image),
        PhotoFilter::BrightBoost => scale_rgb(image, BRIGHTNESS_FACTOR, [true, true, true]),
        PhotoFilter::CoolTone => scale_rgb(image, COOL_TONE_BLUE_FACTOR, [false, false, true]),
    }
}

pub fn open_image(path: impl AsRef<Path>) -> FilterResult<DynamicImage> {
    let path = path.as_ref();
    image::open(path).map_err(|source| FilterError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Save as PNG regardless of the file extension.
pub fn save_png(image: &DynamicImage, path: impl AsRef<Path>) -> FilterResult<()> {
    let path = path.as_ref();
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| FilterError::Save {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!("filtered image saved to {}", path.display());

    Ok(())
}
