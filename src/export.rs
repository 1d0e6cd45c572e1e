use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::ColorImage;
use image::RgbaImage;

/// Convert an egui screenshot into an RGBA buffer.
/// `None` when the pixel count does not match the declared size.
pub fn to_rgba(shot: &ColorImage) -> Option<RgbaImage> {
    let [width, height] = shot.size;
    let bytes: Vec<u8> = shot
        .pixels
        .iter()
        .flat_map(|c| c.to_srgba_unmultiplied())
        .collect();
    RgbaImage::from_raw(width as u32, height as u32, bytes)
}

/// Write a screenshot to `path` as PNG.
pub fn save_png(shot: &ColorImage, path: &Path) -> Result<()> {
    let rgba = to_rgba(shot).context("screenshot size does not match its pixels")?;
    rgba.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use eframe::egui::Color32;

    use super::*;

    #[test]
    fn pixels_keep_their_position() {
        let mut shot = ColorImage::new([2, 1], Color32::WHITE);
        shot.pixels[1] = Color32::from_rgb(255, 105, 180);
        let rgba = to_rgba(&shot).unwrap();
        assert_eq!(rgba.dimensions(), (2, 1));
        assert_eq!(rgba.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(rgba.get_pixel(1, 0).0, [255, 105, 180, 255]);
    }

    #[test]
    fn mismatched_size_is_rejected() {
        let mut shot = ColorImage::new([2, 2], Color32::BLACK);
        shot.pixels.pop();
        assert!(to_rgba(&shot).is_none());
    }

    #[test]
    fn png_is_written() {
        let path = std::env::temp_dir().join(format!("imdb-dashboard-export-{}.png", std::process::id()));
        let shot = ColorImage::new([3, 2], Color32::LIGHT_BLUE);
        save_png(&shot, &path).unwrap();
        let written = image::open(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!((written.width(), written.height()), (3, 2));
    }
}
