use std::path::{Path, PathBuf};

use image::{ColorType, ImageFormat};
use log::{debug, info};
use show_image::{create_window, event, ImageInfo, ImageView, WindowOptions};

use crate::error::{RenderError, Result};
use crate::interpreter::{Persist, Present};
use crate::scene::PixelBuffer;

/// Writes SAVE output to image files, relative to `directory`.
/// The format follows the file extension; names without one are written as PNG.
#[derive(Debug, Clone, Default)]
pub struct ImageFile {
    pub directory: PathBuf,
}

impl ImageFile {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        return Self {
            directory: directory.into(),
        };
    }
}

impl Persist for ImageFile {
    fn save(&mut self, pixels: &PixelBuffer, name: &str) -> Result<()> {
        let path = self.directory.join(name);
        let data = pixels.as_render_data();
        let (width, height) = (pixels.width(), pixels.height());
        let saved = if Path::new(name).extension().is_some() {
            image::save_buffer(&path, data, width, height, ColorType::Rgb8)
        } else {
            image::save_buffer_with_format(
                &path,
                data,
                width,
                height,
                ColorType::Rgb8,
                ImageFormat::Png,
            )
        };
        saved.map_err(|source| RenderError::Save {
            path: path.clone(),
            source,
        })?;
        info!("saved {}", path.display());
        return Ok(());
    }
}

/// Helper, defining exit event to be an Escape key press.
fn is_exit_event(window_event: event::WindowEvent) -> bool {
    if let event::WindowEvent::KeyboardInput(event) = window_event {
        if event.input.key_code == Some(event::VirtualKeyCode::Escape)
            && event.input.state.is_released()
        {
            return true;
        }
    }
    return false;
}

/// Shows DISPLAY output in a window and waits until it is closed or Escape is
/// released. Needs the show-image context set up by `#[show_image::main]`.
#[derive(Debug, Clone)]
pub struct Window {
    pub title: String,
}

impl Default for Window {
    fn default() -> Self {
        return Self {
            title: String::from("mdl_renderer"),
        };
    }
}

impl Present for Window {
    fn display(&mut self, pixels: &PixelBuffer) -> Result<()> {
        fn display_error(e: impl std::fmt::Display) -> RenderError {
            return RenderError::Display(e.to_string());
        }

        let window_options = WindowOptions {
            size: Some([pixels.width(), pixels.height()]),
            ..Default::default()
        };
        let window = create_window(self.title.as_str(), window_options).map_err(display_error)?;
        let image_data = ImageView::new(
            ImageInfo::rgb8(pixels.width(), pixels.height()),
            pixels.as_render_data(),
        );
        window.set_image("image", image_data).map_err(display_error)?;

        // The channel closes together with the window.
        let event_channel = window.event_channel().map_err(display_error)?;
        for window_event in event_channel.iter() {
            if is_exit_event(window_event) {
                break;
            }
        }
        return Ok(());
    }
}

/// Ignores DISPLAY, for runs without a screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Present for Headless {
    fn display(&mut self, pixels: &PixelBuffer) -> Result<()> {
        debug!("headless: skipping display of {}x{} image", pixels.width(), pixels.height());
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Color;
    use test_log::test;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir_name = format!("mdl_renderer_{}_{}", name, std::process::id());
        let dir = std::env::temp_dir().join(dir_name);
        std::fs::create_dir_all(&dir).unwrap();
        return dir;
    }

    #[test]
    fn test_saves_in_extension_format() {
        let dir = scratch_dir("ext");
        let mut pixels = PixelBuffer::new(4, 2, Color::default());
        pixels.set_pixel(0, 0, Color { r: 255, g: 0, b: 0 });
        ImageFile::new(&dir).save(&pixels, "out.png").unwrap();

        let saved = image::open(dir.join("out.png")).unwrap().to_rgb8();
        assert_eq!(saved.dimensions(), (4, 2));
        // Bottom left pixel is the last row of the file.
        assert_eq!(saved.get_pixel(0, 1).0, [255, 0, 0]);
        assert_eq!(saved.get_pixel(0, 0).0, [0, 0, 0]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_name_without_extension_is_png() {
        let dir = scratch_dir("noext");
        let pixels = PixelBuffer::new(3, 3, Color { r: 1, g: 2, b: 3 });
        ImageFile::new(&dir).save(&pixels, "picture").unwrap();
        let format = image::ImageFormat::from_path(dir.join("picture"));
        assert!(format.is_err());
        let bytes = std::fs::read(dir.join("picture")).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_unwritable_destination_surfaces_error() {
        let pixels = PixelBuffer::new(2, 2, Color::default());
        let mut persist = ImageFile::new("/nonexistent/mdl_renderer/dir");
        let err = persist.save(&pixels, "x.png").unwrap_err();
        assert!(matches!(err, RenderError::Save { .. }));
    }

    #[test]
    fn test_headless_display_leaves_buffer_alone() {
        let pixels = PixelBuffer::new(2, 2, Color { r: 9, g: 9, b: 9 });
        let before = pixels.clone();
        Headless.display(&pixels).unwrap();
        assert_eq!(pixels, before);
    }
}
