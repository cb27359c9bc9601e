/// Batch capture: render once, encode PNG, write
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::ImageFormat;
use log::{debug, info};
use polyview_core::Scene;
use thiserror::Error;

use crate::render::{render_scaled, render_scene, FrameBuffer};

/// Fixed destination of interactive captures, in the working
/// directory. Overwritten on every capture.
pub const SCREENSHOT_FILE: &str = "screenshot.png";

/// Where the rasterized frame is presented. Chosen once, before any
/// render target exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderBackend {
    /// Show a terminal preview of the captured frame.
    #[default]
    Onscreen,
    /// Rasterize without touching the terminal.
    Offscreen,
}

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("cannot write `{path}`: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Write the frame to `path` as PNG bytes, whatever the extension
/// says.
pub fn write_png(frame: &FrameBuffer, path: &Path) -> Result<(), CaptureError> {
    let file = File::create(path).map_err(|source| CaptureError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    frame.to_image().write_to(&mut writer, ImageFormat::Png)?;
    Ok(())
}

/// One-shot capture: render the scene exactly once, encode it and
/// write it to `path`. The onscreen backend additionally previews the
/// frame on the terminal.
pub fn batch(scene: &Scene, path: &Path, backend: RenderBackend) -> Result<(), CaptureError> {
    debug!("rendering {}x{} frame", scene.width(), scene.height());
    let frame = render_scene(scene);
    write_png(&frame, path)?;
    info!(
        "wrote {} ({}x{})",
        path.display(),
        frame.width(),
        frame.height()
    );
    if backend == RenderBackend::Onscreen {
        preview(scene);
    }
    Ok(())
}

/// Downscaled terminal rendition of the scene, character cells being
/// roughly twice as tall as wide.
fn preview(scene: &Scene) {
    const COLS: u32 = 80;
    let rows = (COLS * scene.height() / scene.width() / 2).max(1);
    for row in render_scaled(scene, COLS, rows).ascii_rows() {
        println!("{row}");
    }
}
