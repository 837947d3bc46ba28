//! Crosshair rasterization into a CPU framebuffer.
//!
//! The renderer is a pure downstream consumer: it takes the engine's
//! per-tick `RenderFrame` and paints four segments around the shifted screen
//! center. The outline pass is drawn first, expanded by the outline
//! thickness, so it stays visible around the main line.

use std::sync::Arc;

use pixels::{Error, Pixels, PixelsBuilder, SurfaceTexture};
use reticle::RenderFrame;
use winit::window::Window;

use crate::config_store::Appearance;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment {
    Horizontal { y: i32, x0: i32, x1: i32 },
    Vertical { x: i32, y0: i32, y1: i32 },
}

pub struct OverlayRenderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
}

impl OverlayRenderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            width: size.width,
            height: size.height,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        PixelsBuilder::new(width, height, surface)
            .clear_color(pixels::wgpu::Color::TRANSPARENT)
            .build()
    }

    /// Paint one frame. `None` clears to fully transparent (overlay hidden).
    pub fn render(
        &mut self,
        frame: Option<&RenderFrame>,
        appearance: &Appearance,
    ) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }

        let buffer = self.pixels.frame_mut();
        buffer.fill(0);

        if let Some(frame) = frame {
            let center_x = (self.width / 2) as i32;
            let center_y = (self.height / 2) as i32;
            let segments = crosshair_segments(frame, center_x, center_y);

            if appearance.show_outline {
                let outline = appearance.outline_thickness;
                for segment in segments {
                    draw_segment(
                        buffer,
                        self.width,
                        self.height,
                        segment,
                        appearance.line_thickness + 2 * outline,
                        outline as i32,
                        appearance.outline_color,
                    );
                }
            }
            for segment in segments {
                draw_segment(
                    buffer,
                    self.width,
                    self.height,
                    segment,
                    appearance.line_thickness,
                    0,
                    appearance.color,
                );
            }
        }

        self.pixels.render()
    }
}

/// Segment endpoints for one frame, in screen pixels. The center is shifted
/// by jitter on both axes and by recoil vertically; each arm spans from the
/// gap edge to `gap + arm_length`.
pub(crate) fn crosshair_segments(
    frame: &RenderFrame,
    center_x: i32,
    center_y: i32,
) -> [Segment; 4] {
    let cx = center_x + frame.jitter_x.round() as i32;
    let cy = center_y + (frame.jitter_y + frame.recoil_y).round() as i32;
    let gap = frame.gap.max(0.0).round() as i32;
    let outer = gap + frame.arm_length.max(0.0).round() as i32;

    [
        Segment::Horizontal {
            y: cy,
            x0: cx - outer,
            x1: cx - gap,
        },
        Segment::Horizontal {
            y: cy,
            x0: cx + gap,
            x1: cx + outer,
        },
        Segment::Vertical {
            x: cx,
            y0: cy - outer,
            y1: cy - gap,
        },
        Segment::Vertical {
            x: cx,
            y0: cy + gap,
            y1: cy + outer,
        },
    ]
}

fn draw_segment(
    frame: &mut [u8],
    width: u32,
    height: u32,
    segment: Segment,
    thickness: u32,
    extend: i32,
    color: [u8; 4],
) {
    let thickness = thickness.max(1) as i32;
    let near = thickness / 2;
    let far = thickness - near;
    match segment {
        Segment::Horizontal { y, x0, x1 } => {
            for row in (y - near)..(y + far) {
                for x in (x0 - extend)..=(x1 + extend) {
                    write_pixel_rgba_clipped(frame, width, height, x, row, color);
                }
            }
        }
        Segment::Vertical { x, y0, y1 } => {
            for col in (x - near)..(x + far) {
                for y in (y0 - extend)..=(y1 + extend) {
                    write_pixel_rgba_clipped(frame, width, height, col, y, color);
                }
            }
        }
    }
}

fn write_pixel_rgba_clipped(frame: &mut [u8], width: u32, height: u32, x: i32, y: i32, color: [u8; 4]) {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return;
    }
    let pixel_offset = y as usize * width as usize + x as usize;
    let byte_offset = pixel_offset * 4;
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }
    frame[byte_offset..end].copy_from_slice(&color);
}
