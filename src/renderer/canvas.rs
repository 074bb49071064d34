//! Canvas 2D painter for the browser host

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{DrawCommand, STAND_SPAN, STAND_WIDTH};

const FRAME_COLOR: &str = "#666666";
const INK_COLOR: &str = "black";
const BARREL_COLOR: &str = "#2b2b2b";

pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasPainter {
    /// Grab the 2D context of a canvas, if the browser provides one
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    /// Clear the surface and paint a frame's commands in order
    pub fn paint(&self, commands: &[DrawCommand]) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        for command in commands {
            match command {
                DrawCommand::Frame { arena, boundary } => {
                    self.ctx.set_fill_style_str(FRAME_COLOR);
                    self.ctx
                        .fill_rect(0.0, 0.0, arena.x as f64, arena.y as f64);
                    self.ctx.clear_rect(
                        boundary.left as f64,
                        boundary.top as f64,
                        boundary.width() as f64,
                        boundary.height() as f64,
                    );
                }
                DrawCommand::Launcher {
                    base,
                    pivot,
                    angle,
                    barrel_origin,
                    barrel_size,
                } => {
                    self.ctx.save();

                    self.ctx.set_stroke_style_str(INK_COLOR);
                    self.ctx.set_line_width(STAND_WIDTH as f64);
                    self.ctx.begin_path();
                    self.ctx.move_to(base.x as f64, base.y as f64);
                    self.ctx.line_to(pivot.x as f64, pivot.y as f64);
                    self.ctx
                        .line_to((base.x + STAND_SPAN) as f64, base.y as f64);
                    self.ctx.stroke();

                    // Rotate the barrel around the pivot
                    let _ = self.ctx.translate(pivot.x as f64, pivot.y as f64);
                    let _ = self.ctx.rotate(*angle as f64);
                    let _ = self.ctx.translate(-pivot.x as f64, -pivot.y as f64);
                    self.ctx.set_fill_style_str(BARREL_COLOR);
                    self.ctx.fill_rect(
                        barrel_origin.x as f64,
                        barrel_origin.y as f64,
                        barrel_size.x as f64,
                        barrel_size.y as f64,
                    );

                    self.ctx.restore();
                }
                DrawCommand::Circle { center, radius } => {
                    self.ctx.set_fill_style_str(INK_COLOR);
                    self.ctx.begin_path();
                    let _ = self.ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        *radius as f64,
                        0.0,
                        TAU,
                    );
                    self.ctx.fill();
                }
            }
        }
    }
}
