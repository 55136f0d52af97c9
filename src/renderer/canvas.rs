//! Canvas 2D backend

use std::f64::consts::TAU;

use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::shapes::{Color, Shape};

/// Paints draw lists onto a canvas
pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    /// Paint shapes in order, later shapes on top
    pub fn paint(&self, shapes: &[Shape]) -> Result<(), JsValue> {
        let ctx = &self.ctx;

        for shape in shapes {
            ctx.set_fill_style_str(&css(shape.color()));
            match shape {
                Shape::Rect { x, y, w, h, .. } => {
                    ctx.fill_rect(*x as f64, *y as f64, *w as f64, *h as f64);
                }
                Shape::Ellipse { center, w, h, .. } => {
                    ctx.begin_path();
                    ctx.ellipse(
                        center.x as f64,
                        center.y as f64,
                        (w / 2.0).max(0.0) as f64,
                        (h / 2.0).max(0.0) as f64,
                        0.0,
                        0.0,
                        TAU,
                    )?;
                    ctx.fill();
                }
                Shape::Triangle { points, .. } => {
                    let [a, b, c] = points;
                    ctx.begin_path();
                    ctx.move_to(a.x as f64, a.y as f64);
                    ctx.line_to(b.x as f64, b.y as f64);
                    ctx.line_to(c.x as f64, c.y as f64);
                    ctx.close_path();
                    ctx.fill();
                }
                Shape::Text { x, y, size, text, .. } => {
                    ctx.set_font(&format!("{}px Verdana", size));
                    ctx.fill_text(text, *x as f64, *y as f64)?;
                }
            }
        }
        Ok(())
    }
}

fn css(c: Color) -> String {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {:.3})",
        channel(c[0]),
        channel(c[1]),
        channel(c[2]),
        c[3].clamp(0.0, 1.0)
    )
}
