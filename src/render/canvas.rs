//! Canvas2D implementation of the drawing surface.
//!
//! Draw faults (a detached canvas, an invalid composite op) are warned to
//! the console and absorbed: a glitched frame is preferable to a stopped
//! animation loop.

use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{console, CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::{Blend, Layer, Painter};
use crate::brush::{BrushKind, BrushSet};
use crate::math::Vec2;

impl Blend {
    fn composite_op(self) -> &'static str {
        match self {
            Blend::Normal => "source-over",
            Blend::Multiply => "multiply",
        }
    }
}

/// One Canvas2D surface (the visible canvas or an offscreen cache)
pub struct CanvasLayer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    brushes: Rc<BrushSet>,
}

impl CanvasLayer {
    /// Wrap an existing canvas element (the visible surface)
    pub fn wrap(canvas: HtmlCanvasElement, brushes: Rc<BrushSet>) -> Result<Self, String> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| "2d context unavailable")?
            .ok_or("2d context unavailable")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "2d context has unexpected type")?;
        Ok(Self {
            canvas,
            ctx,
            brushes,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Run a draw body between save/restore, warning on fault
    fn guarded(&self, what: &str, body: impl FnOnce(&CanvasRenderingContext2d) -> Result<(), JsValue>) {
        self.ctx.save();
        if body(&self.ctx).is_err() {
            console::warn_1(&JsValue::from_str(&format!("ink-garden: {} draw failed", what)));
        }
        self.ctx.restore();
    }
}

impl Layer for CanvasLayer {
    fn width(&self) -> f32 {
        self.canvas.width() as f32
    }

    fn height(&self) -> f32 {
        self.canvas.height() as f32
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn stamp(
        &mut self,
        brush: BrushKind,
        center: Vec2,
        w: f32,
        h: f32,
        rotation: f32,
        alpha: f32,
        blend: Blend,
    ) {
        let stamp = self.brushes.get(brush).clone();
        self.guarded("stamp", move |ctx| {
            ctx.translate(center.x as f64, center.y as f64)?;
            ctx.rotate(rotation as f64)?;
            ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
            ctx.set_global_composite_operation(blend.composite_op())?;
            ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
                &stamp,
                -(w as f64) / 2.0,
                -(h as f64) / 2.0,
                w as f64,
                h as f64,
            )
        });
    }

    fn stroke_quadratic(
        &mut self,
        from: Vec2,
        ctrl: Vec2,
        to: Vec2,
        width: f32,
        rgb: (u8, u8, u8),
        alpha: f32,
    ) {
        self.guarded("stroke", move |ctx| {
            ctx.begin_path();
            ctx.move_to(from.x as f64, from.y as f64);
            ctx.quadratic_curve_to(ctrl.x as f64, ctrl.y as f64, to.x as f64, to.y as f64);
            ctx.set_stroke_style_str(&format!(
                "rgba({},{},{},{})",
                rgb.0,
                rgb.1,
                rgb.2,
                alpha.clamp(0.0, 1.0)
            ));
            ctx.set_line_width(width as f64);
            ctx.set_line_cap("round");
            ctx.stroke();
            Ok(())
        });
    }

    fn blit(&mut self, src: &Self, offset: Vec2, alpha: f32, blend: Blend) {
        let src_canvas = src.canvas.clone();
        self.guarded("blit", move |ctx| {
            ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
            ctx.set_global_composite_operation(blend.composite_op())?;
            ctx.draw_image_with_html_canvas_element(&src_canvas, offset.x as f64, offset.y as f64)
        });
    }
}

/// Creates offscreen [`CanvasLayer`]s sharing one baked brush set
pub struct CanvasPainter {
    document: Document,
    brushes: Rc<BrushSet>,
}

impl CanvasPainter {
    pub fn new(document: Document, brushes: Rc<BrushSet>) -> Self {
        Self { document, brushes }
    }
}

impl Painter for CanvasPainter {
    type Layer = CanvasLayer;

    fn create_layer(&self, width: f32, height: f32) -> Result<CanvasLayer, String> {
        let canvas = self
            .document
            .create_element("canvas")
            .map_err(|_| "failed to create canvas element")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| "created element is not a canvas")?;
        canvas.set_width(width.max(1.0).ceil() as u32);
        canvas.set_height(height.max(1.0).ceil() as u32);
        CanvasLayer::wrap(canvas, Rc::clone(&self.brushes))
    }
}
