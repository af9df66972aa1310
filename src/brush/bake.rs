//! One-time stamp baking onto offscreen canvases.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::{spec, BrushKind, BrushSpec, BrushTexture};
use crate::math::InkRng;

/// The baked stamp textures, indexed by [`BrushKind`]
pub struct BrushSet {
    stamps: Vec<HtmlCanvasElement>,
}

impl BrushSet {
    /// Bake every brush once. Stipple grain comes from `rng`, so a seeded
    /// scene also gets reproducible brush texture.
    pub fn bake(document: &Document, rng: &mut InkRng) -> Result<Self, String> {
        let mut stamps = Vec::with_capacity(BrushKind::ALL.len());
        for kind in BrushKind::ALL {
            stamps.push(bake_one(document, spec(kind), rng)?);
        }
        Ok(Self { stamps })
    }

    pub fn get(&self, kind: BrushKind) -> &HtmlCanvasElement {
        &self.stamps[kind.index()]
    }
}

fn bake_one(
    document: &Document,
    spec: BrushSpec,
    rng: &mut InkRng,
) -> Result<HtmlCanvasElement, String> {
    let (canvas, ctx) = offscreen_canvas(document, spec.size)?;
    match spec.texture {
        BrushTexture::Soft => bake_soft(&ctx, &spec).map_err(|_| "soft brush bake failed")?,
        BrushTexture::Rough { .. } => {
            bake_rough(&ctx, &spec, rng).map_err(|_| "rough brush bake failed")?
        }
    }
    Ok(canvas)
}

fn offscreen_canvas(
    document: &Document,
    size: u32,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), String> {
    let canvas = document
        .create_element("canvas")
        .map_err(|_| "failed to create canvas element")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| "created element is not a canvas")?;
    canvas.set_width(size);
    canvas.set_height(size);

    let ctx = canvas
        .get_context("2d")
        .map_err(|_| "2d context unavailable")?
        .ok_or("2d context unavailable")?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| "2d context has unexpected type")?;

    Ok((canvas, ctx))
}

/// Radial gradient from the base color at full spec alpha to transparent.
fn bake_soft(ctx: &CanvasRenderingContext2d, spec: &BrushSpec) -> Result<(), JsValue> {
    let size = spec.size as f64;
    let half = size / 2.0;
    let (r, g, b) = spec.rgb;

    let grd = ctx.create_radial_gradient(half, half, 0.0, half, half, half)?;
    grd.add_color_stop(0.0, &format!("rgba({},{},{},{})", r, g, b, spec.alpha))?;
    grd.add_color_stop(1.0, &format!("rgba({},{},{},0)", r, g, b))?;
    ctx.set_fill_style_canvas_gradient(&grd);
    ctx.fill_rect(0.0, 0.0, size, size);
    Ok(())
}

/// Irregular 24-vertex blob, then grains punched out with `destination-out`
/// to read as brush bristles. Dry brushes punch more and wider grains.
fn bake_rough(
    ctx: &CanvasRenderingContext2d,
    spec: &BrushSpec,
    rng: &mut InkRng,
) -> Result<(), JsValue> {
    let size = spec.size as f64;
    let cx = size / 2.0;
    let cy = size / 2.0;
    let (r, g, b) = spec.rgb;

    ctx.set_fill_style_str(&format!("rgba({},{},{},{})", r, g, b, spec.alpha));
    ctx.begin_path();
    const EDGE_VERTICES: u32 = 24;
    for i in 0..=EDGE_VERTICES {
        let angle = TAU * i as f64 / EDGE_VERTICES as f64;
        let radius = size * 0.35 + rng.signed(1.0) as f64 * (size * 0.125);
        let px = cx + angle.cos() * radius;
        let py = cy + angle.sin() * radius;
        if i == 0 {
            ctx.move_to(px, py);
        } else {
            ctx.line_to(px, py);
        }
    }
    ctx.fill();

    ctx.set_global_composite_operation("destination-out")?;
    for _ in 0..spec.grain_count() {
        let angle = rng.range(0.0, std::f32::consts::TAU) as f64;
        let dist = rng.next_f32() as f64 * size * 0.5;
        let x = cx + angle.cos() * dist;
        let y = cy + angle.sin() * dist;
        ctx.begin_path();
        ctx.arc(x, y, rng.next_f32() as f64 * spec.grain_radius() as f64, 0.0, TAU)?;
        ctx.fill();
    }
    ctx.set_global_composite_operation("source-over")?;
    Ok(())
}
