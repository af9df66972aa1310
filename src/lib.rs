//! Interactive ink-wash poem garden.
//!
//! Poem glyphs hang in the air as physics bodies; a tap or a long-press
//! shockwave shakes them loose, and wherever one strikes the ground an
//! ink flower or a branching tree blooms, holds, and fades away.
//!
//! Main components:
//! - [`brush`] — pre-baked soft and rough stamp textures.
//! - [`particles`] — the ripple burst fired by a long press.
//! - [`growth`] — flower and tree organisms with bounded lifecycles.
//! - [`physics`] — boundary to the external rigid-body engine.
//! - [`interaction`] — press gestures and the glyph ↔ body side-table.
//! - [`scene`] — the compositor driving one tick per display refresh.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlElement};

pub mod animation;
pub mod brush;
pub mod config;
pub mod data;
pub mod growth;
pub mod interaction;
pub mod math;
pub mod particles;
pub mod physics;
pub mod render;
pub mod scene;

use brush::BrushSet;
use config::SceneConfig;
use data::Poem;
use math::{InkRng, Vec2};
use render::{CanvasLayer, CanvasPainter, Layer};
use scene::{GlyphId, GlyphOverlay, Stage, Viewport};

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// DOM-backed glyph overlay: one absolutely positioned element per glyph
struct DomOverlay {
    document: Document,
    container: HtmlElement,
    glyphs: Vec<Option<HtmlElement>>,
}

impl DomOverlay {
    fn new(document: Document, container: HtmlElement) -> Self {
        Self {
            document,
            container,
            glyphs: Vec::new(),
        }
    }
}

impl GlyphOverlay for DomOverlay {
    fn spawn(&mut self, ch: char, x: f32, y: f32, size: f32) -> GlyphId {
        let id = self.glyphs.len();
        let element = self
            .document
            .create_element("div")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if let Some(el) = &element {
            el.set_class_name("char-box");
            el.set_inner_text(&ch.to_string());
            let style = el.style();
            let _ = style.set_property("position", "absolute");
            let _ = style.set_property("left", &format!("{}px", x));
            let _ = style.set_property("top", &format!("{}px", y));
            let _ = style.set_property("width", &format!("{}px", size));
            let _ = style.set_property("height", &format!("{}px", size));
            let _ = self.container.append_child(el);
        }
        self.glyphs.push(element);
        id
    }

    fn set_transform(&mut self, glyph: GlyphId, translate: Vec2, rotation: f32, scale: f32) {
        if let Some(Some(el)) = self.glyphs.get(glyph) {
            let transform = if (scale - 1.0).abs() > f32::EPSILON {
                format!(
                    "translate({}px, {}px) rotate({}rad) scale({})",
                    translate.x, translate.y, rotation, scale
                )
            } else {
                format!(
                    "translate({}px, {}px) rotate({}rad)",
                    translate.x, translate.y, rotation
                )
            };
            let _ = el.style().set_property("transform", &transform);
        }
    }

    fn hide(&mut self, glyph: GlyphId) {
        if let Some(Some(el)) = self.glyphs.get(glyph) {
            let _ = el.style().set_property("display", "none");
        }
    }
}

/// Main engine state exposed to JavaScript.
///
/// The host page forwards `requestAnimationFrame` timestamps to
/// [`frame`](InkGarden::frame) and normalized pointer events to the
/// `pointer_*` methods; everything else happens inside.
#[wasm_bindgen]
pub struct InkGarden {
    stage: Stage<CanvasPainter>,
    painter: CanvasPainter,
    screen: CanvasLayer,
    overlay: DomOverlay,
}

#[wasm_bindgen]
impl InkGarden {
    /// Create an engine drawing into `canvas`, with glyph elements
    /// appended to `poem_container`
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        poem_container: HtmlElement,
    ) -> Result<InkGarden, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;

        let seed = js_sys::Date::now() as u32;
        let mut rng = InkRng::new(seed);
        let brushes =
            Rc::new(BrushSet::bake(&document, &mut rng).map_err(|e| JsValue::from_str(&e))?);

        let painter = CanvasPainter::new(document.clone(), Rc::clone(&brushes));
        let screen =
            CanvasLayer::wrap(canvas, brushes).map_err(|e| JsValue::from_str(&e))?;
        let viewport = Viewport {
            width: screen.width(),
            height: screen.height(),
        };

        Ok(Self {
            stage: Stage::new(SceneConfig::default(), viewport, seed),
            painter,
            screen,
            overlay: DomOverlay::new(document, poem_container),
        })
    }

    /// Load a poem from YAML and lay its glyphs out
    #[wasm_bindgen]
    pub fn load_poem(&mut self, yaml: &str) -> Result<(), JsValue> {
        let poem = Poem::from_yaml(yaml).map_err(|e| JsValue::from_str(&e))?;
        self.stage.seed_poem(&poem, &mut self.overlay);
        Ok(())
    }

    /// Lay out the built-in poem
    #[wasm_bindgen]
    pub fn load_default_poem(&mut self) {
        self.stage.seed_poem(&Poem::built_in(), &mut self.overlay);
    }

    /// Override scene tunables from a (possibly partial) YAML document
    #[wasm_bindgen]
    pub fn configure(&mut self, yaml: &str) -> Result<(), JsValue> {
        let config = SceneConfig::from_yaml(yaml).map_err(|e| JsValue::from_str(&e))?;
        self.stage.set_config(config);
        Ok(())
    }

    /// Advance and draw one frame; `now_ms` is the rAF timestamp
    #[wasm_bindgen]
    pub fn frame(&mut self, now_ms: f64) {
        self.stage
            .frame(now_ms, &self.painter, &mut self.screen, &mut self.overlay);
    }

    /// Track the viewport: resizes the canvas and the ground line
    #[wasm_bindgen]
    pub fn resize(&mut self, width: u32, height: u32) {
        self.screen.canvas().set_width(width);
        self.screen.canvas().set_height(height);
        self.stage.resize(width as f32, height as f32);
    }

    /// Press started (mouse down / touch start), in canvas coordinates
    #[wasm_bindgen]
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.stage.press_start(Vec2::new(x, y), js_sys::Date::now());
    }

    /// Pointer moved while down
    #[wasm_bindgen]
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.stage.press_move(Vec2::new(x, y));
    }

    /// Press ended (mouse up / touch end)
    #[wasm_bindgen]
    pub fn pointer_up(&mut self) {
        self.stage.press_end();
    }

    #[wasm_bindgen]
    pub fn ripple_count(&self) -> usize {
        self.stage.ripple_count()
    }

    #[wasm_bindgen]
    pub fn growth_count(&self) -> usize {
        self.stage.growth_count()
    }

    #[wasm_bindgen]
    pub fn character_count(&self) -> usize {
        self.stage.character_count()
    }
}
