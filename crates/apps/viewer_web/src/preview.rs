use foundation::math::LonLat;
use scene::Viewport;
use viewer::Deck;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule, HtmlCanvasElement};

/// Flat 2D preview of the building layer on the overlay canvas.
///
/// Footprints are drawn at ground level in their fill colors. A WebGL host
/// reads `layerData()` instead and ignores this.
pub struct Preview {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Preview {
    pub fn from_canvas_id(id: &str) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("canvas #{id} not found")))?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self { canvas, ctx })
    }

    pub fn resize(&self, viewport: Viewport) {
        self.canvas.set_width(viewport.width.round() as u32);
        self.canvas.set_height(viewport.height.round() as u32);
    }

    pub fn draw(&self, deck: &Deck) {
        let viewport = deck.viewport();
        let view = deck.view_state();
        let layer = deck.buildings();
        self.ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);
        if !layer.props.filled {
            return;
        }

        for b in layer.buildings() {
            let [r, g, bl, a] = layer.fill_rgba(b);
            self.ctx
                .set_fill_style_str(&format!("rgba({r},{g},{bl},{})", f64::from(a) / 255.0));
            for polygon in &b.footprint.polygons {
                self.ctx.begin_path();
                for ring in polygon {
                    for (i, p) in ring.iter().enumerate() {
                        let [x, y] = viewport.project(view, LonLat::new(p[0], p[1]));
                        if i == 0 {
                            self.ctx.move_to(x, y);
                        } else {
                            self.ctx.line_to(x, y);
                        }
                    }
                    self.ctx.close_path();
                }
                self.ctx.fill_with_canvas_winding_rule(CanvasWindingRule::Evenodd);
            }
        }
    }
}
