//! Browser shell: a JS-owned [`Viewer`] wiring the overlay to mapbox-gl.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use console_error_panic_hook::set_once;
use foundation::time::Time;
use gloo_net::http::Request;
use scene::{Interaction, PointerButton, ViewState};
use viewer::{AppContext, ViewerConfig, ViewerError};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

mod basemap;
mod preview;

use basemap::JsBasemap;
use preview::Preview;

/// Token baked in at build time; `new Viewer(token)` overrides it.
const BUILD_ACCESS_TOKEN: Option<&str> = option_env!("MapboxAccessToken");

struct Session {
    app: AppContext<JsBasemap>,
    preview: Option<Preview>,
}

impl Session {
    fn redraw(&self) {
        if let Some(preview) = &self.preview {
            preview.draw(self.app.deck());
        }
    }
}

fn report(err: impl std::fmt::Display) -> JsValue {
    let msg = err.to_string();
    web_sys::console::error_1(&JsValue::from_str(&msg));
    JsValue::from_str(&msg)
}

fn now() -> Time {
    Time(js_sys::Date::now() / 1_000.0)
}

async fn fetch_text(url: &str) -> Result<String, ViewerError> {
    let fetch_error = |reason: String| ViewerError::DatasetFetch {
        url: url.to_string(),
        reason,
    };
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;
    if !resp.ok() {
        return Err(fetch_error(format!("HTTP {}", resp.status())));
    }
    resp.text().await.map_err(|e| fetch_error(e.to_string()))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

#[wasm_bindgen]
pub struct Viewer {
    session: Rc<RefCell<Session>>,
    _on_load: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl Viewer {
    /// Creates the basemap and the overlay. Fails when no usable access
    /// token is available.
    #[wasm_bindgen(constructor)]
    pub fn new(access_token: Option<String>) -> Result<Viewer, JsValue> {
        let raw = access_token
            .as_deref()
            .or(BUILD_ACCESS_TOKEN)
            .ok_or_else(|| report(ViewerError::MissingAccessToken))?;
        let config = ViewerConfig::default()
            .with_access_token(raw)
            .map_err(report)?;
        let token = config.access_token().map_err(report)?.as_str().to_string();

        let basemap = JsBasemap::create(&config.basemap_options(), &token)?;
        let preview = match Preview::from_canvas_id(&config.overlay_canvas) {
            Ok(p) => Some(p),
            Err(err) => {
                web_sys::console::warn_2(&JsValue::from_str("overlay preview disabled:"), &err);
                None
            }
        };
        let app = AppContext::new(config, basemap).map_err(report)?;
        let session = Rc::new(RefCell::new(Session { app, preview }));

        let weak: Weak<RefCell<Session>> = Rc::downgrade(&session);
        let loaded = session.borrow().app.basemap().loaded_flag();
        let on_load = Closure::<dyn FnMut()>::new(move || {
            loaded.set(true);
            let Some(session) = weak.upgrade() else {
                return;
            };
            match session.try_borrow_mut() {
                Ok(mut s) => {
                    s.app.basemap_loaded();
                }
                Err(_) => web_sys::console::warn_1(&JsValue::from_str(
                    "basemap loaded while the viewer was busy; held camera pose follows the next input",
                )),
            }
        });
        session.borrow().app.basemap().on_load(on_load.as_ref().unchecked_ref());

        Ok(Viewer {
            session,
            _on_load: on_load,
        })
    }

    /// Fetches the configured dataset and resolves with a load summary (JSON).
    #[wasm_bindgen(js_name = loadData)]
    pub fn load_data(&self) -> js_sys::Promise {
        let session = Rc::clone(&self.session);
        future_to_promise(async move {
            let url = session.borrow().app.config().data_url.clone();
            let text = fetch_text(&url).await.map_err(report)?;
            let mut s = session.borrow_mut();
            let summary = s.app.load_geojson_str(&text).map_err(report)?;
            let json = serde_json::to_string(summary).map_err(report)?;
            s.redraw();
            Ok(JsValue::from_str(&json))
        })
    }

    #[wasm_bindgen(js_name = loadGeojson)]
    pub fn load_geojson(&self, payload: &str) -> Result<String, JsValue> {
        let mut s = self.session.borrow_mut();
        let summary = s.app.load_geojson_str(payload).map_err(report)?;
        let json = serde_json::to_string(summary).map_err(report)?;
        s.redraw();
        Ok(json)
    }

    fn dispatch(&self, input: Interaction) -> bool {
        let mut s = self.session.borrow_mut();
        let changed = s.app.dispatch_at(now(), input).is_some();
        if changed {
            s.redraw();
        }
        changed
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&self, x: f64, y: f64, button: i32) -> bool {
        self.dispatch(Interaction::PointerDown {
            x,
            y,
            button: PointerButton::from_dom(button),
        })
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f64, y: f64) -> bool {
        self.dispatch(Interaction::PointerMove { x, y })
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self) {
        self.dispatch(Interaction::PointerUp);
    }

    /// Returns true when the wheel moved the camera (the page should then
    /// suppress scrolling).
    pub fn wheel(&self, x: f64, y: f64, delta_y: f64) -> bool {
        self.dispatch(Interaction::Wheel { x, y, delta_y })
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.dispatch(Interaction::Resize { width, height });
        let s = self.session.borrow();
        if let Some(preview) = &s.preview {
            preview.resize(s.app.deck().viewport());
        }
        s.redraw();
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&self) {
        let mut s = self.session.borrow_mut();
        s.app.reset_view();
        s.redraw();
    }

    #[wasm_bindgen(js_name = viewState)]
    pub fn view_state(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.borrow().app.view_state()).map_err(report)
    }

    #[wasm_bindgen(js_name = setViewState)]
    pub fn set_view_state(&self, json: &str) -> Result<(), JsValue> {
        let view_state: ViewState = serde_json::from_str(json).map_err(report)?;
        let mut s = self.session.borrow_mut();
        s.app.set_view_state(view_state).map_err(report)?;
        s.redraw();
        Ok(())
    }

    #[wasm_bindgen(js_name = layerData)]
    pub fn layer_data(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.borrow().app.layer_data()).map_err(report)
    }

    /// Building under the cursor as JSON, or `undefined`.
    pub fn pick(&self, x: f64, y: f64) -> Result<Option<String>, JsValue> {
        match self.session.borrow().app.pick(x, y) {
            Some(info) => serde_json::to_string(&info).map(Some).map_err(report),
            None => Ok(None),
        }
    }

    #[wasm_bindgen(js_name = configJson)]
    pub fn config_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.borrow().app.config()).map_err(report)
    }
}
