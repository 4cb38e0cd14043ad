use std::cell::Cell;
use std::rc::Rc;

use js_sys::{Array, Object, Reflect};
use scene::{Basemap, BasemapOptions, CameraOptions};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Map)]
    pub type MapboxMap;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Map")]
    fn new(options: &JsValue) -> MapboxMap;

    #[wasm_bindgen(method, js_name = jumpTo)]
    fn jump_to(this: &MapboxMap, options: &JsValue);

    #[wasm_bindgen(method)]
    fn on(this: &MapboxMap, event: &str, listener: &js_sys::Function);
}

/// The page's mapbox-gl map, driven only through `jumpTo`.
///
/// Readiness comes from the one-time `load` event. `Map#loaded()` also
/// reports false while tiles stream in, which would stall camera sync.
pub struct JsBasemap {
    map: MapboxMap,
    camera: CameraOptions,
    style_loaded: Rc<Cell<bool>>,
}

impl JsBasemap {
    /// Sets the global access token and creates the map in its container.
    pub fn create(options: &BasemapOptions, access_token: &str) -> Result<Self, JsValue> {
        let namespace = Reflect::get(&js_sys::global(), &JsValue::from_str("mapboxgl"))?;
        if namespace.is_undefined() {
            return Err(JsValue::from_str("mapboxgl is not loaded on this page"));
        }
        Reflect::set(
            &namespace,
            &JsValue::from_str("accessToken"),
            &JsValue::from_str(access_token),
        )?;

        let json = serde_json::to_string(options).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let map = MapboxMap::new(&js_sys::JSON::parse(&json)?);
        Ok(Self {
            map,
            camera: options.camera,
            style_loaded: Rc::new(Cell::new(false)),
        })
    }

    pub fn on_load(&self, listener: &js_sys::Function) {
        self.map.on("load", listener);
    }

    /// Shared readiness flag, set by the `load` listener.
    pub fn loaded_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.style_loaded)
    }
}

fn camera_object(camera: &CameraOptions) -> Result<Object, JsValue> {
    let obj = Object::new();
    let center = Array::of2(
        &JsValue::from(camera.longitude()),
        &JsValue::from(camera.latitude()),
    );
    Reflect::set(&obj, &JsValue::from_str("center"), &center)?;
    Reflect::set(&obj, &JsValue::from_str("zoom"), &JsValue::from(camera.zoom))?;
    Reflect::set(&obj, &JsValue::from_str("bearing"), &JsValue::from(camera.bearing))?;
    Reflect::set(&obj, &JsValue::from_str("pitch"), &JsValue::from(camera.pitch))?;
    Ok(obj)
}

impl Basemap for JsBasemap {
    fn is_loaded(&self) -> bool {
        self.style_loaded.get()
    }

    fn jump_to(&mut self, camera: CameraOptions) {
        match camera_object(&camera) {
            Ok(obj) => {
                self.map.jump_to(&obj);
                self.camera = camera;
            }
            Err(err) => {
                web_sys::console::error_2(&JsValue::from_str("basemap jump failed:"), &err);
            }
        }
    }

    fn camera(&self) -> CameraOptions {
        self.camera
    }
}
