//! Map controller for the interactive overlay.
//!
//! Turns pointer and wheel input into new [`ViewState`]s:
//!   Left drag   = pan, content follows the cursor
//!   Right drag  = rotate (horizontal) and pitch (vertical)
//!   Wheel       = zoom anchored at the cursor position
//!
//! Projection is flat Web Mercator with bearing applied; pitch only affects
//! the rendered perspective, not where the controller anchors the cursor.

use foundation::math::{LonLat, lon_lat_to_world, world_to_lon_lat, zoom_to_scale};
use serde::{Deserialize, Serialize};

use crate::view_state::ViewState;

/// Screen size of the overlay surface in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Screen position (px, y down) of `p` under `view`.
    pub fn project(&self, view: &ViewState, p: LonLat) -> [f64; 2] {
        let scale = zoom_to_scale(view.zoom);
        let c = lon_lat_to_world(view.center());
        let w = lon_lat_to_world(p);
        let d = [(w[0] - c[0]) * scale, (w[1] - c[1]) * scale];
        let s = rotate(d, -view.bearing.to_radians());
        [s[0] + self.width * 0.5, s[1] + self.height * 0.5]
    }

    /// Position under screen pixel `xy` for `view`.
    pub fn unproject(&self, view: &ViewState, xy: [f64; 2]) -> LonLat {
        let scale = zoom_to_scale(view.zoom);
        let c = lon_lat_to_world(view.center());
        let s = [xy[0] - self.width * 0.5, xy[1] - self.height * 0.5];
        let d = rotate(s, view.bearing.to_radians());
        world_to_lon_lat([c[0] + d[0] / scale, c[1] + d[1] / scale])
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

fn rotate(v: [f64; 2], angle_rad: f64) -> [f64; 2] {
    let (sin, cos) = angle_rad.sin_cos();
    [v[0] * cos - v[1] * sin, v[0] * sin + v[1] * cos]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    Primary,
    Secondary,
}

impl PointerButton {
    /// Maps a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i32) -> Self {
        match button {
            2 => PointerButton::Secondary,
            _ => PointerButton::Primary,
        }
    }
}

/// Raw user input delivered to the overlay.
///
/// Serialized as `{"type": "wheel", "x": .., "y": .., "deltaY": ..}` so
/// recorded sessions can be replayed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Interaction {
    PointerDown { x: f64, y: f64, button: PointerButton },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    Wheel { x: f64, y: f64, delta_y: f64 },
    Resize { width: f64, height: f64 },
}

/// Interaction tuning. All fields have defaults matching a stock map controller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ControllerOptions {
    pub drag_pan: bool,
    pub drag_rotate: bool,
    pub scroll_zoom: bool,
    /// Zoom levels per wheel delta unit.
    pub wheel_zoom_speed: f64,
    /// Upper bound on zoom change from a single wheel event.
    pub max_wheel_zoom_step: f64,
    /// Bearing degrees per horizontal pixel of rotate drag.
    pub rotate_speed: f64,
    /// Pitch degrees per vertical pixel of rotate drag.
    pub pitch_speed: f64,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            drag_pan: true,
            drag_rotate: true,
            scroll_zoom: true,
            wheel_zoom_speed: 0.01,
            max_wheel_zoom_step: 1.0,
            rotate_speed: 0.5,
            pitch_speed: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    button: PointerButton,
    last_px: [f64; 2],
}

#[derive(Debug, Clone, Default)]
pub struct MapController {
    pub options: ControllerOptions,
    viewport: Viewport,
    drag: Option<DragState>,
}

impl MapController {
    pub fn new(options: ControllerOptions, viewport: Viewport) -> Self {
        Self {
            options,
            viewport,
            drag: None,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Applies one input. Returns the new view state when the camera moved.
    pub fn handle(&mut self, view: &ViewState, input: Interaction) -> Option<ViewState> {
        match input {
            Interaction::PointerDown { x, y, button } => {
                self.drag = Some(DragState {
                    button,
                    last_px: [x, y],
                });
                None
            }
            Interaction::PointerMove { x, y } => {
                if !(x.is_finite() && y.is_finite()) {
                    return None;
                }
                let drag = self.drag?;
                self.drag = Some(DragState {
                    last_px: [x, y],
                    ..drag
                });
                let dx = x - drag.last_px[0];
                let dy = y - drag.last_px[1];
                match drag.button {
                    PointerButton::Primary if self.options.drag_pan => {
                        Some(self.pan(view, drag.last_px, [x, y]))
                    }
                    PointerButton::Secondary if self.options.drag_rotate => {
                        Some(self.rotate(view, dx, dy))
                    }
                    _ => None,
                }
            }
            Interaction::PointerUp => {
                self.drag = None;
                None
            }
            Interaction::Wheel { x, y, delta_y } => {
                if !self.options.scroll_zoom || !delta_y.is_finite() || delta_y == 0.0 {
                    return None;
                }
                let step = (-delta_y * self.options.wheel_zoom_speed).clamp(
                    -self.options.max_wheel_zoom_step,
                    self.options.max_wheel_zoom_step,
                );
                Some(self.zoom_at(view, [x, y], view.zoom + step))
            }
            Interaction::Resize { width, height } => {
                self.viewport = Viewport::new(width, height);
                None
            }
        }
    }

    /// Moves the camera so the point under `from` ends up under `to`.
    pub fn pan(&self, view: &ViewState, from: [f64; 2], to: [f64; 2]) -> ViewState {
        let anchor = self.viewport.unproject(view, from);
        self.recenter(view, anchor, to, view.zoom)
    }

    /// Changes zoom while keeping the point under `at` fixed on screen.
    pub fn zoom_at(&self, view: &ViewState, at: [f64; 2], zoom: f64) -> ViewState {
        let anchor = self.viewport.unproject(view, at);
        let zoom = zoom.clamp(view.min_zoom, view.max_zoom);
        self.recenter(view, anchor, at, zoom)
    }

    pub fn rotate(&self, view: &ViewState, dx_px: f64, dy_px: f64) -> ViewState {
        ViewState {
            bearing: view.bearing + dx_px * self.options.rotate_speed,
            // Dragging up tilts the camera towards the horizon.
            pitch: view.pitch - dy_px * self.options.pitch_speed,
            ..*view
        }
        .constrained()
    }

    fn recenter(&self, view: &ViewState, anchor: LonLat, at: [f64; 2], zoom: f64) -> ViewState {
        let scale = zoom_to_scale(zoom);
        let a = lon_lat_to_world(anchor);
        let s = [at[0] - self.viewport.width * 0.5, at[1] - self.viewport.height * 0.5];
        let d = rotate(s, view.bearing.to_radians());
        let center = world_to_lon_lat([a[0] - d[0] / scale, a[1] - d[1] / scale]);
        ViewState {
            longitude: center.lon_deg,
            latitude: center.lat_deg,
            zoom,
            ..*view
        }
        .constrained()
    }
}
