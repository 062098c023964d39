use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 3.0;
const ZOOM_IN_FACTOR: f64 = 1.1;
const ZOOM_OUT_FACTOR: f64 = 0.9;

/// The two freeform canvases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpatialView {
    /// Every note
    Map,
    /// Goal notes only
    Vision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Visual transform for a whole spatial scene: translate, then scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Transform {
    pub fn model_to_screen(&self, mx: f64, my: f64) -> (f64, f64) {
        (
            mx * self.scale + self.translate_x,
            my * self.scale + self.translate_y,
        )
    }
}

fn default_scale() -> f64 {
    1.0
}

/// Pan/zoom state of one spatial view. `x`/`y` are screen pixels, `s` is
/// the scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_scale")]
    pub s: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            x: 0.0,
            y: 0.0,
            s: 1.0,
        }
    }
}

impl Viewport {
    /// Move by screen-space deltas; panning ignores the zoom level.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    pub fn zoom(&mut self, direction: ZoomDirection) {
        let factor = match direction {
            ZoomDirection::In => ZOOM_IN_FACTOR,
            ZoomDirection::Out => ZOOM_OUT_FACTOR,
        };
        self.s = (self.s * factor).clamp(MIN_SCALE, MAX_SCALE);
    }

    pub fn screen_to_model(&self, px: f64, py: f64) -> (f64, f64) {
        ((px - self.x) / self.s, (py - self.y) / self.s)
    }

    pub fn model_to_screen(&self, mx: f64, my: f64) -> (f64, f64) {
        self.apply().model_to_screen(mx, my)
    }

    pub fn apply(&self) -> Transform {
        Transform {
            translate_x: self.x,
            translate_y: self.y,
            scale: self.s,
        }
    }

    /// Repair a viewport read from disk: non-finite values reset, scale clamped.
    pub fn sanitized(self) -> Viewport {
        let finite_or = |v: f64, d: f64| if v.is_finite() { v } else { d };
        Viewport {
            x: finite_or(self.x, 0.0),
            y: finite_or(self.y, 0.0),
            s: finite_or(self.s, 1.0).clamp(MIN_SCALE, MAX_SCALE),
        }
    }
}

/// Viewports for both spatial views, maintained independently
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewports {
    pub map: Viewport,
    pub vision: Viewport,
}

impl Viewports {
    pub fn get(&self, view: SpatialView) -> &Viewport {
        match view {
            SpatialView::Map => &self.map,
            SpatialView::Vision => &self.vision,
        }
    }

    pub fn get_mut(&mut self, view: SpatialView) -> &mut Viewport {
        match view {
            SpatialView::Map => &mut self.map,
            SpatialView::Vision => &mut self.vision,
        }
    }
}
