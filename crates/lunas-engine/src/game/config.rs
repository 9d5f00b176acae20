use crate::paint::Color;

/// Identifier of the surface the driver renders into unless configured otherwise.
pub const DEFAULT_SURFACE_ID: &str = "lunasCanvas";

/// Loop driver configuration.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed identifier used to look up the drawable surface.
    pub surface_id: String,

    /// Color the render target is cleared to before draw callbacks run.
    pub clear_color: Color,

    /// Upper bound for the per-frame delta, in seconds. `None` disables clamping.
    pub max_dt: Option<f32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            surface_id: DEFAULT_SURFACE_ID.to_string(),
            clear_color: Color::BLACK,
            max_dt: None,
        }
    }
}

impl GameConfig {
    pub fn surface_id(mut self, id: impl Into<String>) -> Self {
        self.surface_id = id.into();
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn max_dt(mut self, seconds: f32) -> Self {
        self.max_dt = Some(seconds);
        self
    }
}
