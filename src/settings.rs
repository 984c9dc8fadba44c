use serde::{Deserialize, Serialize};

pub const CONFY_APP_NAME: &str = "inpvis-rs";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Base URL (`http://` / `https://`) or directory the `.inp` files are fetched from.
    pub asset_source: String,
    pub canvas_id: String,
    /// One button per model identifier.
    pub models: Vec<String>,
    /// One radio input per texture format identifier.
    pub formats: Vec<String>,
    pub discard_stale_loads: bool,
    /// Keep the model/format selection across restarts instead of per run.
    pub persist_selection: bool,
    pub window_width: f64,
    pub window_height: f64,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            asset_source: ".".to_string(),
            canvas_id: "canvas".to_string(),
            models: vec!["aka".to_string(), "midori".to_string()],
            formats: vec![
                "tga".to_string(),
                "png".to_string(),
                "bc7".to_string(),
                "astc".to_string(),
            ],
            discard_stale_loads: true,
            persist_selection: false,
            window_width: 1200.0,
            window_height: 800.0,
        }
    }
}

impl ViewerSettings {
    pub fn load() -> Self {
        match confy::load(CONFY_APP_NAME, "viewer") {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to read viewer settings, using defaults: {e}");
                Self::default()
            }
        }
    }
}
