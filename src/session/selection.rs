use super::store::SessionStore;

pub const MODEL_KEY: &str = "model";
pub const FORMAT_KEY: &str = "format";
pub const DEFAULT_MODEL: &str = "aka";
pub const DEFAULT_FORMAT: &str = "tga";

/// `<model>.<format>.inp`, taken verbatim.
pub fn asset_name(model: &str, format: &str) -> String {
    format!("{model}.{format}.inp")
}

/// The user's current model and texture format choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub model: String,
    pub format: String,
}

impl Selection {
    /// Reads both keys, writing the defaults back for any that are missing.
    pub fn load(store: &mut impl SessionStore) -> Self {
        Self {
            model: read_or_default(store, MODEL_KEY, DEFAULT_MODEL),
            format: read_or_default(store, FORMAT_KEY, DEFAULT_FORMAT),
        }
    }

    pub fn set_model(&mut self, store: &mut impl SessionStore, model: &str) {
        self.model = model.to_string();
        store.set(MODEL_KEY, model);
    }

    pub fn set_format(&mut self, store: &mut impl SessionStore, format: &str) {
        self.format = format.to_string();
        store.set(FORMAT_KEY, format);
    }

    pub fn asset_name(&self) -> String {
        asset_name(&self.model, &self.format)
    }
}

fn read_or_default(store: &mut impl SessionStore, key: &str, default: &str) -> String {
    match store.get(key) {
        Some(value) if !value.is_empty() => value,
        _ => {
            store.set(key, default);
            default.to_string()
        }
    }
}
