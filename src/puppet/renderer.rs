use super::container::Meta;
use super::params::ParamValues;
use super::texture::Texture;
use crate::engine::{ParamMap, Renderer};

/// Holds a set-up puppet: its meta, live parameter values and decoded textures.
/// Each `render` publishes a new frame for the window to paint.
pub struct PuppetRenderer {
    meta: Meta,
    params: ParamValues,
    textures: Vec<Texture>,
    frame: u64,
    cleared: bool,
}

impl PuppetRenderer {
    pub fn new(meta: Meta, params: ParamValues, textures: Vec<Texture>) -> Self {
        Self {
            meta,
            params,
            textures,
            frame: 0,
            cleared: true,
        }
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn params(&self) -> &ParamValues {
        &self.params
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    /// Number of frames rendered so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// True between `clear` and the next `render`.
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }
}

impl Renderer for PuppetRenderer {
    fn animate(&mut self, params: &ParamMap) {
        for (name, value) in params.iter() {
            if !self.params.set(name, value) {
                log::trace!("Puppet has no parameter {name:?}");
            }
        }
    }

    fn clear(&mut self) {
        self.cleared = true;
    }

    fn render(&mut self) {
        self.frame += 1;
        self.cleared = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::pointer_params;
    use crate::puppet::container::Param;

    fn renderer() -> PuppetRenderer {
        let params = ParamValues::new(&[
            Param {
                name: "Eye:: Left:: XY".to_string(),
                defaults: [0.5, 0.5],
            },
            Param {
                name: "Eyebrow:: Right\0".to_string(),
                defaults: [0.0, 0.0],
            },
        ]);
        PuppetRenderer::new(Meta::default(), params, Vec::new())
    }

    #[test]
    fn animate_applies_known_parameters() {
        let mut renderer = renderer();
        renderer.animate(&pointer_params(0.0, 0.0, 100.0, 100.0).unwrap());

        assert_eq!(renderer.params().get("Eye:: Left:: XY"), Some([0.0, 1.0]));
        assert_eq!(renderer.params().get("Eyebrow:: Right\0"), Some([0.0, 0.0]));
        assert_eq!(renderer.params().len(), 2);
    }

    #[test]
    fn clear_then_render_advances_frame() {
        let mut renderer = renderer();
        assert_eq!(renderer.frame(), 0);

        renderer.clear();
        assert!(renderer.is_cleared());
        renderer.render();

        assert_eq!(renderer.frame(), 1);
        assert!(!renderer.is_cleared());
    }
}
