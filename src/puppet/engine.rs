use std::collections::HashMap;
use std::sync::Arc;

use winit::window::Window;

use super::container::{self, PuppetFile};
use super::params::ParamValues;
use super::renderer::PuppetRenderer;
use super::texture::{self, Texture};
use crate::engine::{Engine, Renderer};
use crate::error::{InpError, Result};
use crate::gpu::GpuContext;

/// Native engine: puppets from `.inp` containers, contexts on registered windows.
#[derive(Default)]
pub struct PuppetEngine {
    instance: Option<wgpu::Instance>,
    surfaces: HashMap<String, Arc<Window>>,
}

impl PuppetEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `window` reachable from `setup_context(canvas_id)`.
    pub fn with_surface(mut self, canvas_id: &str, window: Arc<Window>) -> Self {
        self.surfaces.insert(canvas_id.to_string(), window);
        self
    }
}

impl Engine for PuppetEngine {
    type Context = GpuContext;
    type Model = PuppetFile;
    type Textures = Vec<Texture>;
    type Renderer = PuppetRenderer;

    async fn init(&mut self) -> Result<()> {
        self.instance = Some(wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        }));
        Ok(())
    }

    fn setup_context(&mut self, canvas_id: &str) -> Result<Self::Context> {
        let instance = self.instance.as_ref().ok_or(InpError::NotInitialized)?;
        let window = self
            .surfaces
            .get(canvas_id)
            .cloned()
            .ok_or_else(|| InpError::Context(format!("Canvas '{canvas_id}' not found!")))?;
        pollster::block_on(GpuContext::new(instance, window))
    }

    fn has_astc(context: &Self::Context) -> bool {
        context
            .features()
            .contains(wgpu::Features::TEXTURE_COMPRESSION_ASTC)
    }

    fn has_bptc(context: &Self::Context) -> bool {
        context
            .features()
            .contains(wgpu::Features::TEXTURE_COMPRESSION_BC)
    }

    fn parse(&mut self, bytes: &[u8]) -> Result<Self::Model> {
        let file = container::parse(bytes)?;
        log::info!(
            "Parsed puppet {:?}: {} parameters, {} textures",
            file.puppet.meta.name.as_deref().unwrap_or("<unnamed>"),
            file.puppet.param.len(),
            file.textures.len()
        );
        Ok(file)
    }

    fn decode_textures(&mut self, model: &mut Self::Model) -> Result<Self::Textures> {
        let encoded = std::mem::take(&mut model.textures);
        texture::decode_all(&encoded)
    }

    fn setup(
        &mut self,
        context: &Self::Context,
        model: Self::Model,
        textures: Self::Textures,
    ) -> Result<Self::Renderer> {
        check_texture_fit(&textures, context.max_texture_dimension())?;

        let params = ParamValues::new(&model.puppet.param);
        let mut renderer = PuppetRenderer::new(model.puppet.meta, params, textures);
        renderer.clear();
        renderer.render();
        Ok(renderer)
    }
}

fn check_texture_fit(textures: &[Texture], max_dimension: u32) -> Result<()> {
    for (index, texture) in textures.iter().enumerate() {
        if let Texture::Rgba { width, height, .. } = texture {
            if *width > max_dimension || *height > max_dimension {
                return Err(InpError::Context(format!(
                    "texture {index} is {width}x{height}, GPU limit is {max_dimension}"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puppet::container::{encode, EncodedTexture, TextureFormat, SAMPLE_PUPPET};
    use crate::puppet::texture::encode_rgba;
    use image::ImageFormat;

    #[test]
    fn parse_then_decode_drains_encoded_textures() {
        let mut engine = PuppetEngine::new();
        let bytes = encode(
            SAMPLE_PUPPET,
            &[
                EncodedTexture {
                    format: TextureFormat::Tga,
                    data: encode_rgba(4, 4, ImageFormat::Tga),
                },
                EncodedTexture {
                    format: TextureFormat::Bc7,
                    data: vec![0; 32],
                },
            ],
        );

        let mut model = engine.parse(&bytes).unwrap();
        let textures = engine.decode_textures(&mut model).unwrap();

        assert!(model.textures.is_empty());
        assert_eq!(textures.len(), 2);
        assert_eq!(textures[0].describe(), "RGBA 4x4");
    }

    #[test]
    fn setup_context_needs_init() {
        let mut engine = PuppetEngine::new();
        assert!(matches!(
            engine.setup_context("canvas"),
            Err(InpError::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn unknown_canvas_is_reported() {
        let mut engine = PuppetEngine::new();
        engine.init().await.unwrap();
        assert!(matches!(
            engine.setup_context("canvas"),
            Err(InpError::Context(_))
        ));
    }

    #[test]
    fn oversized_textures_are_rejected() {
        let textures = [
            Texture::Rgba {
                width: 16,
                height: 16,
                data: vec![0; 16 * 16 * 4],
            },
            Texture::Rgba {
                width: 4096,
                height: 16,
                data: Vec::new(),
            },
        ];
        assert!(check_texture_fit(&textures[..1], 2048).is_ok());
        assert!(matches!(
            check_texture_fit(&textures, 2048),
            Err(InpError::Context(_))
        ));
    }
}
