use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgba};

use crate::puppet::texture::Texture;
use crate::puppet::PuppetRenderer;

/// Longest preview side. Puppet atlases are often larger than egui's texture limit.
const PREVIEW_SIDE: u32 = 512;

pub struct PreviewEntry {
    pub label: String,
    /// `None` for textures egui cannot show (still compressed).
    pub handle: Option<egui::TextureHandle>,
}

/// egui copies of the live puppet's textures, rebuilt whenever a different load is shown.
#[derive(Default)]
pub struct TexturePreviews {
    token: Option<u64>,
    entries: Vec<PreviewEntry>,
}

impl TexturePreviews {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync(
        &mut self,
        ctx: &egui::Context,
        token: Option<u64>,
        renderer: Option<&PuppetRenderer>,
    ) {
        if token == self.token {
            return;
        }
        self.token = token;
        self.entries = renderer
            .map(|renderer| {
                renderer
                    .textures()
                    .iter()
                    .enumerate()
                    .map(|(index, texture)| upload(ctx, index, texture))
                    .collect()
            })
            .unwrap_or_default();
    }

    pub fn entries(&self) -> &[PreviewEntry] {
        &self.entries
    }
}

fn upload(ctx: &egui::Context, index: usize, texture: &Texture) -> PreviewEntry {
    let handle = match texture {
        Texture::Rgba {
            width,
            height,
            data,
        } => preview_image(*width, *height, data).map(|image| {
            ctx.load_texture(
                format!("puppet-texture-{index}"),
                image,
                egui::TextureOptions::LINEAR,
            )
        }),
        Texture::Bc7 { .. } => None,
    };
    PreviewEntry {
        label: format!("#{index} {}", texture.describe()),
        handle,
    }
}

fn preview_image(width: u32, height: u32, data: &[u8]) -> Option<egui::ColorImage> {
    let longest = width.max(height);
    if longest == 0 {
        return None;
    }
    if longest <= PREVIEW_SIDE {
        let size = [width as usize, height as usize];
        return (data.len() == size[0] * size[1] * 4)
            .then(|| egui::ColorImage::from_rgba_unmultiplied(size, data));
    }

    let source = ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(width, height, data)?;
    let scaled_width = scale_side(width, longest);
    let scaled_height = scale_side(height, longest);
    let scaled = imageops::resize(&source, scaled_width, scaled_height, FilterType::Triangle);
    Some(egui::ColorImage::from_rgba_unmultiplied(
        [scaled_width as usize, scaled_height as usize],
        scaled.as_raw(),
    ))
}

fn scale_side(side: u32, longest: u32) -> u32 {
    ((u64::from(side) * u64::from(PREVIEW_SIDE) / u64::from(longest)) as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puppet::container::Meta;
    use crate::puppet::params::ParamValues;

    fn renderer() -> PuppetRenderer {
        PuppetRenderer::new(
            Meta::default(),
            ParamValues::default(),
            vec![
                Texture::Rgba {
                    width: 2,
                    height: 2,
                    data: vec![255; 16],
                },
                Texture::Bc7 { data: vec![0; 16] },
            ],
        )
    }

    #[test]
    fn rebuilds_only_when_the_load_changes() {
        let ctx = egui::Context::default();
        let renderer = renderer();
        let mut previews = TexturePreviews::new();

        previews.sync(&ctx, Some(1), Some(&renderer));
        assert_eq!(previews.entries().len(), 2);
        assert_eq!(previews.entries()[0].label, "#0 RGBA 2x2");
        assert!(previews.entries()[0].handle.is_some());
        assert!(previews.entries()[1].handle.is_none());
        let first_id = previews.entries()[0].handle.as_ref().map(|h| h.id());

        previews.sync(&ctx, Some(1), Some(&renderer));
        assert_eq!(
            previews.entries()[0].handle.as_ref().map(|h| h.id()),
            first_id
        );

        previews.sync(&ctx, None, None);
        assert!(previews.entries().is_empty());
    }

    #[test]
    fn large_atlases_are_scaled_down() {
        let ctx = egui::Context::default();
        let renderer = PuppetRenderer::new(
            Meta::default(),
            ParamValues::default(),
            vec![Texture::Rgba {
                width: 4096,
                height: 16,
                data: vec![200; 4096 * 16 * 4],
            }],
        );
        let mut previews = TexturePreviews::new();

        previews.sync(&ctx, Some(1), Some(&renderer));

        let entry = &previews.entries()[0];
        assert_eq!(entry.label, "#0 RGBA 4096x16");
        let handle = entry.handle.as_ref().unwrap();
        assert_eq!(handle.size(), [512, 2]);
    }

    #[test]
    fn mismatched_pixel_data_gets_no_preview() {
        assert!(preview_image(4, 4, &[0; 8]).is_none());
        assert!(preview_image(4096, 4096, &[0; 8]).is_none());
        assert!(preview_image(0, 0, &[]).is_none());
    }
}
