use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use super::container::{EncodedTexture, PuppetFile, TextureFormat};
use crate::error::{InpError, Result};

#[derive(Debug, Clone)]
pub enum Texture {
    Rgba {
        width: u32,
        height: u32,
        data: Vec<u8>,
    },
    /// Left compressed; only usable where the context reports BPTC support.
    Bc7 { data: Vec<u8> },
}

impl Texture {
    pub fn describe(&self) -> String {
        match self {
            Texture::Rgba { width, height, .. } => format!("RGBA {width}x{height}"),
            Texture::Bc7 { data } => format!("BC7, {} KiB", data.len().div_ceil(1024)),
        }
    }
}

pub fn decode(texture: &EncodedTexture) -> Result<Texture> {
    let format = match texture.format {
        TextureFormat::Png => ImageFormat::Png,
        TextureFormat::Tga => ImageFormat::Tga,
        TextureFormat::Bc7 => {
            return Ok(Texture::Bc7 {
                data: texture.data.clone(),
            });
        }
    };
    let rgba = image::load_from_memory_with_format(&texture.data, format)?.into_rgba8();
    Ok(Texture::Rgba {
        width: rgba.width(),
        height: rgba.height(),
        data: rgba.into_raw(),
    })
}

/// Decodes on scoped worker threads, keeping the input order.
pub fn decode_all(textures: &[EncodedTexture]) -> Result<Vec<Texture>> {
    if textures.is_empty() {
        return Ok(Vec::new());
    }
    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(textures.len());
    let chunk_size = textures.len().div_ceil(workers);

    std::thread::scope(|scope| {
        let handles: Vec<_> = textures
            .chunks(chunk_size)
            .map(|chunk| scope.spawn(move || chunk.iter().map(decode).collect::<Result<Vec<_>>>()))
            .collect();

        let mut decoded = Vec::with_capacity(textures.len());
        for handle in handles {
            let chunk = handle
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;
            decoded.extend(chunk);
        }
        Ok(decoded)
    })
}

/// Stores a decoded texture as PNG or TGA. BC7 data has no pixel form here and is
/// passed through as it is.
pub fn encode(texture: &Texture, format: TextureFormat) -> Result<EncodedTexture> {
    let image_format = match format {
        TextureFormat::Png => ImageFormat::Png,
        TextureFormat::Tga => ImageFormat::Tga,
        TextureFormat::Bc7 => return Err(InpError::UnsupportedTexture(format.to_u8())),
    };
    match texture {
        Texture::Rgba {
            width,
            height,
            data,
        } => {
            let image = RgbaImage::from_raw(*width, *height, data.clone()).ok_or_else(|| {
                InpError::InvalidContainer(format!("texture data does not fill {width}x{height}"))
            })?;
            let mut out = Cursor::new(Vec::new());
            image.write_to(&mut out, image_format)?;
            Ok(EncodedTexture {
                format,
                data: out.into_inner(),
            })
        }
        Texture::Bc7 { data } => {
            log::warn!("Keeping BC7 texture as is, it cannot be transcoded to {format:?}");
            Ok(EncodedTexture {
                format: TextureFormat::Bc7,
                data: data.clone(),
            })
        }
    }
}

/// Decodes every texture of `file` and stores it again as `format`.
pub fn transcode(file: &mut PuppetFile, format: TextureFormat) -> Result<()> {
    let decoded = decode_all(&file.textures)?;
    file.textures = decoded
        .iter()
        .map(|texture| encode(texture, format))
        .collect::<Result<_>>()?;
    Ok(())
}

#[cfg(test)]
pub fn encode_rgba(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let image = image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([x as u8 * 40, y as u8 * 40, 200, 255])
    });
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, format).unwrap();
    out.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puppet::container::{self, SAMPLE_PUPPET};

    #[test]
    fn tga_and_png_decode_to_rgba() {
        for (format, image_format) in [
            (TextureFormat::Tga, ImageFormat::Tga),
            (TextureFormat::Png, ImageFormat::Png),
        ] {
            let texture = EncodedTexture {
                format,
                data: encode_rgba(3, 2, image_format),
            };
            match decode(&texture).unwrap() {
                Texture::Rgba {
                    width,
                    height,
                    data,
                } => {
                    assert_eq!((width, height), (3, 2));
                    assert_eq!(data.len(), 3 * 2 * 4);
                    // pixel (1, 1)
                    assert_eq!(&data[16..20], &[40, 40, 200, 255]);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn bc7_stays_compressed() {
        let texture = EncodedTexture {
            format: TextureFormat::Bc7,
            data: vec![7; 2048],
        };
        let decoded = decode(&texture).unwrap();
        assert!(matches!(&decoded, Texture::Bc7 { data } if data.len() == 2048));
        assert_eq!(decoded.describe(), "BC7, 2 KiB");
    }

    #[test]
    fn decode_all_keeps_order() {
        let textures: Vec<_> = (1..=5)
            .map(|w| EncodedTexture {
                format: TextureFormat::Tga,
                data: encode_rgba(w, 1, ImageFormat::Tga),
            })
            .collect();

        let widths: Vec<_> = decode_all(&textures)
            .unwrap()
            .into_iter()
            .map(|t| match t {
                Texture::Rgba { width, .. } => width,
                Texture::Bc7 { .. } => 0,
            })
            .collect();
        assert_eq!(widths, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn garbage_fails_to_decode() {
        let textures = [EncodedTexture {
            format: TextureFormat::Png,
            data: b"definitely not a png".to_vec(),
        }];
        assert!(matches!(decode_all(&textures), Err(InpError::Image(_))));
    }

    #[test]
    fn transcoded_file_parses_back_with_same_pixels() {
        let bytes = container::encode(
            SAMPLE_PUPPET,
            &[
                EncodedTexture {
                    format: TextureFormat::Tga,
                    data: encode_rgba(3, 2, ImageFormat::Tga),
                },
                EncodedTexture {
                    format: TextureFormat::Bc7,
                    data: vec![5; 16],
                },
            ],
        );
        let mut file = container::parse(&bytes).unwrap();
        let before = decode_all(&file.textures).unwrap();

        transcode(&mut file, TextureFormat::Png).unwrap();
        let mut written = Vec::new();
        file.write(&mut written).unwrap();
        let reread = container::parse(&written).unwrap();

        assert_eq!(reread.puppet.param.len(), 3);
        assert_eq!(reread.textures[0].format, TextureFormat::Png);
        assert_eq!(reread.textures[1].format, TextureFormat::Bc7);
        let after = decode_all(&reread.textures).unwrap();
        match (&before[0], &after[0]) {
            (Texture::Rgba { data: old, .. }, Texture::Rgba { data: new, .. }) => {
                assert_eq!(old, new)
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(&after[1], Texture::Bc7 { data } if data == &vec![5; 16]));
    }

    #[test]
    fn encode_rejects_short_pixel_data() {
        let texture = Texture::Rgba {
            width: 4,
            height: 4,
            data: vec![0; 8],
        };
        assert!(matches!(
            encode(&texture, TextureFormat::Tga),
            Err(InpError::InvalidContainer(_))
        ));
        assert!(matches!(
            encode(&texture, TextureFormat::Bc7),
            Err(InpError::UnsupportedTexture(2))
        ));
    }
}
