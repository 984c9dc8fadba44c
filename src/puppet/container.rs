use std::io::{Cursor, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::Deserialize;

use crate::error::{InpError, Result};

const MAGIC: &[u8; 8] = b"TRNSRTS\0";
const TEX_SECT: &[u8; 8] = b"TEX_SECT";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub name: Option<String>,
    #[serde(default)]
    pub version: String,
    pub rigger: Option<String>,
    pub artist: Option<String>,
    pub rights: Option<String>,
    pub copyright: Option<String>,
    #[serde(rename = "licenseURL")]
    pub license_url: Option<String>,
    pub contact: Option<String>,
    pub reference: Option<String>,
}

impl Meta {
    /// Label/value pairs for the fields that are set, version always included.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = Vec::new();
        if let Some(name) = &self.name {
            fields.push(("Model", name.as_str()));
        }
        fields.push(("Version", self.version.as_str()));
        let optional = [
            ("Rigger", &self.rigger),
            ("Artist", &self.artist),
            ("Rights", &self.rights),
            ("Copyright", &self.copyright),
            ("License", &self.license_url),
            ("Contact", &self.contact),
            ("Reference", &self.reference),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                fields.push((label, value.as_str()));
            }
        }
        fields
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(default)]
    pub defaults: [f32; 2],
}

/// The part of the puppet JSON the viewer reads; nodes, physics and bindings are skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct Puppet {
    pub meta: Meta,
    #[serde(default)]
    pub param: Vec<Param>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    Png,
    Tga,
    Bc7,
}

impl TextureFormat {
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Png),
            1 => Ok(Self::Tga),
            2 => Ok(Self::Bc7),
            other => Err(InpError::UnsupportedTexture(other)),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Self::Png => 0,
            Self::Tga => 1,
            Self::Bc7 => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EncodedTexture {
    pub format: TextureFormat,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct PuppetFile {
    /// Puppet JSON as stored; written back untouched.
    pub json: Vec<u8>,
    pub puppet: Puppet,
    pub textures: Vec<EncodedTexture>,
}

impl PuppetFile {
    /// Writes the container in the layout [`parse`] reads.
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        write_container(writer, &self.json, &self.textures)
    }
}

/// Reads an `.inp` container: magic, length-prefixed puppet JSON, then the texture
/// section. All integers are big endian.
pub fn parse(bytes: &[u8]) -> Result<PuppetFile> {
    let mut reader = Cursor::new(bytes);

    expect_magic(&mut reader, MAGIC, "puppet")?;
    let json_len = reader.read_u32::<BigEndian>()?;
    let json = read_block(&mut reader, json_len, "puppet json")?;
    let puppet: Puppet = serde_json::from_slice(&json)?;

    expect_magic(&mut reader, TEX_SECT, "texture section")?;
    let count = reader.read_u32::<BigEndian>()?;

    let mut textures = Vec::new();
    for index in 0..count {
        let len = reader.read_u32::<BigEndian>()?;
        let format = TextureFormat::from_u8(reader.read_u8()?)?;
        let data = read_block(&mut reader, len, "texture")?;
        log::trace!("Texture {index}: {format:?}, {len} bytes");
        textures.push(EncodedTexture { format, data });
    }

    Ok(PuppetFile {
        json,
        puppet,
        textures,
    })
}

fn expect_magic(reader: &mut Cursor<&[u8]>, magic: &[u8; 8], what: &str) -> Result<()> {
    let mut found = [0u8; 8];
    reader.read_exact(&mut found)?;
    if &found != magic {
        return Err(InpError::InvalidContainer(format!("bad {what} magic")));
    }
    Ok(())
}

fn read_block(reader: &mut Cursor<&[u8]>, len: u32, what: &str) -> Result<Vec<u8>> {
    let remaining = reader.get_ref().len() as u64 - reader.position();
    if u64::from(len) > remaining {
        return Err(InpError::InvalidContainer(format!(
            "{what} claims {len} bytes, {remaining} left"
        )));
    }
    let mut data = vec![0u8; len as usize];
    reader.read_exact(&mut data)?;
    Ok(data)
}

fn write_container<W: Write>(
    mut writer: W,
    json: &[u8],
    textures: &[EncodedTexture],
) -> Result<()> {
    writer.write_all(MAGIC)?;
    writer.write_u32::<BigEndian>(block_len(json.len(), "puppet json")?)?;
    writer.write_all(json)?;

    writer.write_all(TEX_SECT)?;
    writer.write_u32::<BigEndian>(block_len(textures.len(), "texture count")?)?;
    for texture in textures {
        writer.write_u32::<BigEndian>(block_len(texture.data.len(), "texture")?)?;
        writer.write_u8(texture.format.to_u8())?;
        writer.write_all(&texture.data)?;
    }
    writer.flush()?;
    Ok(())
}

fn block_len(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len)
        .map_err(|_| InpError::InvalidContainer(format!("{what} of {len} does not fit in u32")))
}

/// Builds a container the way the exporter lays it out.
#[cfg(test)]
pub fn encode(puppet_json: &str, textures: &[EncodedTexture]) -> Vec<u8> {
    let mut out = Vec::new();
    write_container(&mut out, puppet_json.as_bytes(), textures).unwrap();
    out
}

#[cfg(test)]
pub const SAMPLE_PUPPET: &str = r#"{
    "meta": {
        "name": "Aka",
        "version": "1.0-alpha",
        "artist": "Someone",
        "licenseURL": "https://example.org/license",
        "thumbnailId": 4294967295,
        "preservePixels": false
    },
    "physics": { "pixelsPerMeter": 1000, "gravity": 9.8 },
    "nodes": { "type": "Node", "uuid": 1, "name": "Root", "children": [] },
    "param": [
        { "uuid": 2, "name": "Eye:: Left:: XY", "is_vec2": true, "defaults": [0.5, 0.5] },
        { "uuid": 3, "name": "Breathe", "is_vec2": false, "defaults": [0.0, 0.0] },
        { "uuid": 4, "name": "Eyebrow:: Right\u0000" }
    ]
}"#;
