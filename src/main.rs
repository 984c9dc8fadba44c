use std::path::Path;

use anyhow::{Context, bail};
use winit::event_loop::{ControlFlow, EventLoop};

mod app;
mod asset;
mod controller;
mod engine;
mod error;
mod gpu;
mod puppet;
mod session;
mod settings;

use crate::app::AppHandler;
use crate::asset::AnySource;
use crate::puppet::container::{self, TextureFormat};
use crate::puppet::texture::{self, decode_all};
use crate::settings::ViewerSettings;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [flag, path] = args.as_slice()
        && flag == "--info"
    {
        return print_info(Path::new(path));
    }
    if let [flag, format, input, output] = args.as_slice()
        && flag == "--transcode"
    {
        return transcode(format, Path::new(input), Path::new(output));
    }

    let mut settings = ViewerSettings::load();
    if let Some(location) = args.first() {
        settings.asset_source = location.clone();
    }
    log::info!("Serving puppets from {}", settings.asset_source);
    let source = AnySource::from_location(&settings.asset_source);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut handler = AppHandler::new(settings, source, tokio::runtime::Runtime::new()?);
    event_loop.run_app(&mut handler)?;

    Ok(())
}

/// Prints what a `.inp` file holds without opening a window.
fn print_info(path: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file = container::parse(&bytes).with_context(|| format!("parsing {}", path.display()))?;

    println!("{}", path.display());
    for (label, value) in file.puppet.meta.fields() {
        println!("  {label:<10} {value}");
    }

    println!("Parameters ({}):", file.puppet.param.len());
    for param in &file.puppet.param {
        println!(
            "  {:<24} {:?}",
            param.name.trim_end_matches('\0'),
            param.defaults
        );
    }

    let textures = decode_all(&file.textures)?;
    println!("Textures ({}):", textures.len());
    for (index, texture) in textures.iter().enumerate() {
        println!("  #{index} {}", texture.describe());
    }

    Ok(())
}

/// Rewrites a `.inp` file with every texture stored as PNG or TGA.
fn transcode(format: &str, input: &Path, output: &Path) -> anyhow::Result<()> {
    let format = match format.to_ascii_lowercase().as_str() {
        "png" => TextureFormat::Png,
        "tga" => TextureFormat::Tga,
        other => bail!("unsupported texture format '{other}', expected png or tga"),
    };

    let bytes = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let mut file =
        container::parse(&bytes).with_context(|| format!("parsing {}", input.display()))?;
    texture::transcode(&mut file, format)?;

    let out = std::fs::File::create(output)
        .with_context(|| format!("creating {}", output.display()))?;
    file.write(std::io::BufWriter::new(out))?;
    log::info!(
        "Wrote {} textures as {format:?} to {}",
        file.textures.len(),
        output.display()
    );
    Ok(())
}
