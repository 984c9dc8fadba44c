//! Boundary to the puppet engine. The controller only ever talks to these traits;
//! what a model, a texture set or a rendering context looks like is up to the engine.

mod param_map;

pub use param_map::ParamMap;

use std::future::Future;

use crate::error::Result;

pub trait Engine {
    type Context;
    type Model;
    type Textures;
    type Renderer: Renderer;

    /// Must complete before any other call.
    fn init(&mut self) -> impl Future<Output = Result<()>>;

    /// Binds the named drawing surface.
    fn setup_context(&mut self, canvas_id: &str) -> Result<Self::Context>;

    fn has_astc(context: &Self::Context) -> bool;
    fn has_bptc(context: &Self::Context) -> bool;

    fn parse(&mut self, bytes: &[u8]) -> Result<Self::Model>;

    fn decode_textures(&mut self, model: &mut Self::Model) -> Result<Self::Textures>;

    /// Binds model and textures to the surface and hands back the renderer for them.
    fn setup(
        &mut self,
        context: &Self::Context,
        model: Self::Model,
        textures: Self::Textures,
    ) -> Result<Self::Renderer>;
}

pub trait Renderer {
    fn animate(&mut self, params: &ParamMap);
    fn clear(&mut self);
    fn render(&mut self);
}
