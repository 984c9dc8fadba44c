//! The viewer's session: engine, selection, rendering context and the live renderer.
//!
//! Loads are split in two so the fetch can run off the coordinator: [`Controller::request_load`]
//! hands out a [`LoadTicket`], whoever fetches the bytes sends back a [`LoadCompletion`], and
//! [`Controller::complete_load`] runs parse, texture decoding and setup. Each request gets a
//! fresh token; with stale discarding on, only the newest ticket is ever set up.

mod event;
mod pointer;

pub use event::*;
pub use pointer::pointer_params;

use crate::asset::AssetSource;
use crate::engine::{Engine, Renderer};
use crate::error::{InpError, Result};
use crate::session::{Selection, SessionStore};

/// Optional GPU texture compression support of the rendering context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub astc: bool,
    pub bptc: bool,
}

impl Capabilities {
    /// Whether the format input with this id may be picked.
    pub fn format_enabled(&self, format: &str) -> bool {
        match format {
            "astc" => self.astc,
            "bc7" => self.bptc,
            _ => true,
        }
    }
}

pub struct Controller<E: Engine, S: SessionStore> {
    engine: E,
    store: S,
    selection: Selection,
    context: Option<E::Context>,
    renderer: Option<E::Renderer>,
    capabilities: Capabilities,
    last_token: u64,
    loaded: Option<LoadTicket>,
    discard_stale: bool,
}

impl<E: Engine, S: SessionStore> Controller<E, S> {
    /// Reads the persisted selection, filling in defaults.
    pub fn new(engine: E, mut store: S, discard_stale: bool) -> Self {
        let selection = Selection::load(&mut store);
        Self {
            engine,
            store,
            selection,
            context: None,
            renderer: None,
            capabilities: Capabilities::default(),
            last_token: 0,
            loaded: None,
            discard_stale,
        }
    }

    /// Initializes the engine, binds the drawing surface and queries its capabilities.
    /// Returns the ticket of the initial load.
    pub async fn startup(&mut self, canvas_id: &str) -> Result<LoadTicket> {
        self.engine.init().await?;

        let context = self.engine.setup_context(canvas_id)?;
        self.capabilities = Capabilities {
            astc: E::has_astc(&context),
            bptc: E::has_bptc(&context),
        };
        log::info!(
            "Rendering context '{}' ready (astc: {}, bptc: {})",
            canvas_id,
            self.capabilities.astc,
            self.capabilities.bptc
        );
        self.context = Some(context);

        Ok(self.request_load())
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn context_mut(&mut self) -> Option<&mut E::Context> {
        self.context.as_mut()
    }

    pub fn renderer(&self) -> Option<&E::Renderer> {
        self.renderer.as_ref()
    }

    /// The ticket whose result is currently set up.
    pub fn loaded(&self) -> Option<&LoadTicket> {
        self.loaded.as_ref()
    }

    pub fn asset_name(&self) -> String {
        self.selection.asset_name()
    }

    /// Issues a new load for the current selection.
    pub fn request_load(&mut self) -> LoadTicket {
        self.last_token += 1;
        let ticket = LoadTicket {
            token: self.last_token,
            name: self.asset_name(),
        };
        log::info!("Loading puppet {} (request {})", ticket.name, ticket.token);
        ticket
    }

    /// Parses, decodes and sets up the fetched bytes. Errors leave the current renderer
    /// in place.
    pub fn complete_load(&mut self, completion: LoadCompletion) -> Result<LoadOutcome> {
        let LoadCompletion {
            token,
            name,
            result,
        } = completion;

        if self.discard_stale && token != self.last_token {
            log::debug!(
                "Dropping {} (request {}), request {} is newer",
                name,
                token,
                self.last_token
            );
            return Ok(LoadOutcome::Stale);
        }

        let bytes = result?;
        let context = self.context.as_ref().ok_or(InpError::NotInitialized)?;

        let mut model = self.engine.parse(&bytes)?;
        let textures = self.engine.decode_textures(&mut model)?;
        let renderer = self.engine.setup(context, model, textures)?;

        log::info!("Puppet {name} set up (request {token})");
        self.renderer = Some(renderer);
        self.loaded = Some(LoadTicket { token, name });
        Ok(LoadOutcome::Applied)
    }

    /// Fetches and completes `ticket` in one go. Used for the initial load; later
    /// loads fetch in the background and come back through [`Self::complete_load`].
    pub async fn load_model(
        &mut self,
        source: &impl AssetSource,
        ticket: LoadTicket,
    ) -> Result<LoadOutcome> {
        let result = source.fetch(&ticket.name).await;
        self.complete_load(LoadCompletion::new(ticket, result))
    }

    pub fn select_model(&mut self, model: &str) -> LoadTicket {
        self.selection.set_model(&mut self.store, model);
        self.request_load()
    }

    pub fn select_format(&mut self, format: &str) -> LoadTicket {
        self.selection.set_format(&mut self.store, format);
        self.request_load()
    }

    /// Checked state for each format input: only the persisted format is checked.
    pub fn bind_inputs<I: AsRef<str>>(&self, input_ids: &[I]) -> Vec<bool> {
        input_ids
            .iter()
            .map(|id| id.as_ref() == self.selection.format)
            .collect()
    }

    /// Drives the eye and eyebrow parameters from the pointer. Does nothing until a
    /// puppet is set up; returns whether a frame was rendered.
    pub fn pointer_moved(&mut self, x: f32, y: f32, width: f32, height: f32) -> bool {
        let Some(renderer) = self.renderer.as_mut() else {
            log::trace!("Pointer moved before a puppet was set up");
            return false;
        };
        let Some(params) = pointer_params(x, y, width, height) else {
            return false;
        };
        renderer.animate(&params);
        renderer.clear();
        renderer.render();
        true
    }

    /// Returns the load to start, if the event asks for one.
    pub fn handle_event(&mut self, event: UiEvent) -> Option<LoadTicket> {
        match event {
            UiEvent::ButtonClicked(id) => Some(self.select_model(&id)),
            UiEvent::InputChanged(id) => Some(self.select_format(&id)),
            UiEvent::PointerMoved {
                x,
                y,
                width,
                height,
            } => {
                self.pointer_moved(x, y, width, height);
                None
            }
        }
    }
}
