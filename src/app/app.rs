use std::sync::Arc;

use egui_wgpu::ScreenDescriptor;
use egui_winit::State;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::app::previews::TexturePreviews;
use crate::app::ui::{Ui, UiView};
use crate::controller::{Controller, LoadCompletion, LoadOutcome, LoadTicket, UiEvent};
use crate::puppet::PuppetEngine;
use crate::session::AnyStore;
use crate::settings::ViewerSettings;

pub type ViewerController = Controller<PuppetEngine, AnyStore>;

const BACKGROUND: [f32; 3] = [0.08, 0.08, 0.1];

pub struct EventResponse {
    pub repaint: bool,
    pub exit: bool,
}

/// Window-side coordinator. All controller calls happen here, on the event loop thread;
/// fetches are started by the handler from [`App::take_pending_loads`].
pub struct App {
    pub window: Arc<Window>,
    controller: ViewerController,
    settings: ViewerSettings,
    ui: Ui,
    previews: TexturePreviews,
    egui_ctx: egui::Context,
    egui_state: State,
    pending_loads: Vec<LoadTicket>,
    last_error: Option<String>,
}

impl App {
    pub fn new(
        window: Arc<Window>,
        mut controller: ViewerController,
        settings: ViewerSettings,
    ) -> Self {
        let max_texture_side = controller
            .context_mut()
            .map(|gpu| gpu.max_texture_dimension() as usize);
        let egui_ctx = egui::Context::default();
        let egui_state = State::new(
            egui_ctx.clone(),
            egui::viewport::ViewportId::ROOT,
            &window,
            None,
            None,
            max_texture_side,
        );

        Self {
            window,
            controller,
            settings,
            ui: Ui::new(),
            previews: TexturePreviews::new(),
            egui_ctx,
            egui_state,
            pending_loads: Vec::new(),
            last_error: None,
        }
    }

    pub fn queue_load(&mut self, ticket: LoadTicket) {
        self.pending_loads.push(ticket);
    }

    pub fn take_pending_loads(&mut self) -> Vec<LoadTicket> {
        std::mem::take(&mut self.pending_loads)
    }

    pub fn finish_load(&mut self, completion: LoadCompletion) {
        let name = completion.name.clone();
        let outcome = self.controller.complete_load(completion);
        self.report_load(&name, outcome);
    }

    /// Status bar and log for a finished load; stale results leave both alone.
    pub fn report_load(&mut self, name: &str, outcome: crate::error::Result<LoadOutcome>) {
        match outcome {
            Ok(LoadOutcome::Applied) => self.last_error = None,
            Ok(LoadOutcome::Stale) => {}
            Err(e) => {
                log::error!("Failed to load puppet '{name}': {e}");
                self.last_error = Some(format!("{name}: {e}"));
            }
        }
    }

    fn dispatch(&mut self, event: UiEvent) {
        if let Some(ticket) = self.controller.handle_event(event) {
            self.queue_load(ticket);
        }
    }

    pub fn handle_event(&mut self, event: &WindowEvent) -> EventResponse {
        let egui_response = self.egui_state.on_window_event(&self.window, event);
        let mut repaint = egui_response.repaint;

        match event {
            WindowEvent::CloseRequested => {
                return EventResponse {
                    repaint: false,
                    exit: true,
                };
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if !egui_response.consumed
                    && event.logical_key
                        == winit::keyboard::Key::Named(winit::keyboard::NamedKey::Escape)
                {
                    return EventResponse {
                        repaint: false,
                        exit: true,
                    };
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = self.controller.context_mut() {
                    gpu.resize(*size);
                }
            }
            // Pointer moves drive the puppet wherever they happen, panels included.
            WindowEvent::CursorMoved { position, .. } => {
                let size = self.window.inner_size();
                self.dispatch(UiEvent::PointerMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                    width: size.width as f32,
                    height: size.height as f32,
                });
                repaint = true;
            }
            _ => {}
        }

        EventResponse {
            repaint,
            exit: false,
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let egui_ctx = self.egui_ctx.clone();

        self.previews.sync(
            &egui_ctx,
            self.controller.loaded().map(|ticket| ticket.token),
            self.controller.renderer(),
        );

        let checked = self.controller.bind_inputs(&self.settings.formats);
        let view = UiView {
            models: &self.settings.models,
            formats: &self.settings.formats,
            checked: &checked,
            selection: self.controller.selection(),
            capabilities: self.controller.capabilities(),
            renderer: self.controller.renderer(),
            loaded: self.controller.loaded(),
            previews: &self.previews,
            last_error: self.last_error.as_deref(),
        };

        let mut events = Vec::new();
        let full_output = egui_ctx.run(raw_input, |ctx| {
            events = self.ui.show(ctx, &view);
        });

        for event in events {
            self.dispatch(event);
        }

        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let size = self.window.inner_size();
        let screen_descriptor = ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let Some(gpu) = self.controller.context_mut() else {
            return Ok(());
        };
        gpu.paint(
            BACKGROUND,
            &paint_jobs,
            full_output.textures_delta,
            screen_descriptor,
        )
    }
}
