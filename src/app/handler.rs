use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use tokio::runtime::Runtime;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::app::app::{App, ViewerController};
use crate::asset::{AnySource, AssetSource};
use crate::controller::{LoadCompletion, LoadTicket};
use crate::error::{InpError, Result};
use crate::puppet::PuppetEngine;
use crate::session::AnyStore;
use crate::settings::ViewerSettings;

pub struct AppHandler {
    app: Option<App>,
    settings: ViewerSettings,
    source: AnySource,
    runtime: Runtime,
    sender: Sender<LoadCompletion>,
    receiver: Receiver<LoadCompletion>,
}

impl AppHandler {
    pub fn new(settings: ViewerSettings, source: AnySource, runtime: Runtime) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            app: None,
            settings,
            source,
            runtime,
            sender,
            receiver,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<App> {
        let window_attrs = Window::default_attributes()
            .with_title("INPVis-RS - Puppet Viewer")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.settings.window_width,
                self.settings.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| InpError::Context(e.to_string()))?,
        );

        let engine = PuppetEngine::new().with_surface(&self.settings.canvas_id, window.clone());
        let store = AnyStore::for_selection(self.settings.persist_selection);
        let mut controller =
            ViewerController::new(engine, store, self.settings.discard_stale_loads);

        let ticket = self
            .runtime
            .block_on(controller.startup(&self.settings.canvas_id))?;

        // The first puppet is loaded before the window shows, later ones in the background.
        let name = ticket.name.clone();
        let outcome = self
            .runtime
            .block_on(controller.load_model(&self.source, ticket));

        let mut app = App::new(window, controller, self.settings.clone());
        app.report_load(&name, outcome);
        Ok(app)
    }

    fn drain_completions(&mut self) {
        let Some(app) = &mut self.app else {
            return;
        };
        while let Ok(completion) = self.receiver.try_recv() {
            app.finish_load(completion);
        }
    }

    fn spawn_pending(&mut self) {
        let Some(app) = &mut self.app else {
            return;
        };
        for ticket in app.take_pending_loads() {
            spawn_fetch(&self.runtime, &self.source, &self.sender, ticket);
        }
    }
}

/// Fetches on the runtime; the bytes come back through the channel in completion order.
fn spawn_fetch(
    runtime: &Runtime,
    source: &AnySource,
    sender: &Sender<LoadCompletion>,
    ticket: LoadTicket,
) {
    log::info!("Fetching {} (request {})", ticket.name, ticket.token);
    let source = source.clone();
    let sender = sender.clone();
    runtime.spawn(async move {
        let result = source.fetch(&ticket.name).await;
        // The receiver only goes away on shutdown.
        let _ = sender.send(LoadCompletion::new(ticket, result));
    });
}

impl ApplicationHandler for AppHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(app) => self.app = Some(app),
            Err(e) => {
                log::error!("Failed to start viewer: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(app) = &mut self.app {
            let response = app.handle_event(&event);
            if response.repaint {
                app.window.request_redraw();
            }
            if response.exit {
                event_loop.exit();
            }
        }
        self.spawn_pending();
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.drain_completions();

        if let Some(app) = &mut self.app {
            if let Err(e) = app.render() {
                log::warn!("Render error: {e:?}");
            }
            app.window.request_redraw();
        }
        self.spawn_pending();
    }
}
