use crate::app::previews::TexturePreviews;
use crate::controller::{Capabilities, LoadTicket, UiEvent};
use crate::puppet::PuppetRenderer;
use crate::session::Selection;

/// Everything the panels read in one frame.
pub struct UiView<'a> {
    pub models: &'a [String],
    pub formats: &'a [String],
    pub checked: &'a [bool],
    pub selection: &'a Selection,
    pub capabilities: Capabilities,
    pub renderer: Option<&'a PuppetRenderer>,
    pub loaded: Option<&'a LoadTicket>,
    pub previews: &'a TexturePreviews,
    pub last_error: Option<&'a str>,
}

pub struct Ui {
    show_model_info: bool,
    show_params: bool,
    show_textures: bool,
}

impl Ui {
    pub fn new() -> Self {
        Self {
            show_model_info: true,
            show_params: true,
            show_textures: false,
        }
    }

    /// Draws the panels and returns the control events of this frame.
    pub fn show(&mut self, ctx: &egui::Context, view: &UiView) -> Vec<UiEvent> {
        let mut events = Vec::new();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label("Model:");
                for model in view.models {
                    let label = if *model == view.selection.model {
                        format!("▶ {model}")
                    } else {
                        model.clone()
                    };
                    if ui.button(label).clicked() {
                        events.push(UiEvent::ButtonClicked(model.clone()));
                    }
                }

                ui.separator();
                ui.label("Textures:");
                for (format, checked) in view.formats.iter().zip(view.checked) {
                    let enabled = view.capabilities.format_enabled(format);
                    let response =
                        ui.add_enabled(enabled, egui::RadioButton::new(*checked, format.as_str()));
                    // Like an input's change event: re-picking the checked one does nothing.
                    if response.clicked() && !*checked {
                        events.push(UiEvent::InputChanged(format.clone()));
                    }
                }

                ui.separator();
                ui.label("📋 Windows:");
                toggle(ui, &mut self.show_model_info, "Model Info");
                toggle(ui, &mut self.show_params, "Parameters");
                toggle(ui, &mut self.show_textures, "Textures");
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Selected: {}", view.selection.asset_name()));
                ui.separator();
                match view.loaded {
                    Some(ticket) => {
                        ui.label(format!("Showing: {} (request {})", ticket.name, ticket.token))
                    }
                    None => ui.label("Showing: nothing yet"),
                };
                if let Some(renderer) = view.renderer {
                    ui.separator();
                    ui.label(format!("Frame {}", renderer.frame()));
                }
                if let Some(error) = view.last_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::RED, error);
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if view.renderer.is_none() {
                    ui.centered_and_justified(|ui| {
                        ui.label(format!("Loading {}…", view.selection.asset_name()));
                    });
                }
            });

        let Some(renderer) = view.renderer else {
            return events;
        };

        egui::Window::new("Model Info")
            .open(&mut self.show_model_info)
            .default_pos([16.0, 48.0])
            .show(ctx, |ui| {
                egui::Grid::new("model_info_grid").show(ui, |ui| {
                    for (label, value) in renderer.meta().fields() {
                        ui.label(label);
                        ui.label(value);
                        ui.end_row();
                    }
                });
            });

        egui::Window::new("Parameters")
            .open(&mut self.show_params)
            .default_pos([16.0, 260.0])
            .show(ctx, |ui| {
                ui.label(format!("{} parameters", renderer.params().len()));
                egui::ScrollArea::vertical().show(ui, |ui| {
                    egui::Grid::new("param_grid").striped(true).show(ui, |ui| {
                        for (name, [x, y]) in renderer.params().iter() {
                            ui.label(name.trim_end_matches('\0'));
                            ui.monospace(format!("{x:>6.3} {y:>6.3}"));
                            ui.end_row();
                        }
                    });
                });
            });

        egui::Window::new("Textures")
            .open(&mut self.show_textures)
            .default_width(400.0)
            .resizable(true)
            .show(ctx, |ui| {
                if renderer.is_cleared() {
                    return;
                }
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for entry in view.previews.entries() {
                            ui.group(|ui| {
                                ui.label(&entry.label);
                                match &entry.handle {
                                    Some(handle) => {
                                        ui.add(egui::Image::new(handle).max_width(256.0));
                                    }
                                    None => {
                                        ui.weak("no preview for compressed textures");
                                    }
                                }
                            });
                        }
                    });
            });

        events
    }
}

fn toggle(ui: &mut egui::Ui, open: &mut bool, label: &str) {
    let text = if *open {
        format!("✅ {label}")
    } else {
        format!("⬜ {label}")
    };
    if ui.button(text).clicked() {
        *open = !*open;
    }
}
