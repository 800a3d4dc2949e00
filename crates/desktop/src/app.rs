//! DeenGPT Desktop — egui app state and UI.
//!
//! One text field (`user-input`), one Send button, one label (`response`). Every send is an
//! independent dispatch on the background runtime; whichever reply lands last is what the label shows.

use deen::{Dispatcher, ResponseView, TextField};
use eframe::egui;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const INPUT_ID: &str = "user-input";
const RESPONSE_ID: &str = "response";
const SEND_BUTTON_WIDTH: f32 = 72.0;

/// Response label contents plus a handle to wake the UI when a dispatch renders into it.
struct RepaintingView {
    field: TextField,
    ctx: egui::Context,
}

impl ResponseView for RepaintingView {
    fn render(&self, text: &str) {
        self.field.render(text);
        self.ctx.request_repaint();
    }
}

/// Runtime and dispatcher; absent when config could not be loaded.
struct Backend {
    runtime: tokio::runtime::Runtime,
    dispatcher: Dispatcher,
}

fn build_backend() -> anyhow::Result<Backend> {
    let (config, path) = deen::config::load_config(None)?;
    let dispatcher = Dispatcher::from_config(&config, None)?;
    log::info!(
        "loaded config from {}, endpoint {}",
        path.display(),
        dispatcher.client().endpoint()
    );
    let runtime = tokio::runtime::Runtime::new()?;
    Ok(Backend {
        runtime,
        dispatcher,
    })
}

/// Shown in the response label when there is no dispatcher (and so no configured prefix).
fn startup_error_line(err: &anyhow::Error) -> String {
    format!("{} error: {:#}", deen::config::DEFAULT_PREFIX, err)
}

pub struct DeenApp {
    backend: Option<Backend>,
    /// Current text of the input field.
    input: String,
    /// Text of the response label; written by background dispatches.
    response: TextField,
    /// Dispatches started but not yet rendered.
    in_flight: Arc<AtomicUsize>,
}

impl DeenApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let response = TextField::default();
        let backend = match build_backend() {
            Ok(b) => Some(b),
            Err(e) => {
                log::error!("desktop startup failed: {:#}", e);
                response.set_text(startup_error_line(&e));
                None
            }
        };
        Self {
            backend,
            input: String::new(),
            response,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Start one dispatch with the current input. The input is read now, not when the request goes out.
    fn start_dispatch(&mut self, ctx: &egui::Context) {
        let Some(backend) = &self.backend else {
            return;
        };
        let dispatcher = backend.dispatcher.clone();
        let message = self.input.clone();
        let view = RepaintingView {
            field: self.response.clone(),
            ctx: ctx.clone(),
        };
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::SeqCst);
        backend.runtime.spawn(async move {
            // Failures are rendered into the label by the dispatcher.
            let _ = dispatcher.dispatch(&message, &view).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
            view.ctx.request_repaint();
        });
    }
}

impl eframe::App for DeenApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::none()
                .inner_margin(egui::Margin::symmetric(24.0, 16.0))
                .show(ui, |ui| {
                    ui.heading("DeenGPT");
                    ui.add_space(16.0);

                    let mut send_now = false;
                    let can_send = self.backend.is_some();
                    ui.horizontal(|ui| {
                        let width = (ui.available_width() - SEND_BUTTON_WIDTH).max(120.0);
                        let input = ui.add(
                            egui::TextEdit::singleline(&mut self.input)
                                .id_source(INPUT_ID)
                                .hint_text("Ask about a hadith, e.g. bukhari 1")
                                .desired_width(width),
                        );
                        if input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            send_now = true;
                            input.request_focus();
                        }
                        if ui.add_enabled(can_send, egui::Button::new("Send")).clicked() {
                            send_now = true;
                        }
                    });
                    if send_now && can_send {
                        self.start_dispatch(ctx);
                    }

                    ui.add_space(16.0);
                    ui.separator();
                    ui.add_space(8.0);

                    if self.in_flight.load(Ordering::SeqCst) > 0 {
                        ui.spinner();
                    }
                    egui::ScrollArea::vertical()
                        .id_source(RESPONSE_ID)
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            ui.label(self.response.text());
                        });
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_error_uses_default_prefix() {
        let err = anyhow::anyhow!("invalid endpoint").context("parsing config");
        assert_eq!(
            startup_error_line(&err),
            "DeenGPT error: parsing config: invalid endpoint"
        );
    }
}
