use crate::image_source::impl_file::load_captured_image;
use crate::inference_pipeline::main::PipelineHandle;
use crate::presenter::interface::{PresentedView, Presenter};
use eframe::egui;
use std::error::Error;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Default)]
struct Shared {
    view: PresentedView,
    // Bumped whenever the preview image changes so the window re-uploads its texture.
    preview_version: u64,
    ctx: Option<egui::Context>,
}

struct XRayWindow {
    shared: Arc<Mutex<Shared>>,
    handle: PipelineHandle,
    texture: Option<(u64, egui::TextureHandle)>,
}

impl XRayWindow {
    fn preview_texture(
        &mut self,
        ctx: &egui::Context,
        view: &PresentedView,
        version: u64,
    ) -> Option<egui::TextureHandle> {
        let image = view.preview_image.as_ref()?;

        if let Some((loaded, texture)) = &self.texture {
            if *loaded == version {
                return Some(texture.clone());
            }
        }

        let rgba = image.upright().to_rgba8();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [rgba.width() as usize, rgba.height() as usize],
            rgba.as_raw(),
        );
        let texture = ctx.load_texture("preview", color_image, Default::default());
        self.texture = Some((version, texture.clone()));
        Some(texture)
    }
}

impl eframe::App for XRayWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (view, version) = {
            let shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
            (shared.view.clone(), shared.preview_version)
        };
        let texture = self.preview_texture(ctx, &view, version);

        let dropped: Vec<std::path::PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        // An unreadable file is classified as no image at all.
        if let Some(path) = dropped.last() {
            self.handle.classify(load_captured_image(path).ok());
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("XRayCheck");
                ui.add_space(12.0);

                match &texture {
                    Some(texture) => {
                        ui.add(egui::Image::new(texture).max_height(280.0));
                    }
                    None => {
                        ui.add_space(120.0);
                        ui.weak("Capture a chest X-ray or drop an image here");
                        ui.add_space(120.0);
                    }
                }

                ui.add_space(12.0);

                if view.is_loading {
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new());
                        ui.label(view.result_text.as_str());
                    });
                } else {
                    ui.label(egui::RichText::new(&view.result_text).size(20.0).strong());
                }

                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    if ui.button("Clear").clicked() {
                        self.handle.clear();
                    }
                    if ui.button("Open Camera").clicked() {
                        self.handle.request_capture();
                    }
                });

                ui.add_space(24.0);
                ui.small("Demo • On-device inference • Not for clinical use");
            });
        });
    }
}

/// Publishes views into a window. The window itself has to run on the main thread via
/// [`PresenterGui::run_window`]; `render` may be called from any thread.
#[derive(Clone, Default)]
pub struct PresenterGui {
    shared: Arc<Mutex<Shared>>,
}

impl PresenterGui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until the window is closed.
    pub fn run_window(&self, handle: PipelineHandle) -> Result<(), Box<dyn Error + Send + Sync>> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([420.0, 560.0])
                .with_resizable(true),
            ..Default::default()
        };

        let shared = self.shared.clone();

        eframe::run_native(
            "XRayCheck",
            options,
            Box::new(move |cc| {
                shared
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .ctx = Some(cc.egui_ctx.clone());
                Box::new(XRayWindow {
                    shared,
                    handle,
                    texture: None,
                })
            }),
        )
        .map_err(|e| e.to_string().into())
    }
}

impl Presenter for PresenterGui {
    fn render(&mut self, view: &PresentedView) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut shared = self.shared.lock().map_err(|e| e.to_string())?;

        let preview_changed = match (&shared.view.preview_image, &view.preview_image) {
            (Some(shown), Some(next)) => !shown.same_capture(next),
            (None, None) => false,
            _ => true,
        };
        if preview_changed {
            shared.preview_version += 1;
        }
        shared.view = view.clone();

        if let Some(ctx) = &shared.ctx {
            ctx.request_repaint();
        }

        Ok(())
    }
}
