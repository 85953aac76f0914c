//! Native preview window
//!
//! Hosts one effect at a time in an egui window so the loops can be looked
//! at without a browser. Hover works like the page: the pointer over the
//! canvas counts as hovering the container.

mod painter;

pub use painter::PainterSurface;

use eframe::egui;
use tracing::{debug, info};

use crate::config::Config;
use crate::core::{rng, Size};
use crate::effect::{self, EffectKind, Scene};
use crate::theme::{colors, preview_visuals, Theme};
use crate::time::now_seconds;

pub struct PreviewApp {
    config: Config,
    /// Fixed seed from the command line; `None` draws from OS entropy.
    seed: Option<u64>,
    reseeds: u64,
    kind: EffectKind,
    scene: Option<Scene>,
    theme: Theme,
    /// Keep the hovered state on while the pointer is elsewhere
    pin_hover: bool,
}

impl PreviewApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, seed: Option<u64>) -> Self {
        let theme = Theme::Dark;
        cc.egui_ctx.set_visuals(preview_visuals(theme));
        info!(?seed, "Preview started");
        Self {
            config,
            seed,
            reseeds: 0,
            kind: EffectKind::Field,
            scene: None,
            theme,
            pin_hover: false,
        }
    }

    fn next_rng(&mut self) -> rng::FxRng {
        match self.seed {
            Some(seed) => {
                self.reseeds += 1;
                rng::seeded(seed.wrapping_add(self.reseeds - 1))
            }
            None => rng::from_entropy(),
        }
    }

    /// Drop the running effect. The next frame builds a fresh one at the
    /// current canvas size.
    fn restart(&mut self) {
        self.scene = None;
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for &kind in EffectKind::ALL {
                let color = if self.kind == kind {
                    ui.visuals().strong_text_color()
                } else {
                    ui.visuals().weak_text_color()
                };
                if ui
                    .selectable_label(self.kind == kind, egui::RichText::new(kind.label()).color(color))
                    .clicked()
                    && self.kind != kind
                {
                    debug!(%kind, "Switching effect");
                    self.kind = kind;
                    self.restart();
                }
            }

            ui.add_space(10.0);

            let theme_text = if self.theme.is_dark() { "Dark" } else { "Light" };
            if ui.button(theme_text).clicked() {
                self.theme = self.theme.toggled();
                ui.ctx().set_visuals(preview_visuals(self.theme));
            }
            ui.checkbox(&mut self.pin_hover, "Hover");
            if ui.button("Reseed").clicked() {
                self.restart();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(scene) = &self.scene {
                    let teal = egui::Color32::from_rgb(colors::TEAL.r, colors::TEAL.g, colors::TEAL.b);
                    ui.label(egui::RichText::new(format!("{} frames", scene.frames())).color(teal));
                    ui.label(format!("{:.0}×{:.0}", scene.size().width, scene.size().height));
                }
            });
        });
    }

    fn render_canvas(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, egui::Sense::hover());
        let rect = response.rect;
        let size = Size::new(rect.width() as f64, rect.height() as f64);
        if size.is_empty() {
            return;
        }

        if self.scene.is_none() {
            let rng = self.next_rng();
            let effect = effect::build(self.kind, size, &self.config, rng);
            self.scene = Some(Scene::new(effect, self.theme));
        }
        let Some(scene) = self.scene.as_mut() else {
            return;
        };

        if scene.size() != size {
            scene.resize(size);
        }
        scene.theme = self.theme;
        scene.hovered = self.pin_hover || response.hovered();

        let mut surface = PainterSurface::new(&painter, rect);
        scene.step(&mut surface, now_seconds());
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint();

        egui::TopBottomPanel::top("header").show(ctx, |ui| self.render_header(ui));
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.render_canvas(ui));
    }
}
