//! Site palette - teal/cyan accents on slate, in dark and light variants

use serde::{Deserialize, Serialize};

use crate::core::Rgba;

/// Page theme. Only ever changes colors, never geometry or motion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn toggled(self) -> Self {
        Self::from_dark(!self.is_dark())
    }
}

pub mod colors {
    use super::Rgba;

    // === Accents ===
    pub const TEAL: Rgba = Rgba::rgb(93, 190, 189);         // #5DBEBD - brand teal
    pub const CYAN: Rgba = Rgba::rgb(6, 182, 212);          // #06B6D4 - network nodes
    pub const CYAN_BRIGHT: Rgba = Rgba::rgb(34, 211, 238);  // #22D3EE - cores, packets
    pub const SKY: Rgba = Rgba::rgb(99, 179, 237);          // #63B3ED - active grid
    pub const SLATE: Rgba = Rgba::rgb(148, 163, 184);       // #94A3B8 - idle grid
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    // === Grid backgrounds (top, middle, bottom) ===
    pub const GRID_BG_LIGHT: [Rgba; 3] = [
        Rgba::rgb(248, 250, 252), // #F8FAFC
        Rgba::rgb(241, 245, 249), // #F1F5F9
        Rgba::rgb(226, 232, 240), // #E2E8F0
    ];
    pub const GRID_BG_DARK: [Rgba; 3] = [
        Rgba::rgb(2, 6, 23),      // #020617
        Rgba::rgb(15, 23, 42),    // #0F172A
        Rgba::rgb(30, 41, 59),    // #1E293B
    ];

    // === Preview chrome ===
    pub const BG_DARK: Rgba = Rgba::rgb(2, 6, 23);
    pub const BG_LIGHT: Rgba = Rgba::rgb(248, 250, 252);
}

/// Particle field strengths for a theme: (wave base, wave step, line alpha,
/// particle alpha scale).
pub fn field_alphas(theme: Theme) -> (f64, f64, f64, f64) {
    match theme {
        Theme::Dark => (0.3, 0.05, 0.4, 1.0),
        Theme::Light => (0.22, 0.04, 0.28, 0.7),
    }
}

pub fn grid_background(theme: Theme) -> [Rgba; 3] {
    match theme {
        Theme::Dark => colors::GRID_BG_DARK,
        Theme::Light => colors::GRID_BG_LIGHT,
    }
}

/// egui visuals for the native preview window.
#[cfg(feature = "preview")]
pub fn preview_visuals(theme: Theme) -> egui::Visuals {
    use egui::Color32;

    let mut visuals = match theme {
        Theme::Dark => egui::Visuals::dark(),
        Theme::Light => egui::Visuals::light(),
    };
    let bg = match theme {
        Theme::Dark => colors::BG_DARK,
        Theme::Light => colors::BG_LIGHT,
    };
    let bg = Color32::from_rgb(bg.r, bg.g, bg.b);
    let accent = Color32::from_rgb(colors::TEAL.r, colors::TEAL.g, colors::TEAL.b);

    visuals.panel_fill = bg;
    visuals.window_fill = bg;
    visuals.extreme_bg_color = bg;
    visuals.selection.bg_fill = accent.gamma_multiply(0.5);
    visuals.selection.stroke = egui::Stroke::new(1.0, accent);
    visuals.hyperlink_color = accent;

    // Flat, like the page
    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}
