//! # Style
//!
//! Every visual constant the engine and the stock elements read lives in a
//! single [`Style`] value owned by the engine. There is no global theme stack:
//! elements receive `&Style` through their measure/draw contexts.
//!
//! `Style` is serde-friendly so a settings file can override any subset of
//! fields; missing fields fall back to the defaults below.
//!
//! ```rust
//! use tableau_core::Style;
//!
//! let style = Style::default();
//! assert_eq!(style.padding.layout, 5);
//! assert_eq!(style.fade_time().as_millis(), 200);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Color;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    /// Between text and button edges.
    pub button: i32,
    /// Between items and at the outer edges of a box layout.
    pub layout: i32,
    /// Corner radius of every rounded rect.
    pub corner_radius: i32,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            button: 3,
            layout: 5,
            corner_radius: 7,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alpha {
    pub layout: u8,
    pub button: u8,
    pub button_hover: u8,
    pub button_active: u8,
}

impl Default for Alpha {
    fn default() -> Self {
        Self {
            layout: 16,
            button: 32,
            button_hover: 64,
            button_active: 255,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Clear color of the whole surface.
    pub background: Color,
    /// Foreground layered over `background` at the various alpha levels.
    pub foreground: Color,
    pub foreground_deemphasised: Color,
    pub text_normal: Color,
    pub text_highlighted: Color,
    pub text_input: Color,
    pub red: Color,
    pub green: Color,
    pub yellow: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb(50, 51, 57),
            foreground: Color::WHITE,
            foreground_deemphasised: Color::from_rgb(222, 222, 222),
            text_normal: Color::WHITE,
            text_highlighted: Color::from_rgb(99, 108, 119),
            text_input: Color::from_rgb(99, 108, 119),
            red: Color::from_rgb(218, 62, 68),
            green: Color::from_rgb(67, 162, 90),
            yellow: Color::from_rgb(202, 150, 84),
        }
    }
}

/// Visual constants shared by the engine and its elements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Medium font size in px; the default for labels and buttons.
    pub font_med: u32,
    pub scroll_bar: i32,
    /// Time for a hover/click intensity to ramp fully from 0 to 100.
    pub fade_time_ms: u64,
    /// Multiplier on every animation duration.
    pub anim_speed: f32,
    pub padding: Padding,
    pub alpha: Alpha,
    pub colors: Palette,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            font_med: 20,
            scroll_bar: 10,
            fade_time_ms: 200,
            anim_speed: 1.0,
            padding: Padding::default(),
            alpha: Alpha::default(),
            colors: Palette::default(),
        }
    }
}

impl Style {
    pub fn fade_time(&self) -> Duration {
        Duration::from_millis(self.fade_time_ms).mul_f32(self.anim_speed.max(0.0))
    }
}
