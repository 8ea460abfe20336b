//! Indexed pen/fill colour tables and the live RGB offsets applied on top of them.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Number of entries in each colour table.
pub const PALETTE_SIZE: usize = 5;

/// An 8-bit RGB colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const GRAY: Rgb = Rgb(128, 128, 128);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const ORANGE: Rgb = Rgb(255, 128, 0);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const CYAN: Rgb = Rgb(0, 255, 255);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const PURPLE: Rgb = Rgb(128, 0, 255);
    pub const MAGENTA: Rgb = Rgb(255, 0, 255);

    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.0 as f32, self.1 as f32, self.2 as f32)
    }

    /// Clamps each component to `0..=255` and rounds.
    pub fn from_vec3(v: Vec3) -> Self {
        let v = v.clamp(Vec3::ZERO, Vec3::splat(255.0)).round();
        Rgb(v.x as u8, v.y as u8, v.z as u8)
    }
}

/// Which colour a selection or RGB nudge applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    #[default]
    Pen,
    Fill,
}

impl Channel {
    pub fn toggled(self) -> Self {
        match self {
            Channel::Pen => Channel::Fill,
            Channel::Fill => Channel::Pen,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Pen => "pen",
            Channel::Fill => "fill",
        }
    }
}

/// Colour tables as supplied by configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub pen: [Rgb; PALETTE_SIZE],
    pub fill: [Rgb; PALETTE_SIZE],
    /// Per-component step for `,` `.` (red), `;` `:` (green) and `?` `!` (blue).
    pub increments: Vec3,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            pen: [Rgb::WHITE, Rgb::GRAY, Rgb::RED, Rgb::ORANGE, Rgb::YELLOW],
            fill: [Rgb::GREEN, Rgb::CYAN, Rgb::BLUE, Rgb::PURPLE, Rgb::MAGENTA],
            increments: Vec3::ONE,
        }
    }
}

/// Run-local palette.
///
/// The tables never change during a run. Nudges accumulate into a per-channel
/// offset which is added to whichever table entry is selected when a colour is
/// resolved.
#[derive(Clone, Debug)]
pub struct Palette {
    pen: [Rgb; PALETTE_SIZE],
    fill: [Rgb; PALETTE_SIZE],
    increments: Vec3,
    pen_offset: Vec3,
    fill_offset: Vec3,
}

impl Palette {
    pub fn new(config: &PaletteConfig) -> Self {
        Self {
            pen: config.pen,
            fill: config.fill,
            increments: config.increments,
            pen_offset: Vec3::ZERO,
            fill_offset: Vec3::ZERO,
        }
    }

    /// Nudges one RGB component (`0` red, `1` green, `2` blue) of `channel` by
    /// `sign` increments. Offsets stay within `-255..=255` so they can always be
    /// walked back.
    pub fn nudge(&mut self, channel: Channel, component: usize, sign: f32) {
        let Some(step) = self.increments.to_array().get(component).copied() else {
            return;
        };
        let offset = match channel {
            Channel::Pen => &mut self.pen_offset,
            Channel::Fill => &mut self.fill_offset,
        };
        offset[component] = (offset[component] + sign * step).clamp(-255.0, 255.0);
    }

    pub fn offset(&self, channel: Channel) -> Vec3 {
        match channel {
            Channel::Pen => self.pen_offset,
            Channel::Fill => self.fill_offset,
        }
    }

    /// Resolves table entry `index` of `channel` with that channel's offset applied.
    /// Out-of-range indices clamp to the last entry.
    pub fn color(&self, channel: Channel, index: usize) -> Rgb {
        let index = index.min(PALETTE_SIZE - 1);
        let base = match channel {
            Channel::Pen => self.pen[index],
            Channel::Fill => self.fill[index],
        };
        Rgb::from_vec3(base.as_vec3() + self.offset(channel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_split_the_ten_classic_colors() {
        let palette = Palette::new(&PaletteConfig::default());
        assert_eq!(palette.color(Channel::Pen, 0), Rgb::WHITE);
        assert_eq!(palette.color(Channel::Pen, 4), Rgb::YELLOW);
        assert_eq!(palette.color(Channel::Fill, 0), Rgb::GREEN);
        assert_eq!(palette.color(Channel::Fill, 4), Rgb::MAGENTA);
    }

    #[test]
    fn nudges_only_touch_their_channel() {
        let mut palette = Palette::new(&PaletteConfig::default());
        palette.nudge(Channel::Pen, 0, -1.0);
        palette.nudge(Channel::Pen, 0, -1.0);
        assert_eq!(palette.color(Channel::Pen, 0), Rgb(253, 255, 255));
        assert_eq!(palette.color(Channel::Fill, 0), Rgb::GREEN);

        // The offset follows the channel, not the table entry.
        assert_eq!(palette.color(Channel::Pen, 2), Rgb(253, 0, 0));
    }

    #[test]
    fn resolved_colors_clamp() {
        let mut palette = Palette::new(&PaletteConfig::default());
        palette.nudge(Channel::Fill, 1, 1.0);
        palette.nudge(Channel::Fill, 2, -1.0);
        assert_eq!(palette.color(Channel::Fill, 0), Rgb(0, 255, 0));
        palette.nudge(Channel::Fill, 0, 1.0);
        assert_eq!(palette.color(Channel::Fill, 0), Rgb(1, 255, 0));
    }

    #[test]
    fn fractional_increments_round() {
        let mut palette = Palette::new(&PaletteConfig {
            increments: Vec3::new(0.4, 0.0, 0.0),
            ..Default::default()
        });
        palette.nudge(Channel::Pen, 0, -1.0);
        assert_eq!(palette.color(Channel::Pen, 1), Rgb(128, 128, 128));
        palette.nudge(Channel::Pen, 0, -1.0);
        assert_eq!(palette.color(Channel::Pen, 1), Rgb(127, 128, 128));
    }

    #[test]
    fn bad_component_is_ignored() {
        let mut palette = Palette::new(&PaletteConfig::default());
        palette.nudge(Channel::Pen, 3, 1.0);
        assert_eq!(palette.offset(Channel::Pen), Vec3::ZERO);
    }
}
