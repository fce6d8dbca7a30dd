use place_dither::{Palette, Rgb};

/// A built-in palette selectable by name.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub colors: &'static [(Rgb, &'static str)],
}

impl Preset {
    pub fn palette(&self) -> Palette {
        Palette::new(self.colors.iter().map(|&(rgb, _)| rgb).collect::<Vec<_>>())
    }
}

const WPLACE_FREE: &[(Rgb, &str)] = &[
    (Rgb::new(0x00, 0x00, 0x00), "Black"),
    (Rgb::new(0x3c, 0x3c, 0x3c), "Dark Gray"),
    (Rgb::new(0x78, 0x78, 0x78), "Gray"),
    (Rgb::new(0xd2, 0xd2, 0xd2), "Light Gray"),
    (Rgb::new(0xff, 0xff, 0xff), "White"),
    (Rgb::new(0x60, 0x00, 0x18), "Deep Red"),
    (Rgb::new(0xed, 0x1c, 0x24), "Red"),
    (Rgb::new(0xff, 0x7f, 0x27), "Orange"),
    (Rgb::new(0xf6, 0xaa, 0x09), "Gold"),
    (Rgb::new(0xf9, 0xdd, 0x3b), "Yellow"),
    (Rgb::new(0xff, 0xfa, 0xbc), "Light Yellow"),
    (Rgb::new(0x0e, 0xb9, 0x68), "Dark Green"),
    (Rgb::new(0x13, 0xe6, 0x7b), "Green"),
    (Rgb::new(0x87, 0xff, 0x5e), "Light Green"),
    (Rgb::new(0x0c, 0x81, 0x6e), "Dark Teal"),
    (Rgb::new(0x10, 0xae, 0xa6), "Teal"),
    (Rgb::new(0x13, 0xe1, 0xbe), "Light Teal"),
    (Rgb::new(0x28, 0x50, 0x9e), "Dark Blue"),
    (Rgb::new(0x40, 0x93, 0xe4), "Blue"),
    (Rgb::new(0x60, 0xf7, 0xf2), "Cyan"),
    (Rgb::new(0x6b, 0x50, 0xf6), "Indigo"),
    (Rgb::new(0x99, 0xb1, 0xfb), "Light Indigo"),
    (Rgb::new(0x78, 0x0c, 0x99), "Dark Purple"),
    (Rgb::new(0xaa, 0x38, 0xb9), "Purple"),
    (Rgb::new(0xe0, 0x9f, 0xf9), "Light Purple"),
    (Rgb::new(0xcb, 0x00, 0x7a), "Dark Pink"),
    (Rgb::new(0xec, 0x1f, 0x80), "Pink"),
    (Rgb::new(0xf3, 0x8d, 0xa9), "Light Pink"),
    (Rgb::new(0x68, 0x46, 0x34), "Dark Brown"),
    (Rgb::new(0x95, 0x68, 0x2a), "Brown"),
    (Rgb::new(0xf8, 0xb2, 0x77), "Beige"),
];

const GRAYSCALE: &[(Rgb, &str)] = &[
    (Rgb::new(0x00, 0x00, 0x00), "Black"),
    (Rgb::new(0x3c, 0x3c, 0x3c), "Dark Gray"),
    (Rgb::new(0x78, 0x78, 0x78), "Gray"),
    (Rgb::new(0xd2, 0xd2, 0xd2), "Light Gray"),
    (Rgb::new(0xff, 0xff, 0xff), "White"),
];

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "wplace",
        description: "Free colors of the wplace canvas",
        colors: WPLACE_FREE,
    },
    Preset {
        name: "grayscale",
        description: "The five neutral tones of the wplace canvas",
        colors: GRAYSCALE,
    },
];

pub const DEFAULT_PRESET: &str = "wplace";

/// Look up a preset by name, ignoring ASCII case.
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
}

/// Name of `rgb` in the first preset that contains it.
pub fn color_name(rgb: Rgb) -> Option<&'static str> {
    PRESETS
        .iter()
        .flat_map(|p| p.colors.iter())
        .find(|&&(c, _)| c == rgb)
        .map(|&(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_find_preset() {
        assert_eq!(find_preset("wplace").map(|p| p.name), Some("wplace"));
        assert_eq!(find_preset(" GrayScale ").map(|p| p.name), Some("grayscale"));
        assert!(find_preset("nes").is_none());
    }

    #[test]
    fn test_default_preset_exists() {
        assert!(find_preset(DEFAULT_PRESET).is_some());
    }

    #[test]
    fn test_wplace_free_colors() {
        let palette = find_preset("wplace").unwrap().palette();
        assert_eq!(palette.len(), 31);
        assert_eq!(palette.get(0), Rgb::BLACK);
        assert_eq!(palette.get(6), Rgb::new(237, 28, 36));
        let unique: HashSet<Rgb> = palette.colors().iter().copied().collect();
        assert_eq!(unique.len(), 31);
    }

    #[test]
    fn test_color_name() {
        assert_eq!(color_name(Rgb::new(0x40, 0x93, 0xe4)), Some("Blue"));
        assert_eq!(color_name(Rgb::new(1, 2, 3)), None);
    }

    #[test]
    fn test_grayscale_is_neutral() {
        let palette = find_preset("grayscale").unwrap().palette();
        assert!(palette.colors().iter().all(|c| c.r == c.g && c.g == c.b));
    }
}
