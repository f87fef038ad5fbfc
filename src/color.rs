//! Colors and field-value color resolution.
//!
//! Resolution runs three stages: threshold steps, then value mappings, then a
//! palette fallback memoized per distinct value. Within a stage the last
//! match wins; a later stage only runs when the earlier ones found nothing.

use std::collections::HashMap;

use crate::frame::{Field, FieldConfig, FieldValue, ValueMapping};

/// RGBA color in linear space.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit channels.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Create an opaque color from a packed `0xRRGGBB` value.
    pub const fn hex(value: u32) -> Self {
        Self::rgb8((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Copy of the color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

/// Classic dashboard palette used for values without a configured color.
pub const DEFAULT_PALETTE: [Color; 32] = [
    Color::hex(0x7EB26D),
    Color::hex(0xEAB839),
    Color::hex(0x6ED0E0),
    Color::hex(0xEF843C),
    Color::hex(0xE24D42),
    Color::hex(0x1F78C1),
    Color::hex(0xBA43A9),
    Color::hex(0x705DA0),
    Color::hex(0x508642),
    Color::hex(0xCCA300),
    Color::hex(0x447EBC),
    Color::hex(0xC15C17),
    Color::hex(0x890F02),
    Color::hex(0x0A437C),
    Color::hex(0x6D1F62),
    Color::hex(0x584477),
    Color::hex(0xB7DBAB),
    Color::hex(0xF4D598),
    Color::hex(0x70DBED),
    Color::hex(0xF9BA8F),
    Color::hex(0xF29191),
    Color::hex(0x82B5D8),
    Color::hex(0xE5A8E2),
    Color::hex(0xAEA2E0),
    Color::hex(0x629E51),
    Color::hex(0xE5AC0E),
    Color::hex(0x64B0C8),
    Color::hex(0xE0752D),
    Color::hex(0xBF1B00),
    Color::hex(0x0A50A1),
    Color::hex(0x962D82),
    Color::hex(0x614D93),
];

// super-light, light, base, semi-dark, dark
const HUES: [(&str, [u32; 5]); 6] = [
    ("red", [0xFFA6B0, 0xFF7383, 0xF2495C, 0xE02F44, 0xC4162A]),
    ("orange", [0xFFCB7D, 0xFFB357, 0xFF9830, 0xFF780A, 0xFA6400]),
    ("yellow", [0xFFF899, 0xFFEE52, 0xFADE2A, 0xF2CC0C, 0xE0B400]),
    ("green", [0xC8F2C2, 0x96D98D, 0x73BF69, 0x56A64B, 0x37872D]),
    ("blue", [0xC0D8FF, 0x8AB8FF, 0x5794F2, 0x3274D9, 0x1F60C4]),
    ("purple", [0xDEB6F2, 0xCA95E5, 0xB877D9, 0xA352CC, 0x8F3BB8]),
];

/// Resolve a theme color name.
///
/// Accepts hex notation, `rgb()`/`rgba()`, `transparent`, and the named
/// hues with their `super-light-`, `light-`, `semi-dark-` and `dark-`
/// shades.
pub fn parse_color_name(name: &str) -> Option<Color> {
    let name = name.trim();
    if let Some(hex) = name.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = name.to_ascii_lowercase();
    if lower == "transparent" {
        return Some(Color::TRANSPARENT);
    }
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
    {
        return parse_rgb_args(args.strip_suffix(')')?);
    }
    let (shade, hue) = [
        ("super-light-", 0),
        ("light-", 1),
        ("semi-dark-", 3),
        ("dark-", 4),
    ]
    .iter()
    .find_map(|(prefix, shade)| lower.strip_prefix(prefix).map(|hue| (*shade, hue)))
    .unwrap_or((2, lower.as_str()));
    HUES.iter()
        .find(|(name, _)| *name == hue)
        .map(|(_, shades)| Color::hex(shades[shade]))
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digits = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    match hex.len() {
        3 => {
            let expand = |i: usize| digits(i..i + 1).map(|v| v * 17);
            Some(Color::rgb8(expand(0)?, expand(1)?, expand(2)?))
        }
        6 => Some(Color::rgb8(digits(0..2)?, digits(2..4)?, digits(4..6)?)),
        8 => Some(
            Color::rgb8(digits(0..2)?, digits(2..4)?, digits(4..6)?)
                .with_alpha(digits(6..8)? as f32 / 255.0),
        ),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |part: &str| part.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0) / 255.0);
    let alpha = match parts.get(3) {
        Some(part) => part.parse::<f32>().ok()?.clamp(0.0, 1.0),
        None => 1.0,
    };
    Some(Color::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}

/// Parse the leading integer of a string, ignoring trailing characters.
///
/// `"12.7"` and `"12ms"` give 12; a string without leading digits gives
/// `None`.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let magnitude = rest[..end].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Color from threshold steps: the last step whose bound is `<=` the value.
pub fn threshold_color(config: &FieldConfig, value: &FieldValue) -> Option<Color> {
    let steps = &config.thresholds.as_ref()?.steps;
    let number = parse_leading_int(&value.display())? as f64;
    let mut color = None;
    for step in steps {
        if step.value.is_none_or(|bound| number >= bound) {
            if let Some(resolved) = parse_color_name(&step.color) {
                color = Some(resolved);
            }
        }
    }
    color
}

/// Color from value mappings: the last mapping whose key equals the value.
pub fn mapping_color(config: &FieldConfig, value: &FieldValue) -> Option<Color> {
    let key = value.display();
    let mut color = None;
    for mapping in &config.mappings {
        let ValueMapping::Value { options } = mapping else {
            continue;
        };
        if let Some(resolved) = options
            .get(&key)
            .and_then(|result| result.color.as_deref())
            .and_then(parse_color_name)
        {
            color = Some(resolved);
        }
    }
    color
}

/// Palette colors memoized per distinct value, assigned in first-seen order.
///
/// The cache belongs to one panel and lives as long as it does. Entries are
/// never removed or changed once assigned.
#[derive(Debug, Clone)]
pub struct ColorCache {
    palette: Vec<Color>,
    assigned: HashMap<String, Color>,
}

impl ColorCache {
    /// Create a cache over the default palette.
    pub fn new() -> Self {
        Self::with_palette(DEFAULT_PALETTE.to_vec())
    }

    /// Create a cache over a custom palette.
    ///
    /// An empty palette falls back to the default one.
    pub fn with_palette(palette: Vec<Color>) -> Self {
        let palette = if palette.is_empty() {
            DEFAULT_PALETTE.to_vec()
        } else {
            palette
        };
        Self {
            palette,
            assigned: HashMap::new(),
        }
    }

    /// Color for a value, assigning the next palette entry on first sight.
    pub fn color_for(&mut self, key: &str) -> Color {
        if let Some(color) = self.assigned.get(key) {
            return *color;
        }
        let color = self.palette[self.assigned.len() % self.palette.len()];
        self.assigned.insert(key.to_string(), color);
        color
    }

    /// Number of distinct values seen.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    /// Check whether no value has been assigned yet.
    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }

    /// Forget all assignments.
    pub fn clear(&mut self) {
        self.assigned.clear();
    }
}

impl Default for ColorCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves the display color of a field value.
pub trait ColorResolver {
    /// Color for `value` read from `field`.
    fn resolve(&mut self, field: &Field, value: &FieldValue) -> Color;
}

impl<F> ColorResolver for F
where
    F: FnMut(&Field, &FieldValue) -> Color,
{
    fn resolve(&mut self, field: &Field, value: &FieldValue) -> Color {
        self(field, value)
    }
}

/// Default resolver: thresholds, then mappings, then the palette cache.
#[derive(Debug, Clone, Default)]
pub struct FieldColorResolver {
    cache: ColorCache,
}

impl FieldColorResolver {
    /// Create a resolver with an empty default-palette cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver over an existing cache.
    pub fn with_cache(cache: ColorCache) -> Self {
        Self { cache }
    }

    /// Access the fallback cache.
    pub fn cache(&self) -> &ColorCache {
        &self.cache
    }

    /// Forget all fallback assignments.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl ColorResolver for FieldColorResolver {
    fn resolve(&mut self, field: &Field, value: &FieldValue) -> Color {
        if let Some(color) = threshold_color(&field.config, value) {
            tracing::trace!(field = %field.name, value = %value.display(), "color from threshold");
            return color;
        }
        if let Some(color) = mapping_color(&field.config, value) {
            tracing::trace!(field = %field.name, value = %value.display(), "color from value mapping");
            return color;
        }
        tracing::trace!(field = %field.name, value = %value.display(), "color from palette");
        self.cache.color_for(&value.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Threshold, ThresholdsConfig};

    fn field(config: FieldConfig) -> Field {
        Field::new("_", Vec::<FieldValue>::new()).with_config(config)
    }

    fn thresholds(steps: Vec<Threshold>) -> FieldConfig {
        FieldConfig {
            thresholds: Some(ThresholdsConfig { steps }),
            mappings: Vec::new(),
        }
    }

    #[test]
    fn parses_theme_names() {
        assert_eq!(parse_color_name("#fff"), Some(Color::WHITE));
        assert_eq!(parse_color_name("#000000"), Some(Color::BLACK));
        assert_eq!(parse_color_name("green"), Some(Color::hex(0x73BF69)));
        assert_eq!(parse_color_name("dark-red"), Some(Color::hex(0xC4162A)));
        assert_eq!(parse_color_name("semi-dark-blue"), Some(Color::hex(0x3274D9)));
        assert_eq!(
            parse_color_name("rgba(255, 0, 0, 0.5)"),
            Some(Color::new(1.0, 0.0, 0.0, 0.5))
        );
        assert_eq!(parse_color_name("chartreuse"), None);
    }

    #[test]
    fn leading_int_matches_lenient_parsing() {
        assert_eq!(parse_leading_int("12.7"), Some(12));
        assert_eq!(parse_leading_int(" -4px"), Some(-4));
        assert_eq!(parse_leading_int("up"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn highest_applicable_threshold_wins() {
        let config = thresholds(vec![
            Threshold::base("green"),
            Threshold::new(50.0, "orange"),
            Threshold::new(80.0, "red"),
        ]);
        let color = |v: f64| threshold_color(&config, &FieldValue::from(v));
        assert_eq!(color(10.0), parse_color_name("green"));
        assert_eq!(color(50.0), parse_color_name("orange"));
        assert_eq!(color(99.0), parse_color_name("red"));
    }

    #[test]
    fn non_numeric_values_skip_thresholds() {
        let mut config = thresholds(vec![Threshold::base("green")]);
        config.mappings = vec![ValueMapping::colors([("down", "red")])];
        let mut resolver = FieldColorResolver::new();
        let down = resolver.resolve(&field(config.clone()), &FieldValue::from("down"));
        assert_eq!(Some(down), parse_color_name("red"));
        let other = resolver.resolve(&field(config), &FieldValue::from("other"));
        assert_eq!(other, DEFAULT_PALETTE[0]);
    }

    #[test]
    fn last_matching_mapping_wins() {
        let config = FieldConfig {
            thresholds: None,
            mappings: vec![
                ValueMapping::colors([("ok", "green")]),
                ValueMapping::Unsupported,
                ValueMapping::colors([("ok", "blue")]),
            ],
        };
        assert_eq!(
            mapping_color(&config, &FieldValue::from("ok")),
            parse_color_name("blue")
        );
    }

    #[test]
    fn threshold_match_blocks_mappings() {
        let mut config = thresholds(vec![Threshold::new(0.0, "yellow")]);
        config.mappings = vec![ValueMapping::colors([("5", "purple")])];
        let mut resolver = FieldColorResolver::new();
        let color = resolver.resolve(&field(config), &FieldValue::from(5_i64));
        assert_eq!(Some(color), parse_color_name("yellow"));
    }

    #[test]
    fn palette_fallback_is_memoized() {
        let mut resolver = FieldColorResolver::new();
        let plain = field(FieldConfig::default());
        let a = resolver.resolve(&plain, &FieldValue::from("a"));
        let b = resolver.resolve(&plain, &FieldValue::from("b"));
        let again = resolver.resolve(&plain, &FieldValue::from("a"));
        assert_eq!(a, again);
        assert_ne!(a, b);
        assert_eq!(resolver.cache().len(), 2);
    }

    #[test]
    fn palette_wraps_after_last_entry() {
        let mut cache = ColorCache::with_palette(vec![Color::BLACK, Color::WHITE]);
        assert_eq!(cache.color_for("x"), Color::BLACK);
        assert_eq!(cache.color_for("y"), Color::WHITE);
        assert_eq!(cache.color_for("z"), Color::BLACK);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.color_for("z"), Color::BLACK);
    }
}
