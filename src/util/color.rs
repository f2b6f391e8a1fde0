//! Color values and CSS color conversion.
//!
//! Packed colors use a single convention everywhere in the crate: a `u32`
//! holds `0xRRGGBBAA`, i.e. the big-endian reading of the four RGBA bytes.
//! Nothing depends on the platform byte order.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single color literal as it appears in plot documents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// Packed `0xRRGGBBAA`
    Packed(u32),
    /// `[r, g, b]` or `[r, g, b, a]` with bytes for r/g/b and alpha in [0, 1]
    Tuple(Vec<f64>),
    /// Named color, hex string or `rgb()`/`rgba()` function
    Css(String),
}

impl Color {
    pub fn css(value: impl Into<String>) -> Self {
        Color::Css(value.into())
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Color::Tuple(vec![r as f64, g as f64, b as f64, a])
    }

    /// Convert to RGBA bytes; `None` when the literal is not a color.
    pub fn to_rgba(&self) -> Option<[u8; 4]> {
        match self {
            Color::Packed(packed) => Some(decode_rgba(*packed)),
            Color::Tuple(channels) => tuple_to_rgba(channels),
            Color::Css(text) => parse_css(text),
        }
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Color::Css(value.to_string())
    }
}

/// Pack RGBA bytes into `0xRRGGBBAA`
#[inline]
pub fn encode_rgba(rgba: [u8; 4]) -> u32 {
    u32::from_be_bytes(rgba)
}

/// Unpack `0xRRGGBBAA` into RGBA bytes
#[inline]
pub fn decode_rgba(packed: u32) -> [u8; 4] {
    packed.to_be_bytes()
}

/// Convert an optional color to RGBA bytes; null and unparseable colors are
/// fully transparent.
pub fn color2rgba(color: Option<&Color>) -> [u8; 4] {
    color.and_then(Color::to_rgba).unwrap_or([0, 0, 0, 0])
}

/// CSS string for RGBA bytes with an extra alpha multiplier
pub fn color2css(rgba: [u8; 4], alpha: f64) -> String {
    let [r, g, b, a] = rgba;
    let a = (a as f64 / 255.0) * alpha;
    format!("rgba({r}, {g}, {b}, {})", format_alpha(a))
}

fn format_alpha(alpha: f64) -> String {
    let rounded = (alpha.clamp(0.0, 1.0) * 1000.0).round() / 1000.0;
    format!("{rounded}")
}

/// Check whether a JSON literal is a recognizable color
pub fn is_color(value: &serde_json::Value) -> bool {
    serde_json::from_value::<Color>(value.clone())
        .ok()
        .and_then(|color| color.to_rgba())
        .is_some()
}

fn tuple_to_rgba(channels: &[f64]) -> Option<[u8; 4]> {
    let byte = |v: f64| {
        if (0.0..=255.0).contains(&v) {
            Some(v.round() as u8)
        } else {
            None
        }
    };
    match channels {
        [r, g, b] => Some([byte(*r)?, byte(*g)?, byte(*b)?, 255]),
        [r, g, b, a] if (0.0..=1.0).contains(a) => {
            Some([byte(*r)?, byte(*g)?, byte(*b)?, (a * 255.0).round() as u8])
        }
        _ => None,
    }
}

/// Parse a CSS color string (named, `#rgb`, `#rgba`, `#rrggbb`,
/// `#rrggbbaa`, `rgb()`, `rgba()`).
pub fn parse_css(text: &str) -> Option<[u8; 4]> {
    let text = text.trim().to_ascii_lowercase();
    if text == "transparent" {
        return Some([0, 0, 0, 0]);
    }
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = text
        .strip_prefix("rgba(")
        .or_else(|| text.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_function(args);
    }
    NAMED_COLORS
        .get(text.as_str())
        .map(|rgb| decode_rgba((rgb << 8) | 0xff))
}

fn parse_hex(hex: &str) -> Option<[u8; 4]> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some([nibble(0)?, nibble(1)?, nibble(2)?, 255]),
        4 => Some([nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?]),
        6 => Some([pair(0)?, pair(2)?, pair(4)?, 255]),
        8 => Some([pair(0)?, pair(2)?, pair(4)?, pair(6)?]),
        _ => None,
    }
}

fn parse_rgb_function(args: &str) -> Option<[u8; 4]> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |s: &str| {
        let v: f64 = s.parse().ok()?;
        (0.0..=255.0).contains(&v).then(|| v.round() as u8)
    };
    match parts.as_slice() {
        [r, g, b] => Some([channel(r)?, channel(g)?, channel(b)?, 255]),
        [r, g, b, a] => {
            let a: f64 = a.parse().ok()?;
            if !(0.0..=1.0).contains(&a) {
                return None;
            }
            Some([channel(r)?, channel(g)?, channel(b)?, (a * 255.0).round() as u8])
        }
        _ => None,
    }
}

/// CSS named colors as `0xRRGGBB`
static NAMED_COLORS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    [
        ("aliceblue", 0xf0f8ff),
        ("antiquewhite", 0xfaebd7),
        ("aqua", 0x00ffff),
        ("aquamarine", 0x7fffd4),
        ("azure", 0xf0ffff),
        ("beige", 0xf5f5dc),
        ("bisque", 0xffe4c4),
        ("black", 0x000000),
        ("blanchedalmond", 0xffebcd),
        ("blue", 0x0000ff),
        ("blueviolet", 0x8a2be2),
        ("brown", 0xa52a2a),
        ("burlywood", 0xdeb887),
        ("cadetblue", 0x5f9ea0),
        ("chartreuse", 0x7fff00),
        ("chocolate", 0xd2691e),
        ("coral", 0xff7f50),
        ("cornflowerblue", 0x6495ed),
        ("cornsilk", 0xfff8dc),
        ("crimson", 0xdc143c),
        ("cyan", 0x00ffff),
        ("darkblue", 0x00008b),
        ("darkcyan", 0x008b8b),
        ("darkgoldenrod", 0xb8860b),
        ("darkgray", 0xa9a9a9),
        ("darkgreen", 0x006400),
        ("darkgrey", 0xa9a9a9),
        ("darkkhaki", 0xbdb76b),
        ("darkmagenta", 0x8b008b),
        ("darkolivegreen", 0x556b2f),
        ("darkorange", 0xff8c00),
        ("darkorchid", 0x9932cc),
        ("darkred", 0x8b0000),
        ("darksalmon", 0xe9967a),
        ("darkseagreen", 0x8fbc8f),
        ("darkslateblue", 0x483d8b),
        ("darkslategray", 0x2f4f4f),
        ("darkslategrey", 0x2f4f4f),
        ("darkturquoise", 0x00ced1),
        ("darkviolet", 0x9400d3),
        ("deeppink", 0xff1493),
        ("deepskyblue", 0x00bfff),
        ("dimgray", 0x696969),
        ("dimgrey", 0x696969),
        ("dodgerblue", 0x1e90ff),
        ("firebrick", 0xb22222),
        ("floralwhite", 0xfffaf0),
        ("forestgreen", 0x228b22),
        ("fuchsia", 0xff00ff),
        ("gainsboro", 0xdcdcdc),
        ("ghostwhite", 0xf8f8ff),
        ("gold", 0xffd700),
        ("goldenrod", 0xdaa520),
        ("gray", 0x808080),
        ("green", 0x008000),
        ("greenyellow", 0xadff2f),
        ("grey", 0x808080),
        ("honeydew", 0xf0fff0),
        ("hotpink", 0xff69b4),
        ("indianred", 0xcd5c5c),
        ("indigo", 0x4b0082),
        ("ivory", 0xfffff0),
        ("khaki", 0xf0e68c),
        ("lavender", 0xe6e6fa),
        ("lavenderblush", 0xfff0f5),
        ("lawngreen", 0x7cfc00),
        ("lemonchiffon", 0xfffacd),
        ("lightblue", 0xadd8e6),
        ("lightcoral", 0xf08080),
        ("lightcyan", 0xe0ffff),
        ("lightgoldenrodyellow", 0xfafad2),
        ("lightgray", 0xd3d3d3),
        ("lightgreen", 0x90ee90),
        ("lightgrey", 0xd3d3d3),
        ("lightpink", 0xffb6c1),
        ("lightsalmon", 0xffa07a),
        ("lightseagreen", 0x20b2aa),
        ("lightskyblue", 0x87cefa),
        ("lightslategray", 0x778899),
        ("lightslategrey", 0x778899),
        ("lightsteelblue", 0xb0c4de),
        ("lightyellow", 0xffffe0),
        ("lime", 0x00ff00),
        ("limegreen", 0x32cd32),
        ("linen", 0xfaf0e6),
        ("magenta", 0xff00ff),
        ("maroon", 0x800000),
        ("mediumaquamarine", 0x66cdaa),
        ("mediumblue", 0x0000cd),
        ("mediumorchid", 0xba55d3),
        ("mediumpurple", 0x9370db),
        ("mediumseagreen", 0x3cb371),
        ("mediumslateblue", 0x7b68ee),
        ("mediumspringgreen", 0x00fa9a),
        ("mediumturquoise", 0x48d1cc),
        ("mediumvioletred", 0xc71585),
        ("midnightblue", 0x191970),
        ("mintcream", 0xf5fffa),
        ("mistyrose", 0xffe4e1),
        ("moccasin", 0xffe4b5),
        ("navajowhite", 0xffdead),
        ("navy", 0x000080),
        ("oldlace", 0xfdf5e6),
        ("olive", 0x808000),
        ("olivedrab", 0x6b8e23),
        ("orange", 0xffa500),
        ("orangered", 0xff4500),
        ("orchid", 0xda70d6),
        ("palegoldenrod", 0xeee8aa),
        ("palegreen", 0x98fb98),
        ("paleturquoise", 0xafeeee),
        ("palevioletred", 0xdb7093),
        ("papayawhip", 0xffefd5),
        ("peachpuff", 0xffdab9),
        ("peru", 0xcd853f),
        ("pink", 0xffc0cb),
        ("plum", 0xdda0dd),
        ("powderblue", 0xb0e0e6),
        ("purple", 0x800080),
        ("rebeccapurple", 0x663399),
        ("red", 0xff0000),
        ("rosybrown", 0xbc8f8f),
        ("royalblue", 0x4169e1),
        ("saddlebrown", 0x8b4513),
        ("salmon", 0xfa8072),
        ("sandybrown", 0xf4a460),
        ("seagreen", 0x2e8b57),
        ("seashell", 0xfff5ee),
        ("sienna", 0xa0522d),
        ("silver", 0xc0c0c0),
        ("skyblue", 0x87ceeb),
        ("slateblue", 0x6a5acd),
        ("slategray", 0x708090),
        ("slategrey", 0x708090),
        ("snow", 0xfffafa),
        ("springgreen", 0x00ff7f),
        ("steelblue", 0x4682b4),
        ("tan", 0xd2b48c),
        ("teal", 0x008080),
        ("thistle", 0xd8bfd8),
        ("tomato", 0xff6347),
        ("turquoise", 0x40e0d0),
        ("violet", 0xee82ee),
        ("wheat", 0xf5deb3),
        ("white", 0xffffff),
        ("whitesmoke", 0xf5f5f5),
        ("yellow", 0xffff00),
        ("yellowgreen", 0x9acd32),
    ]
    .into_iter()
    .collect()
});
