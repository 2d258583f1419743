//! Hex color codec.
//!
//! Watermark colors arrive as `#RRGGBB` or `#RGB` strings. Parsing never
//! fails: malformed input degrades to opaque black, and a non-hex digit
//! reads as zero. Use [`is_valid_hex_color`] to check a string up front.

use image::Rgba;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (always `0xFF` for parsed colors).
    pub a: u8,
}

impl Color {
    /// Opaque black, the fallback for malformed input.
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    /// Build an opaque color from its RGB channels.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba([c.r, c.g, c.b, c.a])
    }
}

/// Parse a `#RRGGBB` or `#RGB` string.
///
/// Any other length, or a string without a leading `#`, yields
/// [`Color::BLACK`]. In the short form each digit is expanded with
/// `nibble * 17`, so `#F80` becomes `(255, 136, 0)`.
#[must_use]
pub fn parse_hex_color(s: &str) -> Color {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'#') {
        return Color::BLACK;
    }

    match bytes.len() {
        7 => Color::opaque(
            byte_at(bytes, 1),
            byte_at(bytes, 3),
            byte_at(bytes, 5),
        ),
        4 => Color::opaque(
            nibble(bytes[1]) * 17,
            nibble(bytes[2]) * 17,
            nibble(bytes[3]) * 17,
        ),
        _ => Color::BLACK,
    }
}

/// Whether `s` is a well-formed `#RGB` or `#RRGGBB` string.
#[must_use]
pub fn is_valid_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.bytes().all(|b| b.is_ascii_hexdigit())
        }
        None => false,
    }
}

fn byte_at(bytes: &[u8], i: usize) -> u8 {
    (nibble(bytes[i]) << 4) | nibble(bytes[i + 1])
}

/// Decode one hex digit; anything else reads as 0.
fn nibble(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_form() {
        assert_eq!(parse_hex_color("#FF0000"), Color::opaque(255, 0, 0));
        assert_eq!(parse_hex_color("#00ff00"), Color::opaque(0, 255, 0));
        assert_eq!(parse_hex_color("#0000Ff"), Color::opaque(0, 0, 255));
        assert_eq!(parse_hex_color("#123456"), Color::opaque(0x12, 0x34, 0x56));
    }

    #[test]
    fn long_form_reproduces_every_channel_value() {
        for v in 0..=255u8 {
            let c = parse_hex_color(&format!("#{v:02X}{:02x}{v:02X}", 255 - v));
            assert_eq!(c, Color::opaque(v, 255 - v, v));
        }
        for r in (0..=255u8).step_by(17) {
            for g in (0..=255u8).step_by(51) {
                for b in (0..=255u8).step_by(15) {
                    let c = parse_hex_color(&format!("#{r:02x}{g:02x}{b:02x}"));
                    assert_eq!(c, Color::opaque(r, g, b));
                }
            }
        }
    }

    #[test]
    fn short_form_expands_nibbles() {
        assert_eq!(parse_hex_color("#FFF"), Color::opaque(255, 255, 255));
        assert_eq!(parse_hex_color("#abc"), Color::opaque(170, 187, 204));
        assert_eq!(parse_hex_color("#F80"), Color::opaque(255, 136, 0));
        for n in 0..16u8 {
            let digit = char::from_digit(u32::from(n), 16).unwrap();
            let c = parse_hex_color(&format!("#{digit}{digit}{digit}"));
            assert_eq!(c, Color::opaque(n * 17, n * 17, n * 17));
        }
    }

    #[test]
    fn malformed_input_is_opaque_black() {
        for s in ["", "#", "FF0000", "#FF00", "#FF00000", "red", "#12345"] {
            assert_eq!(parse_hex_color(s), Color::BLACK, "input {s:?}");
        }
        assert_eq!(Color::BLACK.a, 0xFF);
    }

    #[test]
    fn non_hex_digits_read_as_zero() {
        assert_eq!(parse_hex_color("#GG00FF"), Color::opaque(0, 0, 255));
        assert_eq!(parse_hex_color("#1Z0000"), Color::opaque(0x10, 0, 0));
        assert_eq!(parse_hex_color("#zzz"), Color::BLACK);
    }

    #[test]
    fn validity_check() {
        assert!(is_valid_hex_color("#fff"));
        assert!(is_valid_hex_color("#A0b1C2"));
        assert!(!is_valid_hex_color("#ggg"));
        assert!(!is_valid_hex_color("fff"));
        assert!(!is_valid_hex_color("#ffff"));
        assert!(!is_valid_hex_color(""));
    }

    #[test]
    fn converts_into_rgba_pixel() {
        let px: Rgba<u8> = Color::opaque(1, 2, 3).into();
        assert_eq!(px, Rgba([1, 2, 3, 255]));
    }
}
