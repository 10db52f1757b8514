use crate::foundation::error::{LayoutError, LayoutResult};

/// Axis-aligned rectangle in canvas pixel space (top-left origin).
///
/// Serialized as `{x, y, width, height}`. Width and height are never negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width, `>= 0`.
    pub width: f64,
    /// Height, `>= 0`.
    pub height: f64,
}

impl Rect {
    /// Build a rect from its top-left corner and size; negative sizes clamp to zero.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Build a rect from its center point and size.
    pub fn from_center(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        Self::new(cx - width * 0.5, cy - height * 0.5, width, height)
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center.
    pub fn center_x(&self) -> f64 {
        self.x + self.width * 0.5
    }

    /// Vertical center.
    pub fn center_y(&self) -> f64 {
        self.y + self.height * 0.5
    }

    /// Shrink by `d` on every side (grow when `d` is negative).
    pub fn inset(&self, d: f64) -> Self {
        Self::new(
            self.x + d,
            self.y + d,
            self.width - 2.0 * d,
            self.height - 2.0 * d,
        )
    }

    /// Interior overlap test. Rects that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() <= other.x
            || other.right() <= self.x
            || self.bottom() <= other.y
            || other.bottom() <= self.y)
    }

    /// Whether `other` lies entirely within `self` (edges inclusive, to within rounding).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-6;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }
}

/// Print product geometry shared by every page of one book format.
///
/// The canvas is the trim size; bleed extends outward past it, the safe margin insets inward,
/// and the gutter is a vertical strip centered on the binding.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PrintFormat {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    /// Print resolution.
    pub dpi: u32,
    /// Bleed width beyond the trim edge, in pixels.
    pub bleed: f64,
    /// Safe margin inset from the trim edge, in pixels.
    pub margin: f64,
    /// Width of the central binding strip, in pixels.
    pub gutter: f64,
}

impl Default for PrintFormat {
    fn default() -> Self {
        Self::SQUARE_SPREAD
    }
}

impl PrintFormat {
    /// Two 6in square pages side by side at 300 dpi.
    pub const SQUARE_SPREAD: PrintFormat = PrintFormat {
        width: 3600.0,
        height: 1800.0,
        dpi: 300,
        bleed: 38.0,
        margin: 75.0,
        gutter: 150.0,
    };

    /// Check the geometric invariants every layout relies on.
    pub fn validate(&self) -> LayoutResult<()> {
        let finite = [self.width, self.height, self.bleed, self.margin, self.gutter]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(LayoutError::validation(
                "print format values must be finite",
            ));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(LayoutError::validation(
                "print format canvas must be > 0 in both dimensions",
            ));
        }
        if self.dpi == 0 {
            return Err(LayoutError::validation("print format dpi must be > 0"));
        }
        if self.bleed < 0.0 || self.margin < 0.0 || self.gutter < 0.0 {
            return Err(LayoutError::validation(
                "print format bleed, margin and gutter must be >= 0",
            ));
        }
        if self.margin * 2.0 >= self.width || self.margin * 2.0 >= self.height {
            return Err(LayoutError::validation(
                "print format margin leaves no safe area",
            ));
        }
        if self.gutter >= self.width - self.margin * 2.0 {
            return Err(LayoutError::validation(
                "print format gutter must be narrower than the safe area",
            ));
        }
        Ok(())
    }

    /// The trim-size canvas rectangle.
    pub fn canvas_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Canvas inset by the safe margin.
    pub fn safe_rect(&self) -> Rect {
        self.canvas_rect().inset(self.margin)
    }

    /// Canvas grown outward by the bleed.
    pub fn bleed_rect(&self) -> Rect {
        self.canvas_rect().inset(-self.bleed)
    }

    /// Full-height strip of `gutter` width centered on the binding.
    pub fn gutter_rect(&self) -> Rect {
        Rect::new(
            (self.width - self.gutter) * 0.5,
            0.0,
            self.gutter,
            self.height,
        )
    }
}

/// Straight-alpha RGBA8 colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Rgba8 = Rgba8::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Rgba8 = Rgba8::rgb(255, 255, 255);

    /// Opaque colour from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (case-insensitive, `#` optional).
    pub fn parse_hex(s: &str) -> LayoutResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> LayoutResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| LayoutError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        if !s.is_ascii() {
            return Err(LayoutError::validation("hex colour must be ASCII"));
        }
        match s.len() {
            6 => Ok(Self::rgb(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            8 => Ok(Self {
                r: hex_byte(&s[0..2])?,
                g: hex_byte(&s[2..4])?,
                b: hex_byte(&s[4..6])?,
                a: hex_byte(&s[6..8])?,
            }),
            _ => Err(LayoutError::validation(
                "hex colour must be #RRGGBB or #RRGGBBAA",
            )),
        }
    }

    /// Parse a hex colour, falling back to `fallback` when the string is malformed.
    pub fn parse_or(s: &str, fallback: Rgba8) -> Self {
        match Self::parse_hex(s) {
            Ok(c) => c,
            Err(err) => {
                tracing::debug!(colour = s, %err, "unparseable colour, using fallback");
                fallback
            }
        }
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Premultiplied channel bytes.
    pub fn premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            (((u16::from(c) * u16::from(a)) + 127) / 255) as u8
        }
        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
