//! Sequential color scales for the choropleth.

use log::warn;
use serde::Serialize;

/// Fill of the regions that have no value.
pub const NO_DATA_FILL: Rgb = Rgb(0xe6, 0xf3, 0xff);

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
        Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ColorScheme {
    Blues,
    Greens,
    Oranges,
    Purples,
    Reds,
    Viridis,
}

const BLUES: [Rgb; 9] = [
    Rgb(0xf7, 0xfb, 0xff),
    Rgb(0xde, 0xeb, 0xf7),
    Rgb(0xc6, 0xdb, 0xef),
    Rgb(0x9e, 0xca, 0xe1),
    Rgb(0x6b, 0xae, 0xd6),
    Rgb(0x42, 0x92, 0xc6),
    Rgb(0x21, 0x71, 0xb5),
    Rgb(0x08, 0x51, 0x9c),
    Rgb(0x08, 0x30, 0x6b),
];

const GREENS: [Rgb; 9] = [
    Rgb(0xf7, 0xfc, 0xf5),
    Rgb(0xe5, 0xf5, 0xe0),
    Rgb(0xc7, 0xe9, 0xc0),
    Rgb(0xa1, 0xd9, 0x9b),
    Rgb(0x74, 0xc4, 0x76),
    Rgb(0x41, 0xab, 0x5d),
    Rgb(0x23, 0x8b, 0x45),
    Rgb(0x00, 0x6d, 0x2c),
    Rgb(0x00, 0x44, 0x1b),
];

const ORANGES: [Rgb; 9] = [
    Rgb(0xff, 0xf5, 0xeb),
    Rgb(0xfe, 0xe6, 0xce),
    Rgb(0xfd, 0xd0, 0xa2),
    Rgb(0xfd, 0xae, 0x6b),
    Rgb(0xfd, 0x8d, 0x3c),
    Rgb(0xf1, 0x69, 0x13),
    Rgb(0xd9, 0x48, 0x01),
    Rgb(0xa6, 0x36, 0x03),
    Rgb(0x7f, 0x27, 0x04),
];

const PURPLES: [Rgb; 9] = [
    Rgb(0xfc, 0xfb, 0xfd),
    Rgb(0xef, 0xed, 0xf5),
    Rgb(0xda, 0xda, 0xeb),
    Rgb(0xbc, 0xbd, 0xdc),
    Rgb(0x9e, 0x9a, 0xc8),
    Rgb(0x80, 0x7d, 0xba),
    Rgb(0x6a, 0x51, 0xa3),
    Rgb(0x54, 0x27, 0x8f),
    Rgb(0x3f, 0x00, 0x7d),
];

const REDS: [Rgb; 9] = [
    Rgb(0xff, 0xf5, 0xf0),
    Rgb(0xfe, 0xe0, 0xd2),
    Rgb(0xfc, 0xbb, 0xa1),
    Rgb(0xfc, 0x92, 0x72),
    Rgb(0xfb, 0x6a, 0x4a),
    Rgb(0xef, 0x3b, 0x2c),
    Rgb(0xcb, 0x18, 0x1d),
    Rgb(0xa5, 0x0f, 0x15),
    Rgb(0x67, 0x00, 0x0d),
];

const VIRIDIS: [Rgb; 10] = [
    Rgb(0x44, 0x01, 0x54),
    Rgb(0x48, 0x28, 0x78),
    Rgb(0x3e, 0x49, 0x89),
    Rgb(0x31, 0x68, 0x8e),
    Rgb(0x26, 0x82, 0x8e),
    Rgb(0x1f, 0x9e, 0x89),
    Rgb(0x35, 0xb7, 0x79),
    Rgb(0x6e, 0xce, 0x58),
    Rgb(0xb5, 0xde, 0x2b),
    Rgb(0xfd, 0xe7, 0x25),
];

impl ColorScheme {
    /// Reads the name of a d3 interpolator. Unknown names fall back to Viridis.
    pub fn from_name(name: &str) -> ColorScheme {
        match name {
            "interpolateBlues" => ColorScheme::Blues,
            "interpolateGreens" => ColorScheme::Greens,
            "interpolateOranges" => ColorScheme::Oranges,
            "interpolatePurples" => ColorScheme::Purples,
            "interpolateReds" => ColorScheme::Reds,
            "interpolateViridis" => ColorScheme::Viridis,
            x => {
                warn!("Invalid color scheme {:?}, using interpolateViridis", x);
                ColorScheme::Viridis
            }
        }
    }

    fn stops(&self) -> &'static [Rgb] {
        match self {
            ColorScheme::Blues => &BLUES,
            ColorScheme::Greens => &GREENS,
            ColorScheme::Oranges => &ORANGES,
            ColorScheme::Purples => &PURPLES,
            ColorScheme::Reds => &REDS,
            ColorScheme::Viridis => &VIRIDIS,
        }
    }

    /// The color at position `t` in [0, 1]. Out of range positions are clamped.
    pub fn interpolate(&self, t: f64) -> Rgb {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let scaled = t * (stops.len() - 1) as f64;
        let idx = (scaled.floor() as usize).min(stops.len() - 2);
        Rgb::lerp(stops[idx], stops[idx + 1], scaled - idx as f64)
    }
}

/// Maps the extent of the values onto a color scheme.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct SequentialScale {
    pub scheme: ColorScheme,
    pub domain: (f64, f64),
}

impl SequentialScale {
    /// The domain is the extent of the values, or [0, 100] without values.
    pub fn from_values<I: IntoIterator<Item = f64>>(scheme: ColorScheme, values: I) -> Self {
        let domain = extent(values).unwrap_or((0.0, 100.0));
        SequentialScale { scheme, domain }
    }

    /// The position of a value within the domain.
    pub fn position(&self, value: f64) -> f64 {
        let (lo, hi) = self.domain;
        if hi == lo {
            0.0
        } else {
            (value - lo) / (hi - lo)
        }
    }

    pub fn color(&self, value: f64) -> Rgb {
        self.scheme.interpolate(self.position(value))
    }

    pub fn fill(&self, value: Option<f64>) -> Rgb {
        match value {
            Some(v) => self.color(v),
            None => NO_DATA_FILL,
        }
    }
}

/// Minimum and maximum of the finite values.
pub fn extent<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Min, middle and max of the displayed values, for the legend.
pub fn legend_stops<I: IntoIterator<Item = f64>>(values: I) -> Option<[f64; 3]> {
    extent(values).map(|(lo, hi)| [lo, (lo + hi) / 2.0, hi])
}
