use crate::core::data::colour::Colour;

/// Sector-based HSV to RGB conversion.
///
/// `hue` is in degrees and wraps into `[0, 360)`; `saturation` and `value`
/// are in `[0, 1]`. Channels are truncated to bytes.
#[must_use]
pub fn hsv_to_colour(hue: f64, saturation: f64, value: f64) -> Colour {
    let hue = hue.rem_euclid(360.0);
    let sector_position = hue / 60.0;
    let sector = (sector_position.floor() as u32) % 6;
    let fraction = sector_position - sector_position.floor();

    let v = value * 255.0;
    let p = channel(v * (1.0 - saturation));
    let q = channel(v * (1.0 - fraction * saturation));
    let t = channel(v * (1.0 - (1.0 - fraction) * saturation));
    let v = channel(v);

    match sector {
        0 => Colour::opaque(v, t, p),
        1 => Colour::opaque(q, v, p),
        2 => Colour::opaque(p, v, t),
        3 => Colour::opaque(p, q, v),
        4 => Colour::opaque(t, p, v),
        _ => Colour::opaque(v, p, q),
    }
}

fn channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}
