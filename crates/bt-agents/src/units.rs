//! Unit conversions between world meters and screen pixels.

/// 10 pixels per 30 cm.
pub const PIXEL_PER_METER: f32 = 10.0 / 0.3;

/// Default zombie run speed.
pub const RUN_SPEED_KMPH: f32 = 10.0;

/// Default boy walking speed.
pub const WALK_SPEED_KMPH: f32 = 6.0;

pub fn meters_to_pixels(meters: f32) -> f32 {
    meters * PIXEL_PER_METER
}

/// Converts km/h into pixels per second.
pub fn kmph_to_pps(kmph: f32) -> f32 {
    let meters_per_minute = kmph * 1000.0 / 60.0;
    let meters_per_second = meters_per_minute / 60.0;
    meters_per_second * PIXEL_PER_METER
}
