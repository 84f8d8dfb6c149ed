//! Text content of the overlay: the fixed location lines, the jittered
//! coordinate line and the Nairobi-local timestamp.

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Africa::Nairobi;
use rand::Rng;

/// Base coordinates the jitter stays near (Lavington, Nairobi). Only the
/// last two decimal digits vary per composition.
const LAT_BASE: &str = "-1.2799";
const LONG_BASE: &str = "36.7700";

/// Static text stamped onto every composition.
#[derive(Clone, Debug)]
pub struct OverlayContent {
    /// Title line plus the two address lines under it.
    pub location_lines: [String; 3],
    pub badge_label: String,
}

impl Default for OverlayContent {
    fn default() -> Self {
        Self {
            location_lines: [
                "Nairobi, Nairobi County, Kenya".to_string(),
                "Lavington Location Westlands Division Westlands".to_string(),
                "Constituency, Nairobi, Nairobi County , Kenya".to_string(),
            ],
            badge_label: "GPS Map Camera".to_string(),
        }
    }
}

/// Time source for the timestamp line, injected so compositions are
/// reproducible under test.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall clock used by the HTTP handlers.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Coordinate line with two fresh jitter digits per axis. Latitude is drawn
/// from the generator first.
pub fn coordinate_line<R: Rng>(rng: &mut R) -> String {
    let lat: u32 = rng.gen_range(0..100);
    let long: u32 = rng.gen_range(0..100);
    format!("Lat {LAT_BASE}{lat:02}\u{00b0} Long {LONG_BASE}{long:02}\u{00b0}")
}

/// `DD-MM-YYYY HH:MM +03:00` in Nairobi wall time. East Africa Time has no
/// daylight saving, so the fixed offset suffix is always correct.
pub fn timestamp_line(now_utc: DateTime<Utc>) -> String {
    let local = now_utc.with_timezone(&Nairobi);
    format!(
        "{:02}-{:02}-{} {:02}:{:02} +03:00",
        local.day(),
        local.month(),
        local.year(),
        local.hour(),
        local.minute()
    )
}
