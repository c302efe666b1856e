//! Distance-to-time conversion for ride edges.

/// Network-wide average train speed, in km/h.
///
/// The model is a static average-speed approximation, not a timetable; this
/// value is the measured average for the source network.
pub const DEFAULT_AVG_SPEED_KMH: f64 = 34.0;

/// Fixed time penalty for changing lines at the same station, in minutes.
pub const TRANSFER_TIME_MINS: f64 = 0.3;

/// Fixed distance proxy attributed to a transfer edge, in kilometres.
///
/// Transfers cover no meaningful track distance; this constant keeps route
/// distance totals well-defined when a path changes lines.
pub const TRANSFER_DISTANCE_KM: f64 = 0.3;

/// Converts physical inter-station distances into ride-edge time weights.
///
/// Used only while the graph is being built. Transfer edges bypass the
/// conversion entirely and carry [`TRANSFER_TIME_MINS`] directly.
#[derive(Debug, Clone, Copy)]
pub struct Converter {
    average_speed_kmh: f64,
}

impl Converter {
    /// Create a converter with the given average speed in km/h.
    pub fn new(average_speed_kmh: f64) -> Self {
        Self { average_speed_kmh }
    }

    /// Travel time in minutes for a ride covering `distance_km`.
    pub fn ride_time_mins(&self, distance_km: f64) -> f64 {
        distance_km * 60.0 / self.average_speed_kmh
    }

    /// The configured average speed in km/h.
    pub fn average_speed_kmh(&self) -> f64 {
        self.average_speed_kmh
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(DEFAULT_AVG_SPEED_KMH)
    }
}
