//! Real Ahmedabad locations for realistic test fixtures.
//!
//! Coordinates are approximate city landmarks, spaced so that tests can
//! rely on which pairs fall inside or outside the 1 km coverage and 2 km
//! incident-proximity radii.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

// Old city cluster: all within ~1 km of each other.
pub const LAL_DARWAJA: Location = Location::new("Lal Darwaja", 23.0216, 72.5797);
pub const BHADRA_FORT: Location = Location::new("Bhadra Fort", 23.0239, 72.5798);
pub const MANEK_CHOWK: Location = Location::new("Manek Chowk", 23.0246, 72.5893);

// West bank cluster, ~2 km from the old city.
pub const ELLIS_BRIDGE: Location = Location::new("Ellis Bridge", 23.0225, 72.5714);
pub const LAW_GARDEN: Location = Location::new("Law Garden", 23.0276, 72.5640);
pub const NAVRANGPURA: Location = Location::new("Navrangpura", 23.0365, 72.5611);

// Southern and northern outliers, well beyond both radii.
pub const MANINAGAR: Location = Location::new("Maninagar", 22.9959, 72.6021);
pub const KANKARIA_LAKE: Location = Location::new("Kankaria Lake", 22.9960, 72.6019);
pub const SABARMATI_ASHRAM: Location = Location::new("Sabarmati Ashram", 23.0608, 72.5808);
pub const SARKHEJ_ROZA: Location = Location::new("Sarkhej Roza", 22.9891, 72.5018);

pub const OLD_CITY: &[Location] = &[LAL_DARWAJA, BHADRA_FORT, MANEK_CHOWK];
pub const WEST_BANK: &[Location] = &[ELLIS_BRIDGE, LAW_GARDEN, NAVRANGPURA];
