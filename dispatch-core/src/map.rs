use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

pub const DEFAULT_HEADQUARTERS: LatLng = LatLng {
    lat: 30.627977,
    lng: -96.334407,
};

/// Pins handed to the external map widget.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapPins {
    pub center: LatLng,
    pub incident: Option<LatLng>,
    pub headquarters: LatLng,
}

impl MapPins {
    pub fn new(lat: Option<f64>, lng: Option<f64>, headquarters: LatLng) -> Self {
        let incident = match (lat, lng) {
            (Some(lat), Some(lng)) => Some(LatLng { lat, lng }),
            _ => None,
        };
        let center = match (lat, incident) {
            (Some(_), Some(pin)) => pin,
            _ => headquarters,
        };
        Self {
            center,
            incident,
            headquarters,
        }
    }

    /// OpenStreetMap embed centered on `center`, with a marker on the incident
    /// (or headquarters when the incident has no coordinates).
    pub fn embed_url(&self, zoom: u8) -> String {
        let span = 360.0 / 2f64.powi(i32::from(zoom.clamp(1, 19))) * 2.0;
        let half = span / 2.0;
        let marker = self.incident.unwrap_or(self.headquarters);
        format!(
            "https://www.openstreetmap.org/export/embed.html?bbox={:.6}%2C{:.6}%2C{:.6}%2C{:.6}&layer=mapnik&marker={:.6}%2C{:.6}",
            self.center.lng - half,
            self.center.lat - half / 2.0,
            self.center.lng + half,
            self.center.lat + half / 2.0,
            marker.lat,
            marker.lng,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_on_incident_when_located() {
        let pins = MapPins::new(Some(30.6), Some(-96.3), DEFAULT_HEADQUARTERS);
        assert_eq!(pins.center, LatLng { lat: 30.6, lng: -96.3 });
        assert_eq!(pins.incident, Some(LatLng { lat: 30.6, lng: -96.3 }));
        assert_eq!(pins.headquarters, DEFAULT_HEADQUARTERS);
    }

    #[test]
    fn falls_back_to_headquarters() {
        let pins = MapPins::new(None, Some(-96.3), DEFAULT_HEADQUARTERS);
        assert_eq!(pins.center, DEFAULT_HEADQUARTERS);
        assert_eq!(pins.incident, None);
    }

    #[test]
    fn embed_url_marks_incident() {
        let pins = MapPins::new(Some(30.5), Some(-96.25), DEFAULT_HEADQUARTERS);
        let url = pins.embed_url(15);
        assert!(url.starts_with("https://www.openstreetmap.org/export/embed.html?bbox="));
        assert!(url.ends_with("marker=30.500000%2C-96.250000"));
    }
}
