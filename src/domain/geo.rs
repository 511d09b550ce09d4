// Geographic primitives shared by sites, traces and map layers

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Arithmetic mean of latitudes and longitudes, taken independently.
    /// Returns `None` for an empty input.
    pub fn centroid<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLon>,
    {
        let (count, lat_sum, lon_sum) = points
            .into_iter()
            .fold((0usize, 0.0, 0.0), |(n, lat, lon), p| (n + 1, lat + p.lat, lon + p.lon));

        if count == 0 {
            return None;
        }

        Some(Self::new(lat_sum / count as f64, lon_sum / count as f64))
    }

    pub fn as_pair(&self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}
