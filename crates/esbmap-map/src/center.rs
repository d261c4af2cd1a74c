use esbmap_core::{Collection, GeoPoint, LocationRecord};

/// Regional default used when no point carries a usable coordinate.
pub const FALLBACK_CENTER: GeoPoint = GeoPoint {
    latitude: -6.2,
    longitude: 106.8,
};

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Mean latitude and mean longitude over every placeable ESB and Scraper
/// point.
///
/// Matches do not influence the center. Points failing
/// [`GeoPoint::is_valid`] are left out, the same points the layer builder
/// skips, so the result is always a valid coordinate. With no placeable
/// point the center is [`FALLBACK_CENTER`].
#[must_use]
pub fn center_of(esb: &Collection<LocationRecord>, scraper: &Collection<LocationRecord>) -> GeoPoint {
    let points = || {
        esb.iter()
            .chain(scraper.iter())
            .map(LocationRecord::point)
            .filter(GeoPoint::is_valid)
    };

    match (
        mean(points().map(|p| p.latitude)),
        mean(points().map(|p| p.longitude)),
    ) {
        (Some(latitude), Some(longitude)) => GeoPoint::new(latitude, longitude),
        _ => FALLBACK_CENTER,
    }
}
