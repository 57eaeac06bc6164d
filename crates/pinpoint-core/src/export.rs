//! Location export helpers shared by all front ends.

use serde_json::json;

use crate::models::Location;

/// Render locations as pretty-printed JSON, in the snapshot record format.
pub fn render_json_export(locations: &[Location]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(locations)
}

/// Render locations as a GeoJSON `FeatureCollection` of points.
///
/// GeoJSON positions are `[longitude, latitude]`, the reverse of the
/// snapshot's `[lat, lng]`.
pub fn render_geojson_export(locations: &[Location]) -> serde_json::Result<String> {
    let features = locations
        .iter()
        .map(|location| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [location.coords.lng, location.coords.lat],
                },
                "properties": {
                    "id": location.id,
                    "type": location.kind,
                    "notes": location.notes,
                    "created_at": location.created_at,
                },
            })
        })
        .collect::<Vec<_>>();

    serde_json::to_string_pretty(&json!({
        "type": "FeatureCollection",
        "features": features,
    }))
}
