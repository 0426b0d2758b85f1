//! Static search areas for Metro Vancouver
//!
//! Each named area has a fixed reference point and radius. The same values
//! bias the upstream search and drive the local distance filter.

use super::GeoPoint;

/// A named search region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    /// Identifier matching the serialized `AreaFilter` value
    pub id: &'static str,
    /// Human-readable name of the area
    pub name: &'static str,
    /// Place name appended to upstream text queries
    pub query_label: &'static str,
    /// Reference point distances are measured from
    pub center: GeoPoint,
    /// Maximum distance from `center` for a venue to count as inside
    pub radius_km: f64,
}

impl Area {
    pub fn radius_meters(&self) -> u32 {
        (self.radius_km * 1000.0).round() as u32
    }
}

/// The four named areas
pub static AREAS: [Area; 4] = [
    Area {
        id: "downtown",
        name: "Downtown Vancouver",
        query_label: "Downtown Vancouver",
        center: GeoPoint::new(49.2827, -123.1207),
        radius_km: 5.0,
    },
    Area {
        id: "north_shore",
        name: "North Shore",
        query_label: "North Vancouver",
        center: GeoPoint::new(49.3200, -123.0724),
        radius_km: 10.0,
    },
    Area {
        id: "richmond",
        name: "Richmond",
        query_label: "Richmond BC",
        center: GeoPoint::new(49.1666, -123.1336),
        radius_km: 8.0,
    },
    Area {
        id: "burnaby",
        name: "Burnaby",
        query_label: "Burnaby BC",
        center: GeoPoint::new(49.2488, -122.9805),
        radius_km: 8.0,
    },
];

/// Search region used when no area filter is active
///
/// Wide enough to cover all four named areas.
pub static METRO_VANCOUVER: Area = Area {
    id: "all",
    name: "Metro Vancouver",
    query_label: "Vancouver BC",
    center: GeoPoint::new(49.2827, -123.1207),
    radius_km: 50.0,
};

/// Get an area by its ID
pub fn get_area_by_id(id: &str) -> Option<&'static Area> {
    AREAS.iter().find(|area| area.id == id)
}

/// Get all named areas
pub fn all_areas() -> &'static [Area] {
    &AREAS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_areas_array_has_4_entries() {
        assert_eq!(all_areas().len(), 4);
    }

    #[test]
    fn test_each_area_has_metro_vancouver_coordinates() {
        for area in all_areas() {
            assert!(
                (49.0..=49.5).contains(&area.center.lat),
                "Area {} has invalid latitude: {}",
                area.name,
                area.center.lat
            );
            assert!(
                (-123.3..=-122.8).contains(&area.center.lng),
                "Area {} has invalid longitude: {}",
                area.name,
                area.center.lng
            );
        }
    }

    #[test]
    fn test_get_area_by_id() {
        let area = get_area_by_id("north_shore").expect("north_shore should exist");
        assert_eq!(area.name, "North Shore");
        assert!(get_area_by_id("all").is_none());
        assert!(get_area_by_id("Downtown").is_none()); // Case sensitive
    }

    #[test]
    fn test_radius_meters() {
        let area = get_area_by_id("richmond").unwrap();
        assert_eq!(area.radius_meters(), 8000);
        assert_eq!(METRO_VANCOUVER.radius_meters(), 50_000);
    }

    #[test]
    fn test_all_areas_have_unique_ids() {
        let mut ids: Vec<&str> = all_areas().iter().map(|a| a.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), AREAS.len(), "Area IDs are not unique");
    }
}
