//! Viewport recommendation
//!
//! Pure read+derive step, run once per render tick rather than once per
//! event, so render cadence stays decoupled from event arrival cadence.
//! The controller never mutates registry state.

use crate::core::{GeoPoint, VehicleId, ViewportTarget};
use crate::processing::vehicles::VehicleRegistry;
use crate::utils::EngineConfig;

/// Derive the recommended map focal point.
///
/// Precedence: an explicit pinned focus wins; otherwise auto-follow the
/// most-recently-updated vehicle if it still exists in the registry;
/// otherwise fall back to the configured venue center. Auto-follow and
/// pinned focus animate the transition; the venue fallback does not.
pub fn recommend(
    registry: &VehicleRegistry,
    pinned_focus: Option<GeoPoint>,
    most_recent: Option<&VehicleId>,
    config: &EngineConfig,
) -> ViewportTarget {
    if let Some(center) = pinned_focus {
        return ViewportTarget {
            center,
            zoom: config.default_zoom,
            animated: true,
        };
    }

    if let Some(state) = most_recent.and_then(|id| registry.get(id)) {
        if let Some(latest) = state.latest() {
            return ViewportTarget {
                center: latest.point,
                zoom: config.default_zoom,
                animated: true,
            };
        }
    }

    ViewportTarget {
        center: config.default_center,
        zoom: config.default_zoom,
        animated: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PositionSample;

    fn registry_with(id: &str, lat: f64, lng: f64) -> VehicleRegistry {
        let mut registry = VehicleRegistry::new();
        registry.apply_position(PositionSample {
            vehicle_id: id.into(),
            point: GeoPoint::new(lat, lng),
            seq: 1,
        });
        registry
    }

    #[test]
    fn test_pinned_focus_wins() {
        let registry = registry_with("42", 10.0, 20.0);
        let config = EngineConfig::default();
        let pinned = GeoPoint::new(1.0, 2.0);

        let target = recommend(&registry, Some(pinned), Some(&"42".into()), &config);
        assert_eq!(target.center, pinned);
        assert!(target.animated);
    }

    #[test]
    fn test_auto_follow_most_recent() {
        let registry = registry_with("42", 10.0, 20.0);
        let config = EngineConfig::default();

        let target = recommend(&registry, None, Some(&"42".into()), &config);
        assert_eq!(target.center, GeoPoint::new(10.0, 20.0));
        assert!(target.animated);
    }

    #[test]
    fn test_stale_most_recent_falls_back_to_venue() {
        // The most-recently-updated vehicle no longer exists in the
        // registry; the controller must not recenter on stale data
        let registry = VehicleRegistry::new();
        let config = EngineConfig::default();

        let target = recommend(&registry, None, Some(&"gone".into()), &config);
        assert_eq!(target.center, config.default_center);
        assert!(!target.animated);
    }

    #[test]
    fn test_empty_registry_uses_venue_default() {
        let registry = VehicleRegistry::new();
        let config = EngineConfig::default();

        let target = recommend(&registry, None, None, &config);
        assert_eq!(target.center, config.default_center);
        assert_eq!(target.zoom, config.default_zoom);
        assert!(!target.animated);
    }
}
