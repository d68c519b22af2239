//! The authored solar system: construction-time literals, scaled from
//! Earth's parameters.
//!
//! Rates are visualization rates, not ephemerides. Earth spins a few times
//! per second of wall clock and everything else scales off that, which keeps
//! the outer planets visibly moving.

use crate::body::BodyParams;
use crate::system::{SceneBuildError, SolarSystem, SolarSystemBuilder};

/// Earth's spin rate, radians per second.
pub const EARTH_ROTATION: f32 = std::f32::consts::PI * 5.0;
/// Earth's axial tilt, radians (23.5°).
pub const EARTH_AXIAL_TILT: f32 = 0.410_152_4;
/// Earth's uniform scale; other bodies are relative to this.
pub const EARTH_SCALE: f32 = 1.0;
/// Earth's orbit radius in scene units.
pub const EARTH_ORBITAL_DISTANCE: f32 = 200.0;
/// Earth's orbit sweep rate: one revolution per 365 spins.
pub const EARTH_REVOLUTION: f32 = EARTH_ROTATION / 365.0;

struct CatalogEntry {
    name: &'static str,
    texture: &'static str,
    rotation_rate: f32,
    axial_tilt: f32,
    orbital_distance: f32,
    scale: f32,
    revolution_rate: f32,
}

/// Builds the full authored system: the sun at the origin, nine planets
/// orbiting it, and the moon orbiting Earth. Returns an error only if the
/// catalog itself breaks the parent-ordering invariant, which a test pins.
pub fn build_solar_system() -> Result<SolarSystem, SceneBuildError> {
    let planets = [
        CatalogEntry {
            name: "Mercury",
            texture: "mercurymap.jpg",
            rotation_rate: EARTH_ROTATION * 0.017,
            axial_tilt: 0.0,
            orbital_distance: EARTH_ORBITAL_DISTANCE * 0.387,
            scale: EARTH_SCALE * 0.382,
            revolution_rate: EARTH_REVOLUTION * 4.149,
        },
        CatalogEntry {
            name: "Venus",
            texture: "venusmap.jpg",
            rotation_rate: EARTH_ROTATION * 0.004,
            axial_tilt: EARTH_AXIAL_TILT * 0.959,
            orbital_distance: EARTH_ORBITAL_DISTANCE * 0.723,
            scale: EARTH_SCALE * 0.949,
            revolution_rate: EARTH_REVOLUTION * 1.624,
        },
        CatalogEntry {
            name: "Earth",
            texture: "earthmap.jpg",
            rotation_rate: EARTH_ROTATION,
            axial_tilt: EARTH_AXIAL_TILT,
            orbital_distance: EARTH_ORBITAL_DISTANCE,
            scale: EARTH_SCALE,
            revolution_rate: EARTH_REVOLUTION,
        },
        CatalogEntry {
            name: "Mars",
            texture: "marsmap.jpg",
            rotation_rate: EARTH_ROTATION,
            axial_tilt: 0.4392,
            orbital_distance: EARTH_ORBITAL_DISTANCE * 1.524,
            scale: EARTH_SCALE * 0.532,
            revolution_rate: EARTH_REVOLUTION * 0.531,
        },
        CatalogEntry {
            name: "Jupiter",
            texture: "jupitermap.jpg",
            rotation_rate: EARTH_ROTATION * 2.4,
            axial_tilt: 0.05352,
            orbital_distance: EARTH_ORBITAL_DISTANCE * 5.203,
            scale: EARTH_SCALE * 11.19,
            revolution_rate: EARTH_REVOLUTION * 0.084,
        },
        CatalogEntry {
            name: "Saturn",
            texture: "saturnmap.jpg",
            rotation_rate: EARTH_ROTATION * 2.3,
            axial_tilt: 0.4712,
            orbital_distance: EARTH_ORBITAL_DISTANCE * 9.582,
            scale: EARTH_SCALE * 9.26,
            revolution_rate: EARTH_REVOLUTION * 0.034,
        },
        CatalogEntry {
            name: "Uranus",
            texture: "uranusmap.jpg",
            rotation_rate: EARTH_ROTATION * 1.39,
            axial_tilt: 1.6927,
            orbital_distance: EARTH_ORBITAL_DISTANCE * 19.20,
            scale: EARTH_SCALE * 4.01,
            revolution_rate: EARTH_REVOLUTION * 0.011,
        },
        CatalogEntry {
            name: "Neptune",
            texture: "neptunemap.jpg",
            rotation_rate: EARTH_ROTATION * 1.489,
            axial_tilt: 0.5166,
            orbital_distance: EARTH_ORBITAL_DISTANCE * 30.5,
            scale: EARTH_SCALE * 3.88,
            revolution_rate: EARTH_REVOLUTION * 0.0061,
        },
        CatalogEntry {
            name: "Pluto",
            texture: "plutomap.jpg",
            rotation_rate: EARTH_ROTATION * 0.156,
            axial_tilt: 2.129,
            orbital_distance: EARTH_ORBITAL_DISTANCE * 39.48,
            scale: EARTH_SCALE * 0.18,
            revolution_rate: EARTH_REVOLUTION * 0.004,
        },
    ];

    let mut builder = SolarSystemBuilder::new();

    // The sun emits light rather than receiving it, so it renders unlit.
    builder.add_body(BodyParams {
        name: "Sun".to_string(),
        texture: "sunmap.jpg".to_string(),
        rotation_rate: EARTH_ROTATION * 0.037,
        revolution_rate: 0.0,
        axial_tilt: 0.0,
        orbital_distance: 0.0,
        scale: EARTH_SCALE * 15.0,
        parent: None,
        lit: false,
    })?;

    let mut earth = None;
    for entry in planets {
        let id = builder.add_body(BodyParams {
            name: entry.name.to_string(),
            texture: entry.texture.to_string(),
            rotation_rate: entry.rotation_rate,
            revolution_rate: entry.revolution_rate,
            axial_tilt: entry.axial_tilt,
            orbital_distance: entry.orbital_distance,
            scale: entry.scale,
            parent: None,
            lit: true,
        })?;
        if entry.name == "Earth" {
            earth = Some(id);
        }
    }

    // The moon is the one body with an explicit parent; the planets orbit
    // the origin, where the sun sits.
    if let Some(earth) = earth {
        builder.add_body(BodyParams {
            name: "Moon".to_string(),
            texture: "moonmap.jpg".to_string(),
            rotation_rate: EARTH_REVOLUTION * 12.0,
            revolution_rate: EARTH_REVOLUTION * 12.0,
            axial_tilt: 0.0,
            orbital_distance: EARTH_ORBITAL_DISTANCE * 0.05,
            scale: EARTH_SCALE / 20.0,
            parent: Some(earth),
            lit: true,
        })?;
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_builds() {
        let system = build_solar_system().unwrap();
        // Sun + nine planets + the moon.
        assert_eq!(system.len(), 11);
    }

    #[test]
    fn test_catalog_parent_ordering_holds() {
        let system = build_solar_system().unwrap();
        for (i, body) in system.bodies().iter().enumerate() {
            if let Some(parent) = body.parent() {
                assert!(parent.index() < i, "{} has a forward parent", body.name());
            }
        }
    }

    #[test]
    fn test_only_the_sun_is_unlit() {
        let system = build_solar_system().unwrap();
        let unlit: Vec<&str> = system
            .bodies()
            .iter()
            .filter(|b| !b.lit())
            .map(|b| b.name())
            .collect();
        assert_eq!(unlit, vec!["Sun"]);
    }

    #[test]
    fn test_moon_orbits_earth() {
        let system = build_solar_system().unwrap();
        let moon = system
            .bodies()
            .iter()
            .find(|b| b.name() == "Moon")
            .unwrap();
        let parent = moon.parent().unwrap();
        assert_eq!(system.body(parent).name(), "Earth");
    }
}
