use crate::physics::{Planar, Planetoid, Vec2};

use super::rocket::{Rocket, RocketBuilder};

/// Source of freshly initialised rockets, one per simulated candidate.
///
/// Implemented for any `Fn() -> Rocket` closure and for a [`Rocket`] itself,
/// which acts as a prototype that is cloned on every call.
pub trait RocketFactory {
    fn build(&self) -> Rocket;
}

impl<F> RocketFactory for F
where
    F: Fn() -> Rocket,
{
    fn build(&self) -> Rocket {
        self()
    }
}

impl RocketFactory for Rocket {
    fn build(&self) -> Rocket {
        self.clone()
    }
}

// ---------------------------------------------------------------------------
// Preset vehicles
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Place a rocket on the pad at azimuth 0, moving with the surface.
    pub fn on_pad(builder: RocketBuilder, planetoid: &Planetoid) -> Rocket {
        let pad = planetoid.position + Vec2::rect(planetoid.radius, 0.0);
        builder
            .position(pad)
            .velocity(planetoid.surface_velocity(&pad))
            .build()
    }

    /// Single-stage orbiter: 10 t wet, 3 t dry, 200 kN, TWR ~2 on Kerbin.
    pub fn orbiter(planetoid: &Planetoid) -> Rocket {
        on_pad(
            RocketBuilder::new()
                .mass(10.0)
                .empty_mass(3.0)
                .max_thrust(200.0)
                .isp_vac(375.0)
                .isp_atm(325.0)
                .max_drag(0.2),
            planetoid,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_factory_builds_fresh_rockets() {
        let k = Planetoid::kerbin();
        let factory = || presets::orbiter(&k);
        let mut a = factory.build();
        let b = factory.build();
        a.consume(1.0);
        assert_ne!(a.mass, b.mass);
    }

    #[test]
    fn prototype_factory_clones() {
        let proto = RocketBuilder::new().mass(12.0).build();
        assert_eq!(proto.build(), proto);
    }

    #[test]
    fn pad_rocket_sits_on_surface() {
        let k = Planetoid::kerbin();
        let r = presets::orbiter(&k);
        assert_eq!(k.altitude(&r.position), 0.0);
        assert!((r.velocity.norm() - k.surface_velocity(&r.position).norm()).abs() < 1e-12);
    }
}
