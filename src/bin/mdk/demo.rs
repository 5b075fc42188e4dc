use clap::ValueEnum;
use serde::Deserialize;

use mdkernel::{HarmonicAngleForce, HarmonicBondForce, NonbondedForce, System, Vec3};

/// Built-in systems for `mdk run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Demo {
    /// Two argon atoms interacting through Lennard-Jones only
    #[default]
    ArgonPair,
    /// One flexible water molecule with stretched bonds
    Water,
}

impl Demo {
    pub fn label(self) -> &'static str {
        match self {
            Demo::ArgonPair => "argon pair",
            Demo::Water => "flexible water",
        }
    }
}

pub struct DemoSystem {
    pub system: System,
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
}

pub fn build(demo: Demo) -> DemoSystem {
    match demo {
        Demo::ArgonPair => argon_pair(),
        Demo::Water => water(),
    }
}

const ARGON_MASS: f64 = 39.948;
const ARGON_SIGMA: f64 = 0.3405;
const ARGON_EPSILON: f64 = 0.997_74;

fn argon_pair() -> DemoSystem {
    let mut system = System::new();
    let mut nonbonded = NonbondedForce::new();
    for _ in 0..2 {
        system.add_particle(ARGON_MASS);
        nonbonded.add_atom(0.0, ARGON_SIGMA, ARGON_EPSILON);
    }
    system.add_force(nonbonded);

    DemoSystem {
        system,
        positions: vec![[0.0, 0.0, 0.0], [0.42, 0.0, 0.0]],
        velocities: vec![[0.0; 3]; 2],
    }
}

const OH_LENGTH: f64 = 0.09572;
const OH_K: f64 = 462_750.4;
const HOH_ANGLE_DEG: f64 = 104.52;
const HOH_K: f64 = 836.8;

fn water() -> DemoSystem {
    let mut system = System::new();
    let o = system.add_particle(15.999);
    let h1 = system.add_particle(1.008);
    let h2 = system.add_particle(1.008);

    let mut bonds = HarmonicBondForce::new();
    bonds.add_bond(o, h1, OH_LENGTH, OH_K);
    bonds.add_bond(o, h2, OH_LENGTH, OH_K);
    system.add_force(bonds);

    let theta = HOH_ANGLE_DEG.to_radians();
    let mut angles = HarmonicAngleForce::new();
    angles.add_angle(h1, o, h2, theta, HOH_K);
    system.add_force(angles);

    let r = OH_LENGTH * 1.05;
    DemoSystem {
        system,
        positions: vec![
            [0.0, 0.0, 0.0],
            [r, 0.0, 0.0],
            [r * theta.cos(), r * theta.sin(), 0.0],
        ],
        velocities: vec![[0.0; 3]; 3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demos_have_consistent_sizes() {
        for demo in [Demo::ArgonPair, Demo::Water] {
            let built = build(demo);
            let n = built.system.num_particles();
            assert_eq!(built.positions.len(), n, "{}", demo.label());
            assert_eq!(built.velocities.len(), n, "{}", demo.label());
        }
    }

    #[test]
    fn demo_names_in_config_files() {
        #[derive(Deserialize)]
        struct Wrapper {
            system: Demo,
        }
        let parsed: Wrapper = toml::from_str(r#"system = "argon-pair""#).unwrap();
        assert_eq!(parsed.system, Demo::ArgonPair);
    }
}
