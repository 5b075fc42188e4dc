use super::error::{Error, check_index};
use super::force::Force;

/// Particles and the forces acting on them.
///
/// A [`SimulationContext`](crate::SimulationContext) borrows the system for
/// its whole lifetime, so changes made here only take effect in contexts
/// created afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct System {
    masses: Vec<f64>,
    forces: Vec<Force>,
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a particle with the given mass in amu and returns its index.
    ///
    /// A mass of zero marks the particle as fixed in space.
    pub fn add_particle(&mut self, mass: f64) -> usize {
        self.masses.push(mass);
        self.masses.len() - 1
    }

    #[inline]
    pub fn num_particles(&self) -> usize {
        self.masses.len()
    }

    #[inline]
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    pub fn particle_mass(&self, index: usize) -> Result<f64, Error> {
        let index = check_index("particle", index, self.masses.len())?;
        Ok(self.masses[index])
    }

    pub fn set_particle_mass(&mut self, index: usize, mass: f64) -> Result<(), Error> {
        let index = check_index("particle", index, self.masses.len())?;
        self.masses[index] = mass;
        Ok(())
    }

    /// Adds a force and returns its index.
    pub fn add_force(&mut self, force: impl Into<Force>) -> usize {
        self.forces.push(force.into());
        self.forces.len() - 1
    }

    #[inline]
    pub fn num_forces(&self) -> usize {
        self.forces.len()
    }

    #[inline]
    pub fn forces(&self) -> &[Force] {
        &self.forces
    }

    pub fn force(&self, index: usize) -> Result<&Force, Error> {
        let index = check_index("force", index, self.forces.len())?;
        Ok(&self.forces[index])
    }

    pub fn force_mut(&mut self, index: usize) -> Result<&mut Force, Error> {
        let index = check_index("force", index, self.forces.len())?;
        Ok(&mut self.forces[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::force::{HarmonicBondForce, NonbondedForce};

    #[test]
    fn particles_and_forces_are_indexed_in_order() {
        let mut system = System::new();
        assert_eq!(system.add_particle(39.948), 0);
        assert_eq!(system.add_particle(39.948), 1);
        assert_eq!(system.add_force(NonbondedForce::with_counts(2, 0)), 0);
        assert_eq!(system.add_force(HarmonicBondForce::new()), 1);

        assert_eq!(system.num_particles(), 2);
        assert_eq!(system.num_forces(), 2);
        assert_eq!(system.force(1).unwrap().name(), "HarmonicBondForce");
    }

    #[test]
    fn mass_accessors_are_bounds_checked() {
        let mut system = System::new();
        system.add_particle(1.008);
        system.set_particle_mass(0, 2.014).unwrap();
        assert_eq!(system.particle_mass(0).unwrap(), 2.014);
        assert!(system.particle_mass(1).is_err());
        assert!(system.set_particle_mass(1, 1.0).is_err());
        assert!(system.force(0).is_err());
    }

    #[test]
    fn force_mut_edits_in_place() {
        let mut system = System::new();
        system.add_force(HarmonicBondForce::new());
        if let Force::HarmonicBond(bonds) = system.force_mut(0).unwrap() {
            bonds.add_bond(0, 1, 0.1, 100.0);
        }
        match system.force(0).unwrap() {
            Force::HarmonicBond(bonds) => assert_eq!(bonds.num_bonds(), 1),
            other => panic!("unexpected force {}", other.name()),
        }
    }
}
