//! All-pairs Coulomb and Lennard-Jones interactions.
//!
//! Pairs separated by one, two or three bonds are excluded from the pair
//! sum; the bond graph comes from every [`HarmonicBondForce`] in the system.
//! Explicit 1-4 records are evaluated separately with their own parameters
//! and are never cut off. With a cutoff, the Coulomb term is replaced by a
//! reaction field so that it vanishes at the cutoff distance.

use std::collections::{BTreeSet, VecDeque};

use super::error::{KernelError as ReferenceError, check_particles};
use crate::context::ContextView;
use crate::model::force::{
    AtomParams, Force, HarmonicBondForce, Nonbonded14Params, NonbondedForce, NonbondedMethod,
};
use crate::model::system::System;
use crate::model::vec3::{Vec3, accumulate, dot, scale, sub};
use crate::platform::kernel::{ForceKernel, KernelError};

/// Coulomb's constant, 1/(4π·ε₀), in kJ·nm/(mol·e²).
pub const ONE_4PI_EPS0: f64 = 138.935456;

/// Relative permittivity of the continuum beyond the cutoff.
pub const REACTION_FIELD_DIELECTRIC: f64 = 78.3;

/// Bonds separating the furthest excluded pair.
const EXCLUSION_DEPTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ReactionField {
    cutoff_squared: f64,
    krf: f64,
    crf: f64,
}

impl ReactionField {
    fn new(cutoff: f64) -> Self {
        let eps = REACTION_FIELD_DIELECTRIC;
        Self {
            cutoff_squared: cutoff * cutoff,
            krf: (eps - 1.0) / (2.0 * eps + 1.0) / cutoff.powi(3),
            crf: 3.0 * eps / (2.0 * eps + 1.0) / cutoff,
        }
    }
}

#[derive(Debug, Default)]
pub struct ReferenceCalcNonbondedForceKernel {
    atoms: Vec<AtomParams>,
    nb14s: Vec<Nonbonded14Params>,
    /// Sorted partners with a higher index than the particle itself.
    exclusions: Vec<BTreeSet<usize>>,
    reaction_field: Option<ReactionField>,
    /// Box edge lengths when periodic.
    periodic_box: Option<Vec3>,
}

impl ReferenceCalcNonbondedForceKernel {
    fn delta(&self, from: Vec3, to: Vec3) -> Vec3 {
        let mut d = sub(to, from);
        if let Some(edges) = self.periodic_box {
            for (component, edge) in d.iter_mut().zip(edges) {
                *component -= edge * (*component / edge).round();
            }
        }
        d
    }

    fn evaluate(&self, positions: &[Vec3], mut forces: Option<&mut [Vec3]>) -> f64 {
        let mut energy = 0.0;

        for i in 0..self.atoms.len() {
            for j in (i + 1)..self.atoms.len() {
                if self.exclusions[i].contains(&j) {
                    continue;
                }
                let delta = self.delta(positions[i], positions[j]);
                let r2 = dot(delta, delta);
                if r2 == 0.0 {
                    continue;
                }
                if let Some(rf) = self.reaction_field {
                    if r2 > rf.cutoff_squared {
                        continue;
                    }
                }

                let (a, b) = (self.atoms[i], self.atoms[j]);
                let r = r2.sqrt();
                let (coulomb, coulomb_de_dr) = self.coulomb(a.charge * b.charge, r);
                let (lj, lj_de_dr) = lennard_jones(
                    0.5 * (a.radius + b.radius),
                    (a.depth * b.depth).sqrt(),
                    r,
                );
                energy += coulomb + lj;

                if let Some(forces) = forces.as_deref_mut() {
                    apply_pair(forces, i, j, delta, (coulomb_de_dr + lj_de_dr) / r);
                }
            }
        }

        for pair in &self.nb14s {
            let delta = self.delta(positions[pair.particle1], positions[pair.particle2]);
            let r2 = dot(delta, delta);
            if r2 == 0.0 {
                continue;
            }
            let r = r2.sqrt();
            let coulomb = ONE_4PI_EPS0 * pair.charge / r;
            let (lj, lj_de_dr) = lennard_jones(pair.radius, pair.depth, r);
            energy += coulomb + lj;

            if let Some(forces) = forces.as_deref_mut() {
                let de_dr = -coulomb / r + lj_de_dr;
                apply_pair(forces, pair.particle1, pair.particle2, delta, de_dr / r);
            }
        }

        energy
    }

    /// Energy and its radial derivative for a charge product `qq` at `r`.
    fn coulomb(&self, qq: f64, r: f64) -> (f64, f64) {
        match self.reaction_field {
            Some(rf) => (
                ONE_4PI_EPS0 * qq * (1.0 / r + rf.krf * r * r - rf.crf),
                ONE_4PI_EPS0 * qq * (2.0 * rf.krf * r - 1.0 / (r * r)),
            ),
            None => {
                let e = ONE_4PI_EPS0 * qq / r;
                (e, -e / r)
            }
        }
    }
}

/// `4ε[(σ/r)¹² − (σ/r)⁶]` and its radial derivative.
fn lennard_jones(sigma: f64, epsilon: f64, r: f64) -> (f64, f64) {
    if epsilon == 0.0 || sigma == 0.0 {
        return (0.0, 0.0);
    }
    let sr6 = (sigma / r).powi(6);
    let sr12 = sr6 * sr6;
    (
        4.0 * epsilon * (sr12 - sr6),
        4.0 * epsilon * (6.0 * sr6 - 12.0 * sr12) / r,
    )
}

/// Applies a central pair force, where `delta` points from `i` to `j` and
/// `de_dr_over_r` is dE/dr divided by the distance.
fn apply_pair(forces: &mut [Vec3], i: usize, j: usize, delta: Vec3, de_dr_over_r: f64) {
    let f = scale(delta, de_dr_over_r);
    accumulate(&mut forces[i], f);
    accumulate(&mut forces[j], scale(f, -1.0));
}

/// For every particle, the higher-indexed particles within
/// [`EXCLUSION_DEPTH`] bonds of it.
fn bonded_exclusions(system: &System) -> Vec<BTreeSet<usize>> {
    let n = system.num_particles();
    let mut neighbours = vec![Vec::new(); n];
    let bonds = system.forces().iter().filter_map(|force| match force {
        Force::HarmonicBond(bonds) => Some(bonds),
        _ => None,
    });
    for bond in bonds.flat_map(HarmonicBondForce::bonds) {
        let (a, b) = (bond.particle1, bond.particle2);
        if a < n && b < n && a != b {
            neighbours[a].push(b);
            neighbours[b].push(a);
        }
    }

    let mut exclusions = vec![BTreeSet::new(); n];
    let mut depth = vec![usize::MAX; n];
    let mut queue = VecDeque::new();
    for start in 0..n {
        depth.fill(usize::MAX);
        depth[start] = 0;
        queue.clear();
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            if depth[current] == EXCLUSION_DEPTH {
                continue;
            }
            for &next in &neighbours[current] {
                if depth[next] == usize::MAX {
                    depth[next] = depth[current] + 1;
                    queue.push_back(next);
                    if next > start {
                        exclusions[start].insert(next);
                    }
                }
            }
        }
    }
    exclusions
}

impl ForceKernel<NonbondedForce> for ReferenceCalcNonbondedForceKernel {
    fn initialize(&mut self, system: &System, force: &NonbondedForce) -> Result<(), KernelError> {
        let n = system.num_particles();
        if force.num_atoms() != n {
            return Err(ReferenceError::AtomCountMismatch {
                expected: n,
                found: force.num_atoms(),
            }
            .into());
        }

        let mut exclusions = bonded_exclusions(system);
        for (index, pair) in force.nonbonded14s().iter().enumerate() {
            check_particles("1-4 pair", index, &[pair.particle1, pair.particle2], n)?;
            let (lo, hi) = if pair.particle1 < pair.particle2 {
                (pair.particle1, pair.particle2)
            } else {
                (pair.particle2, pair.particle1)
            };
            exclusions[lo].insert(hi);
        }

        let method = force.nonbonded_method();
        let cutoff = force.cutoff_distance();
        let periodic_box = match method {
            NonbondedMethod::CutoffPeriodic => {
                let edges = force.box_size();
                let half_box = 0.5 * edges.iter().copied().fold(f64::INFINITY, f64::min);
                if cutoff > half_box {
                    return Err(ReferenceError::CutoffTooLarge { cutoff, half_box }.into());
                }
                Some(edges)
            }
            _ => None,
        };

        self.atoms = force.atoms().to_vec();
        self.nb14s = force.nonbonded14s().to_vec();
        self.exclusions = exclusions;
        self.reaction_field = method.uses_cutoff().then(|| ReactionField::new(cutoff));
        self.periodic_box = periodic_box;
        log::debug!(
            "reference nonbonded kernel: {n} particles, {} 1-4 pairs, method {method}",
            self.nb14s.len()
        );
        Ok(())
    }

    fn execute_forces(
        &self,
        context: &ContextView<'_>,
        forces: &mut [Vec3],
    ) -> Result<(), KernelError> {
        self.evaluate(context.positions(), Some(forces));
        Ok(())
    }

    fn execute_energy(&self, context: &ContextView<'_>) -> Result<f64, KernelError> {
        Ok(self.evaluate(context.positions(), None))
    }
}
