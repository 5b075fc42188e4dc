//! Bonded terms: harmonic bonds, harmonic angles and periodic torsions.

use super::error::check_particles;
use crate::context::ContextView;
use crate::model::force::{
    AngleParams, BondParams, HarmonicAngleForce, HarmonicBondForce, PeriodicTorsionForce,
    TorsionParams,
};
use crate::model::system::System;
use crate::model::vec3::{Vec3, accumulate, add, cross, dot, norm, scale, sub};
use crate::platform::kernel::{ForceKernel, KernelError};

/// Below this the angle between two bond vectors is treated as linear and
/// its forces are skipped.
const LINEAR_EPSILON: f64 = 1e-12;

#[derive(Debug, Default)]
pub struct ReferenceCalcHarmonicBondForceKernel {
    bonds: Vec<BondParams>,
}

impl ReferenceCalcHarmonicBondForceKernel {
    fn evaluate(&self, positions: &[Vec3], mut forces: Option<&mut [Vec3]>) -> f64 {
        let mut energy = 0.0;
        for bond in &self.bonds {
            let delta = sub(positions[bond.particle2], positions[bond.particle1]);
            let r = norm(delta);
            let stretch = r - bond.length;
            energy += 0.5 * bond.k * stretch * stretch;

            if let Some(forces) = forces.as_deref_mut() {
                if r > 0.0 {
                    let f = scale(delta, bond.k * stretch / r);
                    accumulate(&mut forces[bond.particle1], f);
                    accumulate(&mut forces[bond.particle2], scale(f, -1.0));
                }
            }
        }
        energy
    }
}

impl ForceKernel<HarmonicBondForce> for ReferenceCalcHarmonicBondForceKernel {
    fn initialize(
        &mut self,
        system: &System,
        force: &HarmonicBondForce,
    ) -> Result<(), KernelError> {
        let n = system.num_particles();
        for (index, bond) in force.bonds().iter().enumerate() {
            check_particles("bond", index, &[bond.particle1, bond.particle2], n)?;
        }
        self.bonds = force.bonds().to_vec();
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

#[derive(Debug, Default)]
pub struct ReferenceCalcHarmonicAngleForceKernel {
    angles: Vec<AngleParams>,
}

impl ReferenceCalcHarmonicAngleForceKernel {
    fn evaluate(&self, positions: &[Vec3], mut forces: Option<&mut [Vec3]>) -> f64 {
        let mut energy = 0.0;
        for angle in &self.angles {
            let u = sub(positions[angle.particle1], positions[angle.particle2]);
            let w = sub(positions[angle.particle3], positions[angle.particle2]);
            let u2 = dot(u, u);
            let w2 = dot(w, w);
            if u2 == 0.0 || w2 == 0.0 {
                continue;
            }

            let cos_theta = (dot(u, w) / (u2 * w2).sqrt()).clamp(-1.0, 1.0);
            let theta = cos_theta.acos();
            let delta = theta - angle.angle;
            energy += 0.5 * angle.k * delta * delta;

            let Some(forces) = forces.as_deref_mut() else {
                continue;
            };
            let p = cross(u, w);
            let rp = norm(p);
            if rp < LINEAR_EPSILON {
                continue;
            }
            let de_dtheta = angle.k * delta;
            let f1 = scale(cross(u, p), -de_dtheta / (u2 * rp));
            let f3 = scale(cross(w, p), de_dtheta / (w2 * rp));
            let f2 = scale(add(f1, f3), -1.0);
            accumulate(&mut forces[angle.particle1], f1);
            accumulate(&mut forces[angle.particle2], f2);
            accumulate(&mut forces[angle.particle3], f3);
        }
        energy
    }
}

impl ForceKernel<HarmonicAngleForce> for ReferenceCalcHarmonicAngleForceKernel {
    fn initialize(
        &mut self,
        system: &System,
        force: &HarmonicAngleForce,
    ) -> Result<(), KernelError> {
        let n = system.num_particles();
        for (index, a) in force.angles().iter().enumerate() {
            check_particles("angle", index, &[a.particle1, a.particle2, a.particle3], n)?;
        }
        self.angles = force.angles().to_vec();
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

#[derive(Debug, Default)]
pub struct ReferenceCalcPeriodicTorsionForceKernel {
    torsions: Vec<TorsionParams>,
}

impl ReferenceCalcPeriodicTorsionForceKernel {
    fn evaluate(&self, positions: &[Vec3], mut forces: Option<&mut [Vec3]>) -> f64 {
        let mut energy = 0.0;
        for t in &self.torsions {
            let r_ij = sub(positions[t.particle1], positions[t.particle2]);
            let r_kj = sub(positions[t.particle3], positions[t.particle2]);
            let r_kl = sub(positions[t.particle3], positions[t.particle4]);
            let m = cross(r_ij, r_kj);
            let n = cross(r_kj, r_kl);
            let m2 = dot(m, m);
            let n2 = dot(n, n);
            let kj2 = dot(r_kj, r_kj);
            if m2 < LINEAR_EPSILON || n2 < LINEAR_EPSILON || kj2 == 0.0 {
                continue;
            }

            let cos_phi = (dot(m, n) / (m2 * n2).sqrt()).clamp(-1.0, 1.0);
            let phi = cos_phi.acos().copysign(dot(r_ij, n));
            let periodicity = f64::from(t.periodicity);
            let arg = periodicity * phi - t.phase;
            energy += t.k * (1.0 + arg.cos());

            let Some(forces) = forces.as_deref_mut() else {
                continue;
            };
            let de_dphi = -t.k * periodicity * arg.sin();
            let kj = kj2.sqrt();
            let f_i = scale(m, -de_dphi * kj / m2);
            let f_l = scale(n, de_dphi * kj / n2);
            let p = dot(r_ij, r_kj) / kj2;
            let q = dot(r_kl, r_kj) / kj2;
            let s = sub(scale(f_i, p), scale(f_l, q));
            let f_j = sub(f_i, s);
            let f_k = add(f_l, s);

            accumulate(&mut forces[t.particle1], f_i);
            accumulate(&mut forces[t.particle2], scale(f_j, -1.0));
            accumulate(&mut forces[t.particle3], scale(f_k, -1.0));
            accumulate(&mut forces[t.particle4], f_l);
        }
        energy
    }
}

impl ForceKernel<PeriodicTorsionForce> for ReferenceCalcPeriodicTorsionForceKernel {
    fn initialize(
        &mut self,
        system: &System,
        force: &PeriodicTorsionForce,
    ) -> Result<(), KernelError> {
        let n = system.num_particles();
        for (index, t) in force.torsions().iter().enumerate() {
            check_particles(
                "torsion",
                index,
                &[t.particle1, t.particle2, t.particle3, t.particle4],
                n,
            )?;
        }
        self.torsions = force.torsions().to_vec();
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
