///
// Scan generation
//
// Build the sinogram of the phantom: for a range of angles, the line
// integrals along a set of parallel rays. The analytic version uses
// the closed-form projection, the numerical one integrates the image.
//

use anyhow::{ensure, Result};
use rand::Rng;

use crate::grid::linspace;
use crate::phantom::Phantom;
use crate::quadrature::numerical_projections;
use crate::tomo_image::Image;

// Image is inside an axis-aligned square -1..1, so max radius is sqrt(2).
const RAY_OFFSET: f64 = std::f64::consts::SQRT_2;

// Only real difference from Image is that the axes are labelled
// "angles" and "rays". Seems worth separating them so that there's no
// confusion.
#[derive(Clone, Debug)]
pub struct Scan {
    pub angles: usize,
    pub rays: usize,
    pub data: Vec<f64>,
}

// 'angles' angles over a 180 degree range (the other half is the same
// lines again, with p negated).
pub fn scan_angles(angles: usize) -> Vec<f64> {
    let angle_step = std::f64::consts::PI / angles as f64;
    (0..angles).map(|x| x as f64 * angle_step).collect()
}

// 'rays' parallel rays spread evenly across the square's circumradius.
pub fn ray_offsets(rays: usize) -> Vec<f64> {
    linspace(-RAY_OFFSET, RAY_OFFSET, rays)
}

impl Scan {
    // The returned data is a flattened array of (outer layer) angles
    // with (inner layer) parallel rays.
    pub fn analytic(phantom: &Phantom, angles: usize, rays: usize) -> Scan {
        assert!(angles > 0);
        assert!(rays > 1);

        let offsets = ray_offsets(rays);
        let data = scan_angles(angles)
            .into_iter()
            .flat_map(|phi| {
                offsets
                    .iter()
                    .map(move |&p| phantom.projection_value(p, phi))
            })
            .collect();

        Scan { angles, rays, data }
    }

    // Same layout as analytic, integrating the image with 'samples'
    // points along each ray.
    pub fn numerical(phantom: &Phantom, angles: usize, rays: usize, samples: usize) -> Result<Scan> {
        ensure!(angles > 0, "Need at least one angle");
        ensure!(rays > 1, "Need at least two rays");

        let offsets = ray_offsets(rays);
        let mut data = Vec::with_capacity(angles * rays);
        for phi in scan_angles(angles) {
            data.extend(numerical_projections(phantom, &offsets, phi, RAY_OFFSET, samples)?);
        }

        Ok(Scan { angles, rays, data })
    }

    // Add uniform noise of up to +/- fraction of the largest scan
    // value.
    pub fn add_noise<R: Rng>(&self, rng: &mut R, fraction: f64) -> Scan {
        let amplitude = fraction * self.max_abs();
        let data = if amplitude > 0.0 {
            self.data
                .iter()
                .map(|x| x + rng.gen_range(-amplitude..=amplitude))
                .collect()
        } else {
            self.data.clone()
        };

        Scan {
            angles: self.angles,
            rays: self.rays,
            data,
        }
    }

    fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0, |acc: f64, x| acc.max(x.abs()))
    }

    fn check_same_shape(&self, other: &Scan) -> Result<()> {
        ensure!(
            self.angles == other.angles && self.rays == other.rays,
            "Scan sizes do not match ({}x{} vs. {}x{})",
            self.angles,
            self.rays,
            other.angles,
            other.rays
        );
        Ok(())
    }

    pub fn rms_diff(&self, other: &Scan) -> Result<f64> {
        self.check_same_shape(other)?;
        let total: f64 = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(s1, s2)| (s1 - s2) * (s1 - s2))
            .sum();
        Ok((total / self.data.len() as f64).sqrt())
    }

    pub fn max_abs_diff(&self, other: &Scan) -> Result<f64> {
        self.check_same_shape(other)?;
        Ok(self
            .data
            .iter()
            .zip(other.data.iter())
            .fold(0.0, |acc: f64, (s1, s2)| acc.max((s1 - s2).abs())))
    }

    // Converts a scan to an image, perhaps useful for understanding
    // the transform. Rays run across, angles down, and the largest
    // magnitude maps to 255.
    pub fn to_image(&self) -> Image {
        let max = self.max_abs();
        let scale = if max > 0.0 { 255.0 / max } else { 0.0 };
        Image {
            width: self.rays,
            height: self.angles,
            data: self.data.iter().map(|x| x * scale).collect(),
        }
    }
}
