//
// A single ellipse of the phantom
//
// Each ellipse is an indicator function scaled by a signed intensity
// step. Its line integral has a closed form, which is what makes a sum
// of ellipses such a handy test object: the projection of the whole
// phantom is the sum of the projections of its parts.
//

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipse {
    // Primary fields.
    pub x0: f64,
    pub y0: f64,
    pub a: f64,
    pub b: f64,
    // Counter-clockwise rotation of the (a, b) axes, in radians.
    pub rotation: f64,
    // Step in image value inside the ellipse. Overlaps add up.
    pub delta_intensity: f64,

    // Derived fields, a pure function of the above.
    pub radial_distance: f64,
    pub angular_position: f64,
    pub cos_rotation: f64,
    pub sin_rotation: f64,
}

impl Ellipse {
    pub fn new(
        (x0, y0): (f64, f64),
        (a, b): (f64, f64),
        rotation: f64,
        delta_intensity: f64,
    ) -> Ellipse {
        assert!(a > 0.0 && b > 0.0);

        Ellipse {
            x0,
            y0,
            a,
            b,
            rotation,
            delta_intensity,
            radial_distance: (x0 * x0 + y0 * y0).sqrt(),
            angular_position: y0.atan2(x0),
            cos_rotation: rotation.cos(),
            sin_rotation: rotation.sin(),
        }
    }

    // The centre, rebuilt from the polar form. Should match (x0, y0)
    // to within rounding.
    pub fn polar_centre(&self) -> (f64, f64) {
        (
            self.radial_distance * self.angular_position.cos(),
            self.radial_distance * self.angular_position.sin(),
        )
    }

    // Squared radius of (x, y) in the ellipse's own normalised frame,
    // where the ellipse is the unit disc.
    fn normalised_radius_sq(&self, x: f64, y: f64) -> f64 {
        let (c, s) = (self.cos_rotation, self.sin_rotation);

        let xp = x - self.x0;
        let yp = y - self.y0;

        let u = (xp * c + yp * s) / self.a;
        let v = (-xp * s + yp * c) / self.b;

        u * u + v * v
    }

    // Boundary points are inside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.normalised_radius_sq(x, y) <= 1.0
    }

    // Contribution to the image value at (x, y). A NaN radius is passed
    // through rather than being treated as "outside".
    pub fn image_contribution(&self, x: f64, y: f64) -> f64 {
        let r_sq = self.normalised_radius_sq(x, y);
        if r_sq <= 1.0 {
            self.delta_intensity
        } else if r_sq.is_nan() {
            f64::NAN
        } else {
            0.0
        }
    }

    // Squared half-width of the ellipse as seen along the normal at
    // angle phi. Never zero, since a, b > 0.
    fn effective_radius_sq(&self, phi: f64) -> f64 {
        let phi_shifted = phi - self.rotation;
        let ac = self.a * phi_shifted.cos();
        let bs = self.b * phi_shifted.sin();
        ac * ac + bs * bs
    }

    // Line integral of this ellipse's indicator along the line
    // { (p cos phi - t sin phi, p sin phi + t cos phi) : t real }.
    pub fn projection_contribution(&self, p: f64, phi: f64) -> f64 {
        let p_shifted = p - self.radial_distance * (self.angular_position - phi).cos();
        let a_sq_eff = self.effective_radius_sq(phi);

        let disc = a_sq_eff - p_shifted * p_shifted;
        // Line misses the ellipse. Written as a comparison so that NaN
        // falls through to the sqrt.
        if disc < 0.0 {
            return 0.0;
        }

        2.0 * self.delta_intensity * self.a * self.b / a_sq_eff * disc.sqrt()
    }
}
