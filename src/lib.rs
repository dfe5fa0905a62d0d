//
// The Shepp-Logan phantom, and its exact projections
//
// A standard synthetic test object for tomography: a piecewise-constant
// image made of ten ellipses, along with the closed-form line
// integrals of that image, so that reconstruction algorithms can be
// checked against a known answer.
//

pub mod colour_bands;
pub mod ellipse;
pub mod grid;
pub mod phantom;
pub mod quadrature;
pub mod tomo_image;
pub mod tomo_scan;

pub use phantom::Phantom;
