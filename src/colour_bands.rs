//
// Discrete grey-level banding for display
//
// The interesting part of the phantom is the soft tissue, where values
// differ by 1% steps around 1.0. A linear grey scale can't show that
// next to a skull of 2.0, so we map a few narrow bands to distinct
// greys, and everything below or above to white and black.
//

#[derive(Clone, Debug)]
pub struct ColourBands {
    // Increasing band edges. There is one fewer level than boundary.
    boundaries: Vec<f64>,
    levels: Vec<f64>,
    under: f64,
    over: f64,
}

impl Default for ColourBands {
    // Bands centred on the soft-tissue values 1.00, 1.01, ... 1.04.
    fn default() -> Self {
        ColourBands::new(
            vec![0.995, 1.005, 1.015, 1.025, 1.035, 1.045],
            vec![0.9, 0.8, 0.7, 0.6, 0.5],
            1.0,
            0.0,
        )
    }
}

impl ColourBands {
    pub fn new(boundaries: Vec<f64>, levels: Vec<f64>, under: f64, over: f64) -> ColourBands {
        assert!(boundaries.len() == levels.len() + 1);
        assert!(boundaries.windows(2).all(|w| w[0] < w[1]));
        ColourBands {
            boundaries,
            levels,
            under,
            over,
        }
    }

    // Grey level in 0.0 (black) ..= 1.0 (white). Band i covers
    // boundaries[i] <= value < boundaries[i + 1]. NaN counts as under.
    pub fn level(&self, value: f64) -> f64 {
        if value.is_nan() || value < self.boundaries[0] {
            return self.under;
        }
        match self.boundaries[1..].iter().position(|&upper| value < upper) {
            Some(band) => self.levels[band],
            None => self.over,
        }
    }

    pub fn grey_u8(&self, value: f64) -> u8 {
        (self.level(value) * 255.0).round().max(0.0).min(255.0) as u8
    }
}
