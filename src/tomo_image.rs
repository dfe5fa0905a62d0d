///
// Image management
//
// Rasterise the phantom into a vector of floats, plus the basic image
// manipulation needed to display it.
//

use anyhow::{anyhow, ensure, Result};
use image::GrayImage;
use itertools::iproduct;
use std::ops::Index;

use crate::colour_bands::ColourBands;
use crate::phantom::Phantom;

#[derive(Clone, Debug)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f64>,
}

impl Index<(usize, usize)> for Image {
    type Output = f64;
    fn index(&self, (x, y): (usize, usize)) -> &f64 {
        &self.data[y * self.width + x]
    }
}

impl Image {
    // Sample the phantom at the centre of each pixel, with the image
    // covering (-1..1, -1..1). Row 0 is the top, so y decreases down
    // the image.
    pub fn render(phantom: &Phantom, width: usize, height: usize) -> Image {
        assert!(width > 0 && height > 0);

        let x_step = 2.0 / width as f64;
        let y_step = 2.0 / height as f64;
        let x_offset = (width as f64 - 1.0) / 2.0;
        let y_offset = (height as f64 - 1.0) / 2.0;

        let data = iproduct!(0..height, 0..width)
            .map(|(y_idx, x_idx)| {
                let x = (x_idx as f64 - x_offset) * x_step;
                let y = (y_offset - y_idx as f64) * y_step;
                phantom.image_value(x, y)
            })
            .collect();

        Image {
            width,
            height,
            data,
        }
    }

    // Render at factor times the resolution, and average down, so
    // pixels straddling an edge get an in-between value.
    pub fn render_supersampled(
        phantom: &Phantom,
        width: usize,
        height: usize,
        factor: usize,
    ) -> Image {
        assert!(factor > 0);
        Image::render(phantom, width * factor, height * factor).downscale(factor)
    }

    // Scales down the image by the given factor, which must divide
    // width and height.
    pub fn downscale(&self, factor: usize) -> Image {
        assert!(self.width % factor == 0);
        assert!(self.height % factor == 0);

        let new_w = self.width / factor;
        let new_h = self.height / factor;
        let norm = (factor * factor) as f64;

        let data = iproduct!(0..new_h, 0..new_w)
            .map(|(y, x)| {
                iproduct!(0..factor, 0..factor)
                    .map(|(sub_y, sub_x)| self[(x * factor + sub_x, y * factor + sub_y)])
                    .sum::<f64>()
                    / norm
            })
            .collect();

        Image {
            width: new_w,
            height: new_h,
            data,
        }
    }

    pub fn scale_values(&self, factor: f64) -> Image {
        self.map_values(|v| v * factor)
    }

    // Replace each value by its banded grey level, scaled to 0..255.
    pub fn banded(&self, bands: &ColourBands) -> Image {
        self.map_values(|v| bands.grey_u8(v) as f64)
    }

    fn map_values<F: Fn(f64) -> f64>(&self, f: F) -> Image {
        Image {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    pub fn rms_diff(&self, other: &Image) -> Result<f64> {
        ensure!(
            self.width == other.width && self.height == other.height,
            "Image sizes do not match ({}x{} vs. {}x{})",
            self.width,
            self.height,
            other.width,
            other.height
        );
        let total: f64 = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(p1, p2)| (p1 - p2) * (p1 - p2))
            .sum();
        Ok((total / self.data.len() as f64).sqrt())
    }

    // Values are capped to 0..255, then truncated.
    pub fn to_gray_image(&self) -> Result<GrayImage> {
        let data_as_u8 = self
            .data
            .iter()
            .map(|x| x.max(0.0).min(255.0) as u8)
            .collect::<Vec<_>>();
        GrayImage::from_raw(self.width as u32, self.height as u32, data_as_u8).ok_or_else(|| {
            anyhow!(
                "Image data does not fit {}x{} pixels",
                self.width,
                self.height
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_orientation() {
        let ph = Phantom::new();
        // 5x5 samples at -0.8, -0.4, 0.0, 0.4, 0.8.
        let img = Image::render(&ph, 5, 5);
        assert_eq!(img.data.len(), 25);
        assert_eq!(img[(2, 2)], ph.image_value(0.0, 0.0));
        assert_eq!(img[(0, 0)], ph.image_value(-0.8, 0.8));
        assert_eq!(img[(4, 0)], ph.image_value(0.8, 0.8));
        assert_eq!(img[(2, 4)], ph.image_value(0.0, -0.8));
    }

    #[test]
    fn test_render_symmetric() {
        // Only the ventricles and the small bottom features break
        // left-right symmetry, so the outline of the skull should be
        // symmetric.
        let ph = Phantom::new();
        let img = Image::render(&ph, 64, 64);
        for y in 0..64 {
            for x in 0..64 {
                let skull_l = img[(x, y)] >= 1.5;
                let skull_r = img[(63 - x, y)] >= 1.5;
                assert_eq!(skull_l, skull_r);
            }
        }
    }

    #[test]
    fn test_downscale() {
        let img = Image {
            width: 4,
            height: 2,
            data: vec![1.0, 3.0, 0.0, 0.0, 1.0, 3.0, 4.0, 8.0],
        };
        let small = img.downscale(2);
        assert_eq!((small.width, small.height), (2, 1));
        assert_eq!(small.data, vec![2.0, 3.0]);
    }

    #[test]
    fn test_supersampled_close_to_plain() {
        let ph = Phantom::new();
        let plain = Image::render(&ph, 32, 32);
        let smooth = Image::render_supersampled(&ph, 32, 32, 4);
        assert_eq!(smooth.data.len(), plain.data.len());
        let rms = plain.rms_diff(&smooth).unwrap();
        assert!(0.0 < rms && rms < 0.6);
    }

    #[test]
    fn test_banded() {
        let ph = Phantom::new();
        let img = Image::render(&ph, 9, 9).banded(&ColourBands::default());
        // Background is white, the middle of the brain is a mid grey.
        assert_eq!(img[(0, 0)], 255.0);
        assert!(img[(4, 4)] > 0.0 && img[(4, 4)] < 255.0);
    }

    #[test]
    fn test_rms_diff() {
        let a = Image {
            width: 2,
            height: 1,
            data: vec![0.0, 0.0],
        };
        let b = a.map_values(|_| 3.0);
        assert_eq!(a.rms_diff(&b).unwrap(), 3.0);
        assert_eq!(a.rms_diff(&a).unwrap(), 0.0);
        assert!(a.rms_diff(&a.downscale(1).scale_values(2.0)).is_ok());
        assert!(a.rms_diff(&Image::render(&Phantom::new(), 3, 3)).is_err());
    }

    #[test]
    fn test_to_gray_image() {
        let img = Image {
            width: 3,
            height: 1,
            data: vec![-5.0, 100.7, 300.0],
        };
        let grey = img.to_gray_image().unwrap();
        assert_eq!(grey.dimensions(), (3, 1));
        assert_eq!(grey.into_raw(), vec![0, 100, 255]);
    }
}
