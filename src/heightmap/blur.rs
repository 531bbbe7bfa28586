//! Approximate Gaussian blur.
//!
//! Three successive box blurs, each a horizontal then a vertical running-sum
//! pass, whose widths are chosen so the combined kernel matches a Gaussian
//! of the requested standard deviation. Samples beyond the border repeat
//! the edge value.

use super::Heightmap;

/// Number of box passes used to approximate the Gaussian.
const PASSES: usize = 3;

impl Heightmap {
    /// Blur the height field with a Gaussian of standard deviation `sigma`
    /// samples. A `sigma` of zero or less leaves the data untouched.
    pub fn gaussian_blur(&mut self, sigma: f32) {
        if sigma <= 0.0 {
            return;
        }
        let (w, h) = (self.width, self.height);
        let mut scratch = vec![0.0; self.data.len()];
        for size in boxes_for_gaussian(sigma, PASSES) {
            let r = (size - 1) / 2;
            box_blur_h(&self.data, &mut scratch, w, h, r);
            box_blur_v(&scratch, &mut self.data, w, h, r);
        }
        log::trace!("blurred {}x{} height field, sigma {}", w, h, sigma);
    }
}

/// Odd box widths whose successive application approximates a Gaussian.
fn boxes_for_gaussian(sigma: f32, n: usize) -> Vec<usize> {
    let nf = n as f32;
    let w_ideal = (12.0 * sigma * sigma / nf + 1.0).sqrt();
    let mut wl = w_ideal as i64;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wl = wl.max(1);
    let wu = wl + 2;

    let wlf = wl as f32;
    let m_ideal = (12.0 * sigma * sigma - nf * wlf * wlf - 4.0 * nf * wlf - 3.0 * nf)
        / (-4.0 * wlf - 4.0);
    let m = m_ideal.round() as i64;

    (0..n as i64)
        .map(|i| if i < m { wl as usize } else { wu as usize })
        .collect()
}

fn box_blur_h(src: &[f32], dst: &mut [f32], w: usize, h: usize, r: usize) {
    for y in 0..h {
        let row = y * w;
        running_box(|i| src[row + i], |i, v| dst[row + i] = v, w, r);
    }
}

fn box_blur_v(src: &[f32], dst: &mut [f32], w: usize, h: usize, r: usize) {
    for x in 0..w {
        running_box(|i| src[i * w + x], |i, v| dst[i * w + x] = v, h, r);
    }
}

/// Running box average of radius `r` over a line of `n` samples.
fn running_box<G, S>(get: G, mut set: S, n: usize, r: usize)
where
    G: Fn(usize) -> f32,
    S: FnMut(usize, f32),
{
    let last = n as i64 - 1;
    let at = |i: i64| get(i.clamp(0, last) as usize);
    let r = r as i64;
    let scale = 1.0 / (2 * r + 1) as f32;

    let mut sum: f32 = (-r..=r).map(at).sum();
    for i in 0..n as i64 {
        set(i as usize, sum * scale);
        sum += at(i + r + 1) - at(i - r);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxes_for_gaussian() {
        let boxes = boxes_for_gaussian(3.0, 3);
        assert_eq!(boxes.len(), 3);
        for b in &boxes {
            assert_eq!(b % 2, 1);
        }
        // Variance of a box of width w is (w^2 - 1) / 12.
        let variance: f32 = boxes.iter().map(|&b| ((b * b - 1) as f32) / 12.0).sum();
        assert!((variance - 9.0).abs() < 3.0);
    }

    #[test]
    fn test_constant_field_is_unchanged() {
        let mut hm = Heightmap::new(12, 7, vec![0.4; 84]).unwrap();
        hm.gaussian_blur(2.0);
        for &v in hm.data() {
            assert!((v - 0.4).abs() < 1e-5);
        }
    }

    #[test]
    fn test_blur_spreads_impulse() {
        let mut hm = Heightmap::from_fn(21, 21, |x, y| if (x, y) == (10, 10) { 1.0 } else { 0.0 })
            .unwrap();
        hm.gaussian_blur(2.0);

        let center = hm.at(10, 10);
        assert!(center < 1.0);
        assert!(hm.at(11, 10) > 0.0);
        assert!(hm.at(11, 10) < center);
        assert!((hm.at(9, 10) - hm.at(11, 10)).abs() < 1e-6);
        assert!((hm.at(10, 9) - hm.at(10, 11)).abs() < 1e-6);

        // Mass is preserved away from the borders.
        let total: f32 = hm.data().iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_radius_larger_than_field() {
        let mut hm = Heightmap::from_fn(3, 2, |x, _| x as f32).unwrap();
        hm.gaussian_blur(10.0);
        for &v in hm.data() {
            assert!(v.is_finite());
            assert!((-1e-4..=2.0001).contains(&v));
        }
    }

    #[test]
    fn test_zero_sigma_is_noop() {
        let mut hm = Heightmap::from_fn(4, 4, |x, y| (x * y) as f32).unwrap();
        let before = hm.clone();
        hm.gaussian_blur(0.0);
        assert_eq!(hm, before);
    }
}
