//! Point-wise height-field adjustments applied before triangulation.

use super::Heightmap;

impl Heightmap {
    /// Stretch the samples linearly so they span `[0, 1]`.
    ///
    /// A flat field is left unchanged.
    pub fn auto_level(&mut self) {
        let (lo, hi) = self
            .data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if hi == lo {
            return;
        }
        let scale = 1.0 / (hi - lo);
        for v in &mut self.data {
            *v = (*v - lo) * scale;
        }
    }

    /// Replace every sample `v` by `1 - v`.
    pub fn invert(&mut self) {
        for v in &mut self.data {
            *v = 1.0 - *v;
        }
    }

    /// Apply `v.powf(gamma)` to every sample.
    pub fn gamma_curve(&mut self, gamma: f32) {
        for v in &mut self.data {
            *v = v.powf(gamma);
        }
    }

    /// Pad the field with `size` samples of height `z` on every side.
    pub fn add_border(&mut self, size: usize, z: f32) {
        if size == 0 {
            return;
        }
        let w = self.width + size * 2;
        let h = self.height + size * 2;
        let mut data = vec![z; w * h];
        for (y, row) in self.data.chunks_exact(self.width).enumerate() {
            let start = (y + size) * w + size;
            data[start..start + self.width].copy_from_slice(row);
        }
        self.width = w;
        self.height = h;
        self.data = data;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_level() {
        let mut hm = Heightmap::new(2, 2, vec![0.25, 0.5, 0.75, 0.5]).unwrap();
        hm.auto_level();
        assert_eq!(hm.data(), &[0.0, 0.5, 1.0, 0.5]);
    }

    #[test]
    fn test_auto_level_flat() {
        let mut hm = Heightmap::new(2, 2, vec![0.3; 4]).unwrap();
        hm.auto_level();
        assert_eq!(hm.data(), &[0.3; 4]);
    }

    #[test]
    fn test_invert() {
        let mut hm = Heightmap::new(3, 1, vec![0.0, 0.25, 1.0]).unwrap();
        hm.invert();
        assert_eq!(hm.data(), &[1.0, 0.75, 0.0]);
    }

    #[test]
    fn test_gamma_curve() {
        let mut hm = Heightmap::new(3, 1, vec![0.0, 0.5, 1.0]).unwrap();
        hm.gamma_curve(2.0);
        assert_eq!(hm.data(), &[0.0, 0.25, 1.0]);
    }

    #[test]
    fn test_add_border() {
        let mut hm = Heightmap::new(2, 1, vec![1.0, 2.0]).unwrap();
        hm.add_border(1, 9.0);
        assert_eq!(hm.width(), 4);
        assert_eq!(hm.height(), 3);
        #[rustfmt::skip]
        let expected = [
            9.0, 9.0, 9.0, 9.0,
            9.0, 1.0, 2.0, 9.0,
            9.0, 9.0, 9.0, 9.0,
        ];
        assert_eq!(hm.data(), &expected);
    }
}
