/// Per-pixel opacity grid used for exact-shape collision tests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    pub fn new(width: usize, height: usize) -> Self {
        Mask { width, height, bits: vec![false; width * height] }
    }

    pub fn filled(width: usize, height: usize) -> Self {
        Mask { width, height, bits: vec![true; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.bits[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, opaque: bool) {
        if x < self.width && y < self.height {
            self.bits[y * self.width + x] = opaque;
        }
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    /// Finds the first opaque pixel shared with `other`, which sits at `offset` relative to `self`.
    ///
    /// The returned point is in `self` coordinates, scanning row by row.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(i32, i32)> {
        let (dx, dy) = offset;

        let left = dx.max(0);
        let top = dy.max(0);
        let right = (self.width as i32).min(dx + other.width as i32);
        let bottom = (self.height as i32).min(dy + other.height as i32);

        if left >= right || top >= bottom {
            return None;
        }

        for y in top..bottom {
            for x in left..right {
                if self.get(x as usize, y as usize) && other.get((x - dx) as usize, (y - dy) as usize) {
                    return Some((x, y));
                }
            }
        }

        None
    }

    pub fn overlaps(&self, other: &Mask, offset: (i32, i32)) -> bool {
        self.overlap(other, offset).is_some()
    }
}
