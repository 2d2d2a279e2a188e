use rand::Rng;

/// Axis-aligned rectangle stored by its edges, y growing upward.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl Aabb {
    /// Inverted box that overlaps nothing and is absorbed by any union.
    pub const EMPTY: Aabb = Aabb {
        left: f32::INFINITY,
        bottom: f32::INFINITY,
        right: f32::NEG_INFINITY,
        top: f32::NEG_INFINITY,
    };

    pub fn new(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Box anchored at its bottom-left corner.
    pub fn from_anchor(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            left: x,
            bottom: y,
            right: x + width,
            top: y + height,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn is_empty(&self) -> bool {
        self.left > self.right || self.bottom > self.top
    }

    pub fn bottom_left(&self) -> (f32, f32) {
        (self.left, self.bottom)
    }

    pub fn top_right(&self) -> (f32, f32) {
        (self.right, self.top)
    }

    /// Edge-inclusive overlap test; touching boxes overlap.
    #[inline(always)]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        other.left <= self.right
            && other.right >= self.left
            && other.top >= self.bottom
            && other.bottom <= self.top
    }

    #[inline(always)]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.bottom && y <= self.top
    }

    pub fn contains(&self, other: &Aabb) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.bottom >= self.bottom
            && other.top <= self.top
    }

    #[inline(always)]
    pub fn expand_to_include(&mut self, other: &Aabb) {
        self.left = self.left.min(other.left);
        self.bottom = self.bottom.min(other.bottom);
        self.right = self.right.max(other.right);
        self.top = self.top.max(other.top);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut out = *self;
        out.expand_to_include(other);
        out
    }

    /// Grows the box outward by the given margins on every side.
    pub fn inflate(&self, dx: f32, dy: f32) -> Aabb {
        Aabb {
            left: self.left - dx,
            bottom: self.bottom - dy,
            right: self.right + dx,
            top: self.top + dy,
        }
    }

    /// Picks an anchor so that a `width` x `height` box lands fully inside.
    pub fn get_random_anchor_inside<R: Rng>(
        &self,
        width: f32,
        height: f32,
        rng: &mut R,
    ) -> (f32, f32) {
        (
            self._safe_randf32(rng, self.left, self.right - width),
            self._safe_randf32(rng, self.bottom, self.top - height),
        )
    }

    fn _safe_randf32<R: Rng>(&self, rng: &mut R, min: f32, max: f32) -> f32 {
        if min > max {
            return min;
        }
        rng.gen_range(min..=max)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
