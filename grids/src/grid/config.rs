#[derive(Clone, Debug)]
pub struct Config {
    /// World position of the bottom-left corner of cell (0, 0).
    pub offset_x: f32,
    pub offset_y: f32,
    /// Initial bucket capacity of every coarse cell list.
    pub coarse_capacity: usize,
    /// Log a timing line for each tighten pass, up to `profile_limit` passes.
    pub profile_summary: bool,
    pub profile_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            offset_x: 0.0,
            offset_y: 0.0,
            coarse_capacity: 4,
            profile_summary: false,
            profile_limit: 5,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct ProfileBudget {
    remaining: u32,
}

impl ProfileBudget {
    pub(crate) fn new(config: &Config) -> Self {
        let remaining = if config.profile_summary {
            config.profile_limit.max(1)
        } else {
            0
        };
        Self { remaining }
    }

    pub(crate) fn take(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}
