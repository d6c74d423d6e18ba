/// Default limit on nested container levels.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Decoder limits.
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// Most containers nested inside one another, a root container included.
    /// Zero accepts scalar and array elements only.
    pub max_depth: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeConfig {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}
