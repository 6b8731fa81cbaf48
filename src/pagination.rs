use serde::Deserialize;

pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    MAX_LIMIT
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

impl Pagination {
    /// `(skip, limit)` with negative offsets zeroed and the limit kept in `1..=MAX_LIMIT`.
    pub fn bounds(&self) -> (i64, i64) {
        (self.skip.max(0), self.limit.clamp(1, MAX_LIMIT))
    }
}
