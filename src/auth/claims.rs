use serde::{Deserialize, Serialize};

/// JWT payload. `sub` carries the user id in its string form so the
/// token stays readable by other JWT consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user ID
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
}
