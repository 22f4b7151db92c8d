use serde::{Deserialize, Serialize};

/// Identifier of a product, owned by the product service.
///
/// Recommendations and reviews are keyed by the product they belong to, so
/// this is also the key of every event published on the write path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProductId(i32);

impl ProductId {
    /// Creates a product ID from its raw value.
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub fn as_i32(&self) -> i32 {
        self.0
    }

    /// Leaf services only accept identifiers greater than zero.
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i32> for ProductId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<ProductId> for i32 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// Formats the `host:port` address a service reports in its responses.
pub fn service_address(host: &str, port: u16) -> String {
    format!("{host}:{port}")
}
