use serde::{Deserialize, Serialize};

/// Identity resolved by the upstream auth gateway. The storefront never
/// sees raw credentials, only this opaque id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShopperId(pub String);

impl std::fmt::Display for ShopperId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
