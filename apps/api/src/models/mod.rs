pub mod profile;

use serde::{Deserialize, Deserializer};

/// Reads an explicit `null` as the type's default. Pair with `#[serde(default)]` to
/// also cover a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
