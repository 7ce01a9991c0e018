//! SKU generation.
//!
//! Products without an explicit SKU get one generated from their category
//! name plus a random suffix, e.g. `BOO-1f9c2d4e` for "Booster Boxes".

use uuid::Uuid;

/// Derive the SKU prefix from a category name: the first three alphanumeric
/// characters, uppercased. Falls back to `SKU` when the name has none.
#[must_use]
pub fn sku_prefix(category_name: &str) -> String {
    let prefix: String = category_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_ascii_uppercase();

    if prefix.is_empty() {
        "SKU".to_owned()
    } else {
        prefix
    }
}

/// Generate a SKU of the form `<prefix>-<8 hex chars>`.
///
/// The suffix comes from a v4 UUID, so collisions are vanishingly rare; the
/// unique constraint on the column catches the remainder and callers retry.
#[must_use]
pub fn generate_sku(category_name: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    let short = suffix.get(..8).unwrap_or(&suffix);
    format!("{}-{}", sku_prefix(category_name), short)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_from_plain_name() {
        assert_eq!(sku_prefix("Booster Boxes"), "BOO");
        assert_eq!(sku_prefix("singles"), "SIN");
    }

    #[test]
    fn test_prefix_skips_non_alphanumeric() {
        assert_eq!(sku_prefix("  d&d minis"), "DDM");
    }

    #[test]
    fn test_prefix_short_name() {
        assert_eq!(sku_prefix("go"), "GO");
    }

    #[test]
    fn test_prefix_empty_falls_back() {
        assert_eq!(sku_prefix("---"), "SKU");
        assert_eq!(sku_prefix(""), "SKU");
    }

    #[test]
    fn test_generated_sku_shape() {
        let sku = generate_sku("Booster Boxes");
        let (prefix, suffix) = sku.split_once('-').expect("dash separator");
        assert_eq!(prefix, "BOO");
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_skus_differ() {
        assert_ne!(generate_sku("Singles"), generate_sku("Singles"));
    }
}
