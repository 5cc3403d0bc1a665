use std::collections::HashSet;

use crate::errors::{FieldViolation, Result, SnipcatError};
use crate::model::{NewCategory, NewSnippet};

pub const MIN_TITLE_CHARS: usize = 3;
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// Validate a snippet submission
///
/// Every rule is checked and all violations are reported together:
///
/// 1. Title has at least 3 characters (after trimming)
/// 2. Description has at least 10 characters (after trimming)
/// 3. Compatibility is not blank
/// 4. Category id is positive
/// 5. Tags are not blank and not repeated
///
/// Code fields are never validated: an incomplete snippet is still a valid
/// catalog entry and a valid preview input.
///
/// # Errors
/// `Validation` listing every rejected field.
pub fn validate_new_snippet(snippet: &NewSnippet) -> Result<()> {
    let mut violations = Vec::new();

    if snippet.title.trim().chars().count() < MIN_TITLE_CHARS {
        violations.push(FieldViolation::new(
            "title",
            format!("Title must be at least {} characters", MIN_TITLE_CHARS),
        ));
    }

    if snippet.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
        violations.push(FieldViolation::new(
            "description",
            format!(
                "Description must be at least {} characters",
                MIN_DESCRIPTION_CHARS
            ),
        ));
    }

    if snippet.compatibility.trim().is_empty() {
        violations.push(FieldViolation::new(
            "compatibility",
            "Compatibility is required",
        ));
    }

    if snippet.category_id <= 0 {
        violations.push(FieldViolation::new(
            "categoryId",
            "Category id must be positive",
        ));
    }

    let mut seen = HashSet::new();
    for tag in &snippet.tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            violations.push(FieldViolation::new("tags", "Tags cannot be blank"));
        } else if !seen.insert(trimmed.to_lowercase()) {
            violations.push(FieldViolation::new(
                "tags",
                format!("Duplicate tag: {}", trimmed),
            ));
        }
    }

    into_result(violations)
}

/// Validate a category submission
///
/// Name must not be blank. Slug must be lowercase ASCII letters, digits and
/// single hyphens, neither starting nor ending with a hyphen.
///
/// # Errors
/// `Validation` listing every rejected field.
pub fn validate_new_category(category: &NewCategory) -> Result<()> {
    let mut violations = Vec::new();

    if category.name.trim().is_empty() {
        violations.push(FieldViolation::new("name", "Name is required"));
    }

    if !is_valid_slug(&category.slug) {
        violations.push(FieldViolation::new(
            "slug",
            "Slug must be lowercase letters, digits and single hyphens",
        ));
    }

    into_result(violations)
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Derive a slug from a display name
///
/// "Cart Functionality" becomes "cart-functionality". Runs of anything other
/// than ASCII letters and digits collapse into one hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

fn into_result(violations: Vec<FieldViolation>) -> Result<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(SnipcatError::Validation { violations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Cart Functionality"), "cart-functionality");
        assert_eq!(slugify("  Product -- Pages!  "), "product-pages");
        assert_eq!(slugify("UX 2.0"), "ux-2-0");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn test_slug_rules() {
        assert!(is_valid_slug("checkout-customization"));
        assert!(!is_valid_slug("Checkout"));
        assert!(!is_valid_slug("-lead"));
        assert!(!is_valid_slug("trail-"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn test_slugify_output_is_valid_slug() {
        for name in ["Analytics", "Customer Accounts", "a  b  c"] {
            assert!(is_valid_slug(&slugify(name)), "{}", name);
        }
    }
}
