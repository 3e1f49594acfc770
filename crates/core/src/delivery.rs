//! Delivery methods an owner can offer on a listing.

use crate::error::CoreError;

pub const PICKUP: &str = "pickup";
pub const COURIER: &str = "courier";
pub const POST: &str = "post";

pub const ALL: [&str; 3] = [PICKUP, COURIER, POST];

pub fn is_valid(method: &str) -> bool {
    ALL.contains(&method)
}

/// Validates the set an owner offers: non-empty, known, no duplicates.
pub fn validate_offered(methods: &[String]) -> Result<(), CoreError> {
    if methods.is_empty() {
        return Err(CoreError::Validation(
            "at least one delivery method is required".into(),
        ));
    }
    for (i, method) in methods.iter().enumerate() {
        if !is_valid(method) {
            return Err(CoreError::Validation(format!(
                "unknown delivery method: {method}"
            )));
        }
        if methods[..i].contains(method) {
            return Err(CoreError::Validation(format!(
                "duplicate delivery method: {method}"
            )));
        }
    }
    Ok(())
}

/// Validates the method a renter picked against what the listing offers.
pub fn validate_chosen(chosen: &str, offered: &[String]) -> Result<(), CoreError> {
    if !is_valid(chosen) {
        return Err(CoreError::Validation(format!(
            "unknown delivery method: {chosen}"
        )));
    }
    if !offered.iter().any(|m| m == chosen) {
        return Err(CoreError::Validation(format!(
            "delivery method {chosen} is not offered for this item"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn owned(methods: &[&str]) -> Vec<String> {
        methods.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn known_methods_validate() {
        assert!(validate_offered(&owned(&[PICKUP])).is_ok());
        assert!(validate_offered(&owned(&[PICKUP, COURIER, POST])).is_ok());
    }

    #[test]
    fn empty_set_is_rejected() {
        assert_matches!(validate_offered(&[]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn unknown_method_is_rejected() {
        let result = validate_offered(&owned(&["pickup", "drone"]));
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("drone"));
    }

    #[test]
    fn duplicates_are_rejected() {
        let result = validate_offered(&owned(&["pickup", "pickup"]));
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn chosen_method_must_be_offered() {
        let offered = owned(&[PICKUP, POST]);
        assert!(validate_chosen(PICKUP, &offered).is_ok());
        assert_matches!(
            validate_chosen(COURIER, &offered),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_chosen("drone", &offered),
            Err(CoreError::Validation(_))
        );
    }
}
