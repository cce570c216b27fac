use crate::shared::error::AppError;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;
pub const MIN_SEMESTER: u8 = 1;
pub const MAX_SEMESTER: u8 = 8;

/// Rating must be an integer in [1, 5]. Anything else is `InvalidRating`,
/// never clamped.
pub fn validate_rating(rating: i64) -> Result<u8, AppError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::InvalidRating(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    Ok(rating as u8)
}

pub fn validate_semester(semester: u8) -> Result<u8, AppError> {
    if !(MIN_SEMESTER..=MAX_SEMESTER).contains(&semester) {
        return Err(AppError::Validation(format!(
            "semester must be between {MIN_SEMESTER} and {MAX_SEMESTER}, got {semester}"
        )));
    }
    Ok(semester)
}

/// Shallow shape check; real verification belongs to the auth provider.
pub fn validate_email(email: &str) -> Result<&str, AppError> {
    let trimmed = email.trim();
    let well_formed = trimmed
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(AppError::Validation(format!("invalid email: {email}")));
    }
    Ok(trimmed)
}

/// Contact numbers are 10 digits on the signup forms.
pub fn validate_contact_no(contact_no: &str) -> Result<&str, AppError> {
    let trimmed = contact_no.trim();
    if trimmed.len() != 10 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "contact number must be 10 digits".to_string(),
        ));
    }
    Ok(trimmed)
}

pub fn require_non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        assert_eq!(validate_rating(1).unwrap(), 1);
        assert_eq!(validate_rating(5).unwrap(), 5);
    }

    #[test]
    fn semester_bounds() {
        assert!(validate_semester(0).is_err());
        assert!(validate_semester(9).is_err());
        assert!(validate_semester(4).is_ok());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("s1@college.edu").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@college.edu").is_err());
        assert!(validate_email("s1@nodot").is_err());
    }

    #[test]
    fn contact_no_is_ten_digits() {
        assert!(validate_contact_no("9876543210").is_ok());
        assert!(validate_contact_no("12345").is_err());
        assert!(validate_contact_no("98765432ab").is_err());
    }
}
