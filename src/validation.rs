//! Input rules shared by registration, ground management and booking.

use chrono::{DateTime, NaiveDate};

use crate::error::{AppError, AppResult};

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const PHONE_DIGITS: usize = 10;

/// Trim and drop anything that looks like an HTML tag.
pub fn sanitize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input.trim();
    while let Some(start) = rest.find('<') {
        match rest[start..].find('>') {
            Some(end) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + end + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

pub fn validate_name(name: &str) -> AppResult<String> {
    let name = sanitize_text(name);
    if name.chars().count() < MIN_NAME_LEN {
        return Err(AppError::BadRequest(
            "Name must be at least 2 characters long".into(),
        ));
    }
    Ok(name)
}

/// Lowercase the address and check it has a local part, one `@` and a
/// domain ending in a TLD of at least two letters.
pub fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::BadRequest("Email is required".into()));
    }
    if !email.contains('@') {
        return Err(AppError::BadRequest("Email must contain @ symbol".into()));
    }

    let invalid = || {
        AppError::BadRequest("Email must be in a valid format (e.g., user@example.com)".into())
    };
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }

    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty() {
        return Err(invalid());
    }
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::BadRequest(
            "Email must have a valid domain (e.g., gmail.com, mail.com)".into(),
        ));
    }
    Ok(email)
}

/// Strip formatting and require exactly ten digits.
pub fn normalize_phone(phone: &str) -> AppResult<String> {
    if phone.trim().is_empty() {
        return Err(AppError::BadRequest("Phone number is required".into()));
    }
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != PHONE_DIGITS {
        return Err(AppError::BadRequest(
            "Phone number must be exactly 10 digits".into(),
        ));
    }
    Ok(digits)
}

pub fn validate_password(password: &str) -> AppResult<()> {
    if password.is_empty() {
        return Err(AppError::BadRequest("Password is required".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters long".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AppError::BadRequest(
            "Password must contain at least one uppercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AppError::BadRequest(
            "Password must contain at least one lowercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::BadRequest(
            "Password must contain at least one number".into(),
        ));
    }
    Ok(())
}

/// Trim labels, drop empties and duplicates, keep first-seen order.
pub fn normalize_slots(slots: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(slots.len());
    for slot in slots {
        let slot = slot.trim();
        if !slot.is_empty() && !out.iter().any(|s| s == slot) {
            out.push(slot.to_string());
        }
    }
    out
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (its date part is used).
pub fn parse_booking_date(raw: &str) -> AppResult<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| AppError::BadRequest("bookingDate must be a date (YYYY-MM-DD)".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_needs_upper_lower_and_digit() {
        assert!(validate_password("abc12345").is_err());
        assert!(validate_password("ABC12345").is_err());
        assert!(validate_password("Abcdefgh").is_err());
        assert!(validate_password("Abc1234").is_err());
        assert!(validate_password("Abcd1234").is_ok());
    }

    #[test]
    fn email_is_lowercased_and_needs_a_real_tld() {
        assert_eq!(
            normalize_email("  Player@Example.COM ").unwrap(),
            "player@example.com"
        );
        assert!(normalize_email("player.example.com").is_err());
        assert!(normalize_email("player@example").is_err());
        assert!(normalize_email("player@example.c").is_err());
        assert!(normalize_email("player@example.c0m").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("a@b@example.com").is_err());
        assert!(normalize_email("pl ayer@example.com").is_err());
        assert!(normalize_email("player@.com").is_err());
    }

    #[test]
    fn phone_keeps_only_digits() {
        assert_eq!(normalize_phone("(987) 654-3210").unwrap(), "9876543210");
        assert!(normalize_phone("98765 4321").is_err());
        assert!(normalize_phone("+1 987 654 3210").is_err());
        assert!(normalize_phone("").is_err());
    }

    #[test]
    fn name_is_sanitized_before_length_check() {
        assert_eq!(validate_name("  <b>Jo</b> ").unwrap(), "Jo");
        assert!(validate_name("<script></script>J").is_err());
        assert!(validate_name(" ").is_err());
    }

    #[test]
    fn unterminated_tag_is_left_alone() {
        assert_eq!(sanitize_text("a < b"), "a < b");
    }

    #[test]
    fn slots_are_trimmed_and_deduplicated_in_order() {
        let slots = normalize_slots(vec![
            " 09:00-10:00".into(),
            "07:00-08:00".into(),
            "09:00-10:00".into(),
            "  ".into(),
        ]);
        assert_eq!(slots, vec!["09:00-10:00", "07:00-08:00"]);
    }

    #[test]
    fn booking_date_accepts_plain_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert_eq!(parse_booking_date("2025-01-10").unwrap(), expected);
        assert_eq!(
            parse_booking_date("2025-01-10T00:00:00Z").unwrap(),
            expected
        );
        assert!(parse_booking_date("10/01/2025").is_err());
        assert!(parse_booking_date("2025-02-30").is_err());
    }
}
