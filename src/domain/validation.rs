use crate::error::resource::ValidationErrorKind;

/// Explicit field validators.
///
/// Each returns the violated kinds for a single value; an empty vec means
/// the value passes. Callers collect these into `ValidationFieldError`s so a
/// rejected payload reports every broken field at once.

pub fn email(value: &str) -> Vec<ValidationErrorKind> {
    let mut kinds = Vec::new();

    if value.trim().is_empty() {
        kinds.push(ValidationErrorKind::Blank);
        return kinds;
    }

    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next();

    match domain {
        Some(domain) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {}
        _ => kinds.push(ValidationErrorKind::Pattern("email".into())),
    }

    kinds
}

pub fn non_blank(value: &str) -> Vec<ValidationErrorKind> {
    if value.trim().is_empty() {
        vec![ValidationErrorKind::Blank]
    } else {
        Vec::new()
    }
}

pub fn min_length(value: &str, min: u64) -> Vec<ValidationErrorKind> {
    if (value.chars().count() as u64) < min {
        vec![ValidationErrorKind::MinLength(min)]
    } else {
        Vec::new()
    }
}

pub fn length_range(value: &str, min: u64, max: u64) -> Vec<ValidationErrorKind> {
    let len = value.chars().count() as u64;
    let mut kinds = Vec::new();

    if len < min {
        kinds.push(ValidationErrorKind::MinLength(min));
    }
    if len > max {
        kinds.push(ValidationErrorKind::MaxLength(max));
    }

    kinds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_email() {
        assert!(email("user@example.com").is_empty());
    }

    #[test]
    fn rejects_email_without_at() {
        assert_eq!(
            email("user.example.com"),
            vec![ValidationErrorKind::Pattern("email".into())]
        );
    }

    #[test]
    fn rejects_email_with_empty_parts() {
        assert!(!email("@example.com").is_empty());
        assert!(!email("user@").is_empty());
        assert!(!email("user@ex@ample.com").is_empty());
    }

    #[test]
    fn blank_email_is_blank_not_pattern() {
        assert_eq!(email("   "), vec![ValidationErrorKind::Blank]);
    }

    #[test]
    fn non_blank_rejects_whitespace() {
        assert_eq!(non_blank(" \t"), vec![ValidationErrorKind::Blank]);
        assert!(non_blank("x").is_empty());
    }

    #[test]
    fn min_length_counts_chars_not_bytes() {
        assert!(min_length("äöü", 3).is_empty());
        assert_eq!(min_length("äö", 3), vec![ValidationErrorKind::MinLength(3)]);
    }

    #[test]
    fn length_range_reports_both_bounds() {
        assert_eq!(
            length_range("ab", 3, 1000),
            vec![ValidationErrorKind::MinLength(3)]
        );
        assert!(length_range("abc", 3, 1000).is_empty());
        let long = "x".repeat(1001);
        assert_eq!(
            length_range(&long, 3, 1000),
            vec![ValidationErrorKind::MaxLength(1000)]
        );
    }
}
