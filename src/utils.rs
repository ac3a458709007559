/// Parse a form field as a student id or grade.
/// Surrounding whitespace is ignored; anything else that is not an `i32` is refused
/// with a message naming the field.
pub fn parse_int_field(label: &str, raw: &str) -> Result<i32, String> {
    let t = raw.trim();
    if t.is_empty() {
        return Err(format!("{} is empty", label));
    }
    t.parse::<i32>()
        .map_err(|_| format!("{} must be a whole number, got \"{}\"", label, t))
}

/// Names are stored as typed; only leading/trailing whitespace is dropped.
pub fn clean_name(raw: &str) -> String {
    raw.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_numbers_with_padding() {
        assert_eq!(parse_int_field("Grade", " -12 "), Ok(-12));
        assert_eq!(parse_int_field("Student ID", "2147483647"), Ok(i32::MAX));
    }

    #[test]
    fn rejects_empty_and_non_numeric() {
        assert_eq!(parse_int_field("Grade", "   "), Err("Grade is empty".to_string()));
        assert!(parse_int_field("Student ID", "12a").is_err());
        assert!(parse_int_field("Student ID", "99999999999").is_err());
    }

    #[test]
    fn clean_name_keeps_inner_spaces() {
        assert_eq!(clean_name("  Grace Hopper "), "Grace Hopper");
    }
}
