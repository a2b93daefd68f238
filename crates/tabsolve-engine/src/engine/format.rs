/// Format a number for display: integral values without decimals, others
/// with `decimal_places` digits.
pub fn format_number(n: f64, decimal_places: usize) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        if n.is_sign_negative() { "-#INF!" } else { "#INF!" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{:.*}", decimal_places, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7.0, 3), "7");
        assert_eq!(format_number(-4.0, 3), "-4");
        assert_eq!(format_number(2.5, 3), "2.500");
        assert_eq!(format_number(1.0 / 3.0, 2), "0.33");
        assert_eq!(format_number(f64::INFINITY, 3), "#INF!");
        assert_eq!(format_number(f64::NEG_INFINITY, 3), "-#INF!");
        assert_eq!(format_number(f64::NAN, 3), "#NAN!");
    }
}
