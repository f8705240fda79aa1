///
/// Clamps a value into `[0, 1]`
///
/// `NaN` is mapped to `0.0`.
///
pub fn clamp_unit_interval(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}


#[cfg(test)]
mod tests {
    use super::clamp_unit_interval;

    #[test]
    fn clamping() {
        assert_eq!(clamp_unit_interval(0.4), 0.4);
        assert_eq!(clamp_unit_interval(-3.0), 0.0);
        assert_eq!(clamp_unit_interval(7.0), 1.0);
        assert_eq!(clamp_unit_interval(f64::NAN), 0.0);
        assert_eq!(clamp_unit_interval(f64::NEG_INFINITY), 0.0);
    }
}
