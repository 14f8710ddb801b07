pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Share of `count` in `total` as a percentage rounded to one decimal.
    pub fn percentage(count: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        Self::round_to(100.0 * count as f64 / total as f64, 1)
    }

    pub fn round_to(value: f64, decimals: i32) -> f64 {
        let scale = 10f64.powi(decimals);
        (value * scale).round() / scale
    }

    /// Formats a count with comma thousands separators.
    pub fn group_thousands(value: usize) -> String {
        let digits = value.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        grouped
    }
}
