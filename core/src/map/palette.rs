/// Fixed display colour for each hour of the day.
const HOUR_COLORS: [&str; 24] = [
    "#8B0000", "#006400", "#00008B", "#008B8B", "#8B008B", "#FF8C00", "#9932CC", "#2F4F4F",
    "#556B2F", "#8B4513", "#1E90FF", "#9400D3", "#228B22", "#B22222", "#483D8B", "#00CED1",
    "#4682B4", "#5F9EA0", "#2E8B57", "#6B8E23", "#8A2BE2", "#7B68EE", "#191970", "#800000",
];

const FALLBACK_COLOR: &str = "#808080";

/// Maps an hour bucket to its line and marker colour.
#[derive(Debug, Clone, Copy, Default)]
pub struct HourColorTable;

impl HourColorTable {
    pub fn new() -> Self {
        Self
    }

    pub fn color(&self, hour: u8) -> &'static str {
        HOUR_COLORS
            .get(usize::from(hour))
            .copied()
            .unwrap_or(FALLBACK_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_hour_has_a_distinct_color() {
        let table = HourColorTable::new();
        let colors: std::collections::HashSet<_> = (0..24).map(|h| table.color(h)).collect();
        assert_eq!(colors.len(), 24);
        assert_eq!(table.color(8), "#556B2F");
        assert_eq!(table.color(99), FALLBACK_COLOR);
    }
}
