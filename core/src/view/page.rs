use crate::dataset::LocationRecord;
use serde::Serialize;

/// One page of the record table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordPage {
    /// 1-based page number after clamping.
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
    /// 1-based row number of the first row on this page.
    pub first_row: usize,
    pub rows: Vec<LocationRecord>,
}

impl RecordPage {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

/// Slices `records` into pages of `page_size`, clamping `page` into range.
pub fn paginate(records: &[LocationRecord], page: usize, page_size: usize) -> RecordPage {
    let page_size = page_size.max(1);
    let page_count = records.len().div_ceil(page_size).max(1);
    let page = page.clamp(1, page_count);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(records.len());

    RecordPage {
        page,
        page_count,
        total: records.len(),
        first_row: start + 1,
        rows: records[start..end].to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn records(count: usize) -> Vec<LocationRecord> {
        let base = NaiveDateTime::parse_from_str("2024-06-01 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        (0..count)
            .map(|idx| {
                LocationRecord::new(
                    base + chrono::Duration::minutes(idx as i64),
                    35.0,
                    129.0,
                    "a.zip",
                )
            })
            .collect()
    }

    #[test]
    fn pages_cover_all_rows() {
        let rows = records(25);
        let last = paginate(&rows, 3, 10);
        assert_eq!(last.page_count, 3);
        assert_eq!(last.rows.len(), 5);
        assert_eq!(last.first_row, 21);
        assert!(last.has_previous());
        assert!(!last.has_next());
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let rows = records(4);
        assert_eq!(paginate(&rows, 0, 10).page, 1);
        assert_eq!(paginate(&rows, 9, 2).page, 2);

        let empty = paginate(&[], 5, 10);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.page_count, 1);
        assert!(empty.rows.is_empty());
    }
}
