//! Display color assignment for course keys.
//!
//! Assignment is a pure function threading an explicit table through the
//! pager state, so the same course key always renders in the same color
//! within one result set and repeated renders are deterministic.

use std::collections::BTreeMap;

use crate::models::Schedule;

/// Fixed palette cycled through as new course keys appear.
const PALETTE: [&str; 10] = [
    "#4C6EF5", "#12B886", "#FA5252", "#FAB005", "#7950F2", "#15AABF", "#E64980", "#82C91E",
    "#FD7E14", "#228BE6",
];

/// Course key to color assignments accumulated so far.
pub type ColorTable = BTreeMap<String, String>;

/// Look up or assign the color for a course key.
///
/// Returns the color together with the (possibly extended) table; the input
/// table is never mutated in place.
pub fn color_for(course_key: &str, table: &ColorTable) -> (String, ColorTable) {
    if let Some(color) = table.get(course_key) {
        return (color.clone(), table.clone());
    }

    let color = PALETTE[table.len() % PALETTE.len()].to_string();
    let mut next = table.clone();
    next.insert(course_key.to_string(), color.clone());
    (color, next)
}

/// Extend a table with every course key in a batch of schedules, in
/// deterministic (schedule order, then key order) sequence.
pub fn assign_colors(schedules: &[Schedule], table: ColorTable) -> ColorTable {
    let mut table = table;
    for schedule in schedules {
        for key in schedule.keys() {
            let (_, next) = color_for(key, &table);
            table = next;
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_same_color() {
        let table = ColorTable::new();
        let (first, table) = color_for("CIS*1500*01", &table);
        let (second, _) = color_for("CIS*1500*01", &table);
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_keys_distinct_colors() {
        let table = ColorTable::new();
        let (a, table) = color_for("CIS*1500*01", &table);
        let (b, _) = color_for("MATH*1200*02", &table);
        assert_ne!(a, b);
    }

    #[test]
    fn test_input_table_untouched() {
        let table = ColorTable::new();
        let (_, extended) = color_for("CIS*1500*01", &table);
        assert!(table.is_empty());
        assert_eq!(extended.len(), 1);
    }

    #[test]
    fn test_palette_wraps() {
        let mut table = ColorTable::new();
        for i in 0..PALETTE.len() {
            let (_, next) = color_for(&format!("C*{i}*01"), &table);
            table = next;
        }
        let (wrapped, _) = color_for("OVERFLOW*1*01", &table);
        assert_eq!(wrapped, PALETTE[0]);
    }

    #[test]
    fn test_assign_colors_covers_batch() {
        let mut schedule = Schedule::new();
        schedule.insert("CIS*1500*01".into(), vec![]);
        schedule.insert("MATH*1200*02".into(), vec![]);

        let table = assign_colors(std::slice::from_ref(&schedule), ColorTable::new());
        assert_eq!(table.len(), 2);

        // Re-assigning the same batch is a no-op.
        let again = assign_colors(std::slice::from_ref(&schedule), table.clone());
        assert_eq!(again, table);
    }
}
