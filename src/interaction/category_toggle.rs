//! Click-to-toggle over the ranked category bars
//!
//! Bars are laid out horizontally with rank 0 at the top, so rank `i` of `n`
//! sits at plot argument `n - 1 - i`.

use crate::data::CategoryCount;
use crate::state::FilterState;

/// Half the bar thickness in plot units
const BAR_HALF_WIDTH: f64 = 0.4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggled {
    pub category: String,
    pub selected: bool,
}

/// Plot argument for the bar at `rank`
pub fn bar_position(rank: usize, len: usize) -> f64 {
    (len.saturating_sub(1).saturating_sub(rank)) as f64
}

/// Rank of the bar under plot coordinate `y`, if any
pub fn hit_test(y: f64, len: usize) -> Option<usize> {
    if len == 0 || !y.is_finite() {
        return None;
    }
    let slot = y.round();
    if slot < 0.0 || slot > (len - 1) as f64 || (y - slot).abs() > BAR_HALF_WIDTH {
        return None;
    }
    Some(len - 1 - slot as usize)
}

/// Toggle the category whose bar is under `y`
pub fn toggle_at(ranking: &[CategoryCount], y: f64, filters: &mut FilterState) -> Option<Toggled> {
    let rank = hit_test(y, ranking.len())?;
    let category = ranking[rank].category.clone();
    let selected = filters.toggle_category(&category);
    log::debug!("category {:?} selected={}", category, selected);
    Some(Toggled { category, selected })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::rank_categories;
    use crate::fixtures::sample_records;

    #[test]
    fn test_bar_positions_put_rank_zero_on_top() {
        assert_eq!(bar_position(0, 5), 4.0);
        assert_eq!(bar_position(4, 5), 0.0);
        for rank in 0..5 {
            assert_eq!(hit_test(bar_position(rank, 5), 5), Some(rank));
        }
    }

    #[test]
    fn test_hit_test_misses_gaps_and_outside() {
        assert_eq!(hit_test(0.5, 3), None);
        assert_eq!(hit_test(-0.6, 3), None);
        assert_eq!(hit_test(3.0, 3), None);
        assert_eq!(hit_test(1.3, 3), Some(1));
        assert_eq!(hit_test(0.0, 0), None);
    }

    #[test]
    fn test_toggle_at_flips_membership() {
        let raw = sample_records();
        let ranking = rank_categories(raw.iter(), 15);
        assert_eq!(ranking[0].category, "THEFT");

        let mut filters = FilterState::new();
        let top = bar_position(0, ranking.len());
        let first = toggle_at(&ranking, top, &mut filters).unwrap();
        assert_eq!(first.category, "THEFT");
        assert!(first.selected);
        assert_eq!(filters.apply(&raw).len(), 60);

        let second = toggle_at(&ranking, top, &mut filters).unwrap();
        assert!(!second.selected);
        assert_eq!(filters.apply(&raw).len(), 100);
    }

    #[test]
    fn test_selection_survives_leaving_top_n() {
        let raw = sample_records();
        let mut filters = FilterState::new();
        let ranking = rank_categories(raw.iter(), 2);
        toggle_at(&ranking, bar_position(1, ranking.len()), &mut filters);
        assert!(filters.is_category_selected("ASSAULT"));

        let narrowed = rank_categories(raw.iter(), 1);
        assert!(narrowed.iter().all(|c| c.category != "ASSAULT"));
        assert!(filters.is_category_selected("ASSAULT"));
    }
}
