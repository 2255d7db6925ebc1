//! Marker validation: auxiliary point targets (dots, accents) that are touched
//! independently of the main path, in any order relative to it.

use glam::Vec2;

use super::state::MarkerState;
use crate::api::types::MarkerId;
use crate::glyph::path::Marker;

/// Mark and return the first untouched marker whose hit radius contains `point`.
///
/// Once touched a marker stays touched, so repeated hits yield nothing. When
/// markers overlap, call again with the same point to collect the rest.
pub fn check_markers(markers: &[Marker], state: &mut MarkerState, point: Vec2) -> Option<MarkerId> {
    markers
        .iter()
        .enumerate()
        .map(|(i, m)| (MarkerId(i as u32), m))
        .find(|(id, m)| !state.is_touched(*id) && m.contains(point))
        .map(|(id, _)| {
            state.mark(id);
            id
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_markers() -> Vec<Marker> {
        vec![
            Marker::new(Vec2::new(100.0, 100.0), 24.0),
            Marker::new(Vec2::new(300.0, 100.0), 24.0),
        ]
    }

    #[test]
    fn touching_twice_reports_once() {
        let markers = two_markers();
        let mut state = MarkerState::new(markers.len());

        assert_eq!(check_markers(&markers, &mut state, Vec2::new(105.0, 98.0)), Some(MarkerId(0)));
        assert_eq!(check_markers(&markers, &mut state, Vec2::new(100.0, 100.0)), None);
        assert_eq!(check_markers(&markers, &mut state, Vec2::new(290.0, 110.0)), Some(MarkerId(1)));
        assert!(state.all_touched());
    }

    #[test]
    fn miss_changes_nothing() {
        let markers = two_markers();
        let mut state = MarkerState::new(markers.len());
        assert_eq!(check_markers(&markers, &mut state, Vec2::new(200.0, 100.0)), None);
        assert_eq!(state.touched_count(), 0);
    }

    #[test]
    fn overlapping_markers_resolve_one_per_call() {
        let markers = vec![
            Marker::new(Vec2::new(0.0, 0.0), 10.0),
            Marker::new(Vec2::new(5.0, 0.0), 10.0),
        ];
        let mut state = MarkerState::new(2);
        let p = Vec2::new(2.0, 0.0);
        assert_eq!(check_markers(&markers, &mut state, p), Some(MarkerId(0)));
        assert_eq!(check_markers(&markers, &mut state, p), Some(MarkerId(1)));
        assert_eq!(check_markers(&markers, &mut state, p), None);
    }
}
