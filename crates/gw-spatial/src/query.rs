use std::collections::HashMap;

use gw_core::UnitPlacement;
use tracing::debug;

/// How distances are measured for range queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DistanceMetric {
    /// Straight-line distance.
    #[default]
    Euclidean,
    /// Sum of per-axis deltas.
    Manhattan,
}

impl DistanceMetric {
    /// Distance between two placements under this metric. Map ids are not
    /// compared.
    pub fn measure(self, a: &UnitPlacement, b: &UnitPlacement) -> f64 {
        match self {
            Self::Euclidean => a.position.distance_to(b.position),
            Self::Manhattan => a.position.manhattan_distance_to(b.position) as f64,
        }
    }
}

fn at_coordinate(placement: &UnitPlacement, map_id: &str, x: i32, y: i32) -> bool {
    placement.map_id == map_id && placement.position.x == x && placement.position.y == y
}

/// Every record standing on `(x, y)` of `map_id`.
pub fn positions_at<'a>(
    records: &'a [UnitPlacement],
    map_id: &str,
    x: i32,
    y: i32,
) -> Vec<&'a UnitPlacement> {
    records
        .iter()
        .filter(|p| at_coordinate(p, map_id, x, y))
        .collect()
}

/// The first record standing on `(x, y)` of `map_id`.
pub fn position_at<'a>(
    records: &'a [UnitPlacement],
    map_id: &str,
    x: i32,
    y: i32,
) -> Option<&'a UnitPlacement> {
    records.iter().find(|p| at_coordinate(p, map_id, x, y))
}

/// Groups of records that share a cell.
///
/// Only groups with more than one record are returned, ordered by where each
/// group first appears in `records`. Useful after a bulk import, before the
/// records are handed to a [`gw_core::World`].
pub fn find_collisions(records: &[UnitPlacement]) -> Vec<Vec<&UnitPlacement>> {
    let mut groups: Vec<Vec<&UnitPlacement>> = Vec::new();
    let mut by_cell: HashMap<(&str, i32, i32), usize> = HashMap::new();

    for record in records {
        let key = (
            record.map_id.as_str(),
            record.position.x,
            record.position.y,
        );
        match by_cell.get(&key) {
            Some(&index) => groups[index].push(record),
            None => {
                by_cell.insert(key, groups.len());
                groups.push(vec![record]);
            }
        }
    }

    groups.retain(|group| group.len() > 1);
    if !groups.is_empty() {
        debug!(collisions = groups.len(), "shared cells found");
    }
    groups
}

/// Records on one map.
pub fn positions_in_map<'a>(records: &'a [UnitPlacement], map_id: &str) -> Vec<&'a UnitPlacement> {
    records.iter().filter(|p| p.map_id == map_id).collect()
}

/// Records on the reference's map within `range` of it, the reference unit
/// itself excluded.
pub fn positions_within_range<'a>(
    records: &'a [UnitPlacement],
    reference: &UnitPlacement,
    range: f64,
    metric: DistanceMetric,
) -> Vec<&'a UnitPlacement> {
    records
        .iter()
        .filter(|p| p.unit_id != reference.unit_id)
        .filter(|p| p.map_id == reference.map_id)
        .filter(|p| metric.measure(reference, p) <= range)
        .collect()
}

/// Euclidean distance between two records; infinite across maps.
pub fn distance_between(a: &UnitPlacement, b: &UnitPlacement) -> f64 {
    if a.map_id != b.map_id {
        return f64::INFINITY;
    }
    a.position.distance_to(b.position)
}

/// Whether two records are neighbours on the same map.
///
/// With `allow_diagonal` any cell at Chebyshev distance 1 counts; otherwise
/// only the four cardinal neighbours do. Height is ignored.
pub fn are_adjacent(a: &UnitPlacement, b: &UnitPlacement, allow_diagonal: bool) -> bool {
    if a.map_id != b.map_id {
        return false;
    }
    let (from, to) = (a.position.planar(), b.position.planar());
    if allow_diagonal {
        from.chebyshev_distance_to(to) == 1
    } else {
        from.manhattan_distance_to(to) == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gw_core::Position;

    fn rec(id: &str, map: &str, x: i32, y: i32) -> UnitPlacement {
        UnitPlacement::new(id, map, Position::new(x, y))
    }

    fn sample() -> Vec<UnitPlacement> {
        vec![
            rec("a", "field", 0, 0),
            rec("b", "field", 3, 4),
            rec("c", "field", 1, 1),
            rec("d", "cave", 0, 0),
            rec("e", "field", 1, 1),
        ]
    }

    #[test]
    fn exact_coordinate_lookups() {
        let records = sample();
        let hits = positions_at(&records, "field", 1, 1);
        assert_eq!(hits.len(), 2);
        assert_eq!(
            position_at(&records, "field", 1, 1).map(|p| p.unit_id.as_str()),
            Some("c")
        );
        assert_eq!(
            position_at(&records, "cave", 0, 0).map(|p| p.unit_id.as_str()),
            Some("d")
        );
        assert!(position_at(&records, "cave", 1, 1).is_none());
    }

    #[test]
    fn collisions_group_shared_cells() {
        let mut records = sample();
        records.push(rec("f", "cave", 0, 0));
        let groups = find_collisions(&records);
        assert_eq!(groups.len(), 2);
        let first: Vec<&str> = groups[0].iter().map(|p| p.unit_id.as_str()).collect();
        let second: Vec<&str> = groups[1].iter().map(|p| p.unit_id.as_str()).collect();
        assert_eq!(first, vec!["c", "e"]);
        assert_eq!(second, vec!["d", "f"]);
    }

    #[test]
    fn no_collisions_for_distinct_cells() {
        let records = vec![rec("a", "m", 0, 0), rec("b", "m", 0, 1), rec("c", "n", 0, 0)];
        assert!(find_collisions(&records).is_empty());
    }

    #[test]
    fn filter_by_map() {
        let records = sample();
        assert_eq!(positions_in_map(&records, "field").len(), 4);
        assert_eq!(positions_in_map(&records, "cave").len(), 1);
        assert!(positions_in_map(&records, "sky").is_empty());
    }

    #[test]
    fn range_query_respects_metric() {
        let records = sample();
        let reference = &records[0];

        let euclid = positions_within_range(&records, reference, 1.5, DistanceMetric::Euclidean);
        let ids: Vec<&str> = euclid.iter().map(|p| p.unit_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "e"]);

        let manhattan =
            positions_within_range(&records, reference, 1.5, DistanceMetric::Manhattan);
        assert!(manhattan.is_empty());

        let wide = positions_within_range(&records, reference, 5.0, DistanceMetric::Euclidean);
        assert_eq!(wide.len(), 3);
        assert!(wide.iter().all(|p| p.map_id == "field" && p.unit_id.as_str() != "a"));
    }

    #[test]
    fn distance_across_maps_is_infinite() {
        let records = sample();
        assert!((distance_between(&records[0], &records[1]) - 5.0).abs() < f64::EPSILON);
        assert_eq!(distance_between(&records[0], &records[3]), f64::INFINITY);
    }

    #[test]
    fn adjacency_rules() {
        let a = rec("a", "m", 2, 2);
        assert!(are_adjacent(&a, &rec("b", "m", 2, 3), false));
        assert!(!are_adjacent(&a, &rec("b", "m", 3, 3), false));
        assert!(are_adjacent(&a, &rec("b", "m", 3, 3), true));
        assert!(!are_adjacent(&a, &rec("b", "m", 2, 2), true));
        assert!(!are_adjacent(&a, &rec("b", "other", 2, 3), true));
        let raised = UnitPlacement::new("b", "m", Position::new_3d(2, 3, 5));
        assert!(are_adjacent(&a, &raised, false));
    }
}
