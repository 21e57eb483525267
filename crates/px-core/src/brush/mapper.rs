//! Pure mapping from brush-gesture pixel geometry to record ids

use crate::record::{IdSet, RecordSet};

/// An invertible linear mapping between data space and pixel space.
///
/// The inverse extrapolates past the configured domain; a brush drawn
/// beyond the plotted extent inverts to out-of-domain data values and
/// simply encloses nothing extra.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Map a data value to a pixel coordinate
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Map a pixel coordinate back to a data value
    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }
}

/// A brush rectangle in pixel space, `[[x0, y0], [x1, y1]]` with
/// `x0 <= x1` and `y0 <= y1` as the gesture layer reports it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl PixelRect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

/// Map a 2-D brush rectangle to the ids of records strictly inside it,
/// in record order.
///
/// Pixel y grows downward, so the y bounds swap when the corners are
/// inverted into data space. An absent rectangle (cleared or
/// non-rectangular gesture) maps to `None`, never to an empty set.
pub fn brushed_ids(
    rect: Option<PixelRect>,
    x_scale: &LinearScale,
    y_scale: &LinearScale,
    records: &RecordSet,
) -> Option<IdSet> {
    let rect = rect?;
    let x_min = x_scale.invert(rect.x0);
    let x_max = x_scale.invert(rect.x1);
    let y_min = y_scale.invert(rect.y1);
    let y_max = y_scale.invert(rect.y0);

    Some(
        records
            .records()
            .iter()
            .filter(|record| {
                record.x > x_min && record.x < x_max && record.y > y_min && record.y < y_max
            })
            .map(|record| record.id)
            .collect(),
    )
}

/// Map a 1-D brush interval (a scatterplot-matrix axis brush) to a
/// data-space range, normalized so the lower bound comes first
pub fn brush_interval(interval: Option<(f64, f64)>, scale: &LinearScale) -> Option<(f64, f64)> {
    let (p0, p1) = interval?;
    let a = scale.invert(p0);
    let b = scale.invert(p1);
    Some(if a <= b { (a, b) } else { (b, a) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use indexmap::IndexMap;

    fn record_at(id: u64, x: f64, y: f64) -> Record {
        Record::new(id, x, y, IndexMap::new())
    }

    /// 100x100 pixel chart over a [0, 10] x [0, 10] data square, with
    /// the pixel y axis pointing down as on screen
    fn scales() -> (LinearScale, LinearScale) {
        let x_scale = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        let y_scale = LinearScale::new((0.0, 10.0), (100.0, 0.0));
        (x_scale, y_scale)
    }

    #[test]
    fn test_scale_round_trip_and_extrapolation() {
        let (x_scale, y_scale) = scales();
        assert_eq!(x_scale.apply(5.0), 50.0);
        assert_eq!(x_scale.invert(50.0), 5.0);
        // Descending pixel range inverts too
        assert_eq!(y_scale.apply(0.0), 100.0);
        assert_eq!(y_scale.invert(0.0), 10.0);
        // No clamping: inversion extrapolates beyond the domain
        assert_eq!(x_scale.invert(150.0), 15.0);
    }

    #[test]
    fn test_brushed_ids_swaps_y_on_inversion() {
        let records = RecordSet::new(vec![
            record_at(0, 2.0, 8.0),
            record_at(1, 5.0, 5.0),
            record_at(2, 9.0, 1.0),
        ])
        .unwrap();
        let (x_scale, y_scale) = scales();

        // Pixel rect covering data x in (1, 6), y in (4, 9)
        let rect = PixelRect::new(10.0, 10.0, 60.0, 60.0);
        let ids = brushed_ids(Some(rect), &x_scale, &y_scale, &records).unwrap();

        assert!(ids.contains(&0));
        assert!(ids.contains(&1));
        assert!(!ids.contains(&2));
    }

    #[test]
    fn test_membership_is_strict() {
        let records = RecordSet::new(vec![
            record_at(0, 1.0, 5.0),
            record_at(1, 3.0, 5.0),
        ])
        .unwrap();
        let (x_scale, y_scale) = scales();

        // Data-space bounds land exactly on record 0's x
        let rect = PixelRect::new(10.0, 0.0, 100.0, 100.0);
        let ids = brushed_ids(Some(rect), &x_scale, &y_scale, &records).unwrap();

        assert!(!ids.contains(&0));
        assert!(ids.contains(&1));
    }

    #[test]
    fn test_absent_rect_maps_to_absent() {
        let records = RecordSet::new(vec![record_at(0, 5.0, 5.0)]).unwrap();
        let (x_scale, y_scale) = scales();
        assert!(brushed_ids(None, &x_scale, &y_scale, &records).is_none());
    }

    #[test]
    fn test_brushed_ids_preserves_record_order() {
        let records = RecordSet::new(vec![
            record_at(9, 5.0, 5.0),
            record_at(3, 6.0, 6.0),
            record_at(7, 4.0, 4.0),
        ])
        .unwrap();
        let (x_scale, y_scale) = scales();

        let rect = PixelRect::new(0.0, 0.0, 100.0, 100.0);
        let ids = brushed_ids(Some(rect), &x_scale, &y_scale, &records).unwrap();

        assert_eq!(ids.iter().copied().collect::<Vec<_>>(), vec![9, 3, 7]);
    }

    #[test]
    fn test_interval_normalizes_against_descending_scale() {
        let (_, y_scale) = scales();
        // A downward pixel interval inverts to a descending data pair
        let range = brush_interval(Some((20.0, 70.0)), &y_scale).unwrap();
        assert_eq!(range, (3.0, 8.0));

        assert!(brush_interval(None, &y_scale).is_none());
    }
}
