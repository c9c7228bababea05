use crate::geometry::Coordinate;

/// Returns the minimum distance from point `p` to the segment `a`-`b`.
#[must_use]
pub fn point_to_segment(p: &Coordinate, a: &Coordinate, b: &Coordinate) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return p.distance(a);
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);

    let closest = Coordinate::new(a.x + t * dx, a.y + t * dy);
    p.distance(&closest)
}

/// Returns the minimum distance from point `p` to a polyline.
///
/// Returns infinity for a polyline with fewer than 2 points.
#[must_use]
pub fn point_to_line(p: &Coordinate, line: &[Coordinate]) -> f64 {
    let mut min = f64::INFINITY;
    for w in line.windows(2) {
        let d = point_to_segment(p, &w[0], &w[1]);
        if d < min {
            min = d;
        }
    }
    min
}

/// Returns the minimum distance from point `p` to any polyline in a set.
#[must_use]
pub fn point_to_linework(p: &Coordinate, lines: &[Vec<Coordinate>]) -> f64 {
    let mut min = f64::INFINITY;
    for line in lines {
        let d = point_to_line(p, line);
        if d < min {
            min = d;
        }
    }
    min
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn segment_dist_perpendicular_projection() {
        // Point (1, 1) to segment (0,0)→(2,0). Closest at (1,0), dist = 1.
        let d = point_to_segment(&c(1.0, 1.0), &c(0.0, 0.0), &c(2.0, 0.0));
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_endpoint_closest() {
        // Point (-1, 0) to segment (0,0)→(2,0). Closest at (0,0), dist = 1.
        let d = point_to_segment(&c(-1.0, 0.0), &c(0.0, 0.0), &c(2.0, 0.0));
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn segment_dist_degenerate() {
        // Zero-length segment: distance is point-to-point.
        let d = point_to_segment(&c(3.0, 4.0), &c(0.0, 0.0), &c(0.0, 0.0));
        assert!((d - 5.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn line_dist_takes_minimum_over_segments() {
        let line = vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0)];
        let d = point_to_line(&c(11.0, 5.0), &line);
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn linework_dist_takes_minimum_over_lines() {
        let lines = vec![
            vec![c(0.0, 0.0), c(10.0, 0.0)],
            vec![c(0.0, 3.0), c(10.0, 3.0)],
        ];
        let d = point_to_linework(&c(5.0, 2.0), &lines);
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }
}
