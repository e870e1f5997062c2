//! Chart geometry mappers.
//!
//! Pure functions from tallied series to screen-space primitives. No
//! state and no clock: the same input always produces the same
//! coordinates, so renderers (SVG export, TUI canvas) can treat the
//! output as a snapshot.

/// A point in chart space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Fixed viewport a line chart is scaled into.
#[derive(Debug, Clone, Copy)]
pub struct ChartFrame {
    /// Full viewport width
    pub width: f64,
    /// Full viewport height
    pub height: f64,
    /// Padding on the left/top before the plot area
    pub padding: f64,
    /// Plot area width
    pub plot_width: f64,
    /// Plot area height
    pub plot_height: f64,
}

impl Default for ChartFrame {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 350.0,
            padding: 70.0,
            plot_width: 780.0,
            plot_height: 220.0,
        }
    }
}

impl ChartFrame {
    /// The y coordinate of the plot baseline (count zero).
    pub fn baseline(&self) -> f64 {
        self.padding + self.plot_height
    }
}

/// Line chart layout: one point per bucket plus the closed area polygon
/// underneath the line.
#[derive(Debug, Clone)]
pub struct LineLayout {
    /// Data points, left to right
    pub points: Vec<Point>,
    /// Area polygon: baseline start, the data points, baseline end
    pub area: Vec<Point>,
    /// The vertical scale maximum (at least 1, so empty data stays flat
    /// on the baseline instead of dividing by zero)
    pub max_count: i64,
}

/// Scale a series of counts into the frame with evenly spaced x
/// positions and linear vertical interpolation.
pub fn line_layout(counts: &[i64], frame: &ChartFrame) -> LineLayout {
    let max_count = counts.iter().copied().max().unwrap_or(0).max(1);
    let step_x = if counts.len() > 1 {
        frame.plot_width / (counts.len() - 1) as f64
    } else {
        frame.plot_width
    };

    let points: Vec<Point> = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| Point {
            x: frame.padding + i as f64 * step_x,
            y: frame.padding + frame.plot_height
                - (count as f64 / max_count as f64) * frame.plot_height,
        })
        .collect();

    let mut area = Vec::with_capacity(points.len() + 2);
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        area.push(Point {
            x: first.x,
            y: frame.baseline(),
        });
        area.extend(points.iter().copied());
        area.push(Point {
            x: last.x,
            y: frame.baseline(),
        });
    }

    LineLayout {
        points,
        area,
        max_count,
    }
}

/// Horizontal gridline positions with their count labels, top to bottom.
pub fn y_axis_ticks(max_count: i64, frame: &ChartFrame, divisions: u32) -> Vec<(i64, f64)> {
    let divisions = divisions.max(1);
    (0..=divisions)
        .map(|i| {
            let value =
                ((max_count as f64 / divisions as f64) * (divisions - i) as f64).round() as i64;
            let y = frame.padding + frame.plot_height * (i as f64 / divisions as f64);
            (value, y)
        })
        .collect()
}

/// Circle a pie chart is drawn on.
#[derive(Debug, Clone, Copy)]
pub struct PieGeometry {
    pub center: Point,
    pub radius: f64,
}

impl Default for PieGeometry {
    fn default() -> Self {
        Self {
            center: Point { x: 100.0, y: 100.0 },
            radius: 80.0,
        }
    }
}

/// One pie slice. Angles are degrees; the sweep starts at -90 (12
/// o'clock) and proceeds clockwise.
#[derive(Debug, Clone, Copy)]
pub struct PieSlice {
    /// Index into the input values (zero-value entries are skipped, so
    /// this maps a slice back to its label/color)
    pub index: usize,
    pub value: i64,
    /// Share of the total, 0..=1
    pub fraction: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Whether the arc spans more than half the circle
    pub large_arc: bool,
    /// Arc start point on the circle
    pub start_point: Point,
    /// Arc end point on the circle
    pub end_point: Point,
}

impl PieSlice {
    /// Share of the total as a percentage.
    pub fn percentage(&self) -> f64 {
        self.fraction * 100.0
    }
}

fn point_at(geometry: &PieGeometry, angle_deg: f64) -> Point {
    let rad = angle_deg.to_radians();
    Point {
        x: geometry.center.x + geometry.radius * rad.cos(),
        y: geometry.center.y + geometry.radius * rad.sin(),
    }
}

/// Proportional slices for a pie chart. Zero-value entries produce no
/// slice; an all-zero input produces an empty chart.
pub fn pie_slices(values: &[i64], geometry: &PieGeometry) -> Vec<PieSlice> {
    let total: i64 = values.iter().filter(|&&v| v > 0).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut current_angle = -90.0;
    values
        .iter()
        .enumerate()
        .filter(|&(_, &value)| value > 0)
        .map(|(index, &value)| {
            let fraction = value as f64 / total as f64;
            let sweep = fraction * 360.0;
            let start_angle = current_angle;
            let end_angle = current_angle + sweep;
            current_angle = end_angle;

            PieSlice {
                index,
                value,
                fraction,
                start_angle,
                end_angle,
                large_arc: sweep > 180.0,
                start_point: point_at(geometry, start_angle),
                end_point: point_at(geometry, end_angle),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {} ~= {}", a, b);
    }

    #[test]
    fn test_line_layout_scaling() {
        let layout = line_layout(&[0, 5, 10], &ChartFrame::default());

        assert_eq!(layout.max_count, 10);
        assert_eq!(layout.points.len(), 3);
        assert_close(layout.points[0].x, 70.0);
        assert_close(layout.points[0].y, 290.0); // zero sits on the baseline
        assert_close(layout.points[1].x, 460.0);
        assert_close(layout.points[1].y, 180.0); // half height
        assert_close(layout.points[2].x, 850.0);
        assert_close(layout.points[2].y, 70.0); // max reaches the top
    }

    #[test]
    fn test_line_layout_empty_and_flat() {
        let empty = line_layout(&[], &ChartFrame::default());
        assert!(empty.points.is_empty());
        assert!(empty.area.is_empty());
        assert_eq!(empty.max_count, 1);

        // All-zero data stays on the baseline instead of dividing by zero
        let flat = line_layout(&[0, 0, 0], &ChartFrame::default());
        assert!(flat.points.iter().all(|p| (p.y - 290.0).abs() < 1e-9));
    }

    #[test]
    fn test_area_polygon_is_closed_to_baseline() {
        let layout = line_layout(&[1, 3], &ChartFrame::default());
        assert_eq!(layout.area.len(), 4);
        assert_close(layout.area[0].y, 290.0);
        assert_close(layout.area[3].y, 290.0);
        assert_close(layout.area[0].x, layout.points[0].x);
        assert_close(layout.area[3].x, layout.points[1].x);
    }

    #[test]
    fn test_y_axis_ticks() {
        let ticks = y_axis_ticks(10, &ChartFrame::default(), 5);
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[0].0, 10);
        assert_eq!(ticks[5].0, 0);
        assert_close(ticks[0].1, 70.0);
        assert_close(ticks[5].1, 290.0);
    }

    #[test]
    fn test_pie_starts_at_twelve_oclock() {
        let slices = pie_slices(&[1, 1], &PieGeometry::default());
        assert_eq!(slices.len(), 2);

        assert_close(slices[0].start_angle, -90.0);
        assert_close(slices[0].end_angle, 90.0);
        assert_close(slices[1].end_angle, 270.0);
        assert_close(slices[0].fraction, 0.5);
        assert!(!slices[0].large_arc);

        // Start point is straight up from the center
        assert_close(slices[0].start_point.x, 100.0);
        assert_close(slices[0].start_point.y, 20.0);
    }

    #[test]
    fn test_pie_skips_zero_values_and_keeps_indices() {
        let slices = pie_slices(&[3, 0, 1], &PieGeometry::default());
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].index, 0);
        assert_eq!(slices[1].index, 2);
        assert_close(slices[0].fraction, 0.75);
        assert!(slices[0].large_arc);
        assert_close(slices[0].percentage(), 75.0);
        // Slices tile the full circle
        assert_close(slices[1].end_angle, 270.0);
    }

    #[test]
    fn test_pie_empty_when_all_zero() {
        assert!(pie_slices(&[0, 0], &PieGeometry::default()).is_empty());
        assert!(pie_slices(&[], &PieGeometry::default()).is_empty());
    }

    #[test]
    fn test_pie_deterministic() {
        let a = pie_slices(&[2, 5, 9], &PieGeometry::default());
        let b = pie_slices(&[2, 5, 9], &PieGeometry::default());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.start_angle, y.start_angle);
            assert_eq!(x.end_angle, y.end_angle);
            assert_eq!(x.start_point, y.start_point);
            assert_eq!(x.end_point, y.end_point);
        }
    }
}
