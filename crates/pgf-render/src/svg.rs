//! SVG rendering of a recorded [`Figure`] with `plotters`

use plotters::prelude::*;

use crate::axes::{LineStyle, Marker};
use crate::config::PlotStyle;
use crate::figure::{Artist, Figure};
use crate::{RenderError, Result};

const DASH_PIECES: usize = 24;
const BOX_HALF_WIDTH: f64 = 0.3;

fn drawing<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

fn rgb([r, g, b]: [u8; 3]) -> RGBColor {
    RGBColor(r, g, b)
}

/// Data extent of every artist on a figure
struct Bounds {
    x: (f64, f64),
    y: (f64, f64),
}

impl Bounds {
    fn of(figure: &Figure) -> Self {
        let mut bounds = Bounds {
            x: (f64::INFINITY, f64::NEG_INFINITY),
            y: (f64::INFINITY, f64::NEG_INFINITY),
        };

        for artist in figure.artists() {
            match artist {
                Artist::Bar(bin) => {
                    bounds.include(bin.start, 0.0);
                    bounds.include(bin.end, bin.count as f64);
                }
                Artist::Box { position, summary, .. } => {
                    bounds.include(position - 0.5, summary.min);
                    bounds.include(position + 0.5, summary.max);
                }
                _ => {
                    for &(x, y) in artist.points() {
                        bounds.include(x, y);
                    }
                }
            }
        }

        Bounds {
            x: pad(bounds.x),
            y: pad(bounds.y),
        }
    }

    fn include(&mut self, x: f64, y: f64) {
        if x.is_finite() {
            self.x = (self.x.0.min(x), self.x.1.max(x));
        }
        if y.is_finite() {
            self.y = (self.y.0.min(y), self.y.1.max(y));
        }
    }
}

fn pad((lo, hi): (f64, f64)) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - 0.5, hi + 0.5);
    }
    let margin = (hi - lo) * 0.05;
    (lo - margin, hi + margin)
}

/// Split a polyline into alternating dash segments
fn dashes(points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    points
        .windows(2)
        .flat_map(|w| {
            let ((x0, y0), (x1, y1)) = (w[0], w[1]);
            let at = move |t: f64| (x0 + (x1 - x0) * t, y0 + (y1 - y0) * t);
            (0..DASH_PIECES).step_by(2).map(move |i| {
                vec![
                    at(i as f64 / DASH_PIECES as f64),
                    at((i + 1) as f64 / DASH_PIECES as f64),
                ]
            })
        })
        .collect()
}

/// Expand post-step points into a polyline with vertical risers
fn step_path(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut path = Vec::with_capacity(points.len() * 2);
    let mut prev_y = None;
    for &(x, y) in points {
        if let Some(prev) = prev_y {
            path.push((x, prev));
        }
        path.push((x, y));
        prev_y = Some(y);
    }
    path
}

/// Categorical label for integer box positions, empty elsewhere
fn tick_label(ticks: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 1.0 {
        return String::new();
    }
    ticks.get(rounded as usize - 1).cloned().unwrap_or_default()
}

pub(crate) fn render(figure: &Figure, style: &PlotStyle) -> Result<String> {
    let bounds = Bounds::of(figure);
    let data_color = rgb(style.data_color);
    let bar_color = rgb(style.bar_color);
    let marker_size = style.marker_size as i32;
    let ticks = figure.tick_labels();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(figure.title(), ("sans-serif", style.title_font_size))
            .margin(style.margin)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(bounds.x.0..bounds.x.1, bounds.y.0..bounds.y.1)
            .map_err(drawing)?;

        let tick_formatter = |x: &f64| tick_label(ticks, *x);
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(figure.xlabel()).y_desc(figure.ylabel());
        if !style.show_grid {
            mesh.disable_mesh();
        }
        if !ticks.is_empty() {
            mesh.x_labels(ticks.len() + 2).x_label_formatter(&tick_formatter);
        }
        mesh.draw().map_err(drawing)?;

        for artist in figure.artists() {
            match artist {
                Artist::Scatter { points, marker, label } => {
                    let anno = match marker {
                        Marker::Circle => chart.draw_series(
                            points.iter().map(|&p| Circle::new(p, marker_size, data_color.filled())),
                        ),
                        Marker::Cross => chart.draw_series(
                            points.iter().map(|&p| Cross::new(p, marker_size, data_color.stroke_width(1))),
                        ),
                        Marker::Triangle => chart.draw_series(
                            points
                                .iter()
                                .map(|&p| TriangleMarker::new(p, marker_size, data_color.filled())),
                        ),
                    }
                    .map_err(drawing)?;
                    if let Some(label) = label {
                        anno.label(label)
                            .legend(move |(x, y)| Circle::new((x, y), marker_size, data_color.filled()));
                    }
                }
                Artist::Line {
                    points,
                    style: line_style,
                    color,
                    label,
                } => {
                    let color = color.map_or(data_color, rgb);
                    let anno = match line_style {
                        LineStyle::Solid => {
                            chart.draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
                        }
                        LineStyle::Dashed => chart.draw_series(
                            dashes(points)
                                .into_iter()
                                .map(|segment| PathElement::new(segment, color.stroke_width(2))),
                        ),
                    }
                    .map_err(drawing)?;
                    if let Some(label) = label {
                        anno.label(label)
                            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
                    }
                }
                Artist::Step { points, label } => {
                    let anno = chart
                        .draw_series(LineSeries::new(step_path(points), data_color.stroke_width(2)))
                        .map_err(drawing)?;
                    if let Some(label) = label {
                        anno.label(label).legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], data_color.stroke_width(2))
                        });
                    }
                }
                Artist::Bar(bin) => {
                    let corners = [(bin.start, 0.0), (bin.end, bin.count as f64)];
                    chart
                        .draw_series([
                            Rectangle::new(corners, bar_color.filled()),
                            Rectangle::new(corners, WHITE.stroke_width(1)),
                        ])
                        .map_err(drawing)?;
                }
                Artist::Box { position, summary, .. } => {
                    let x = *position;
                    let (lo, hi) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);
                    let (cap_lo, cap_hi) = (x - BOX_HALF_WIDTH / 2.0, x + BOX_HALF_WIDTH / 2.0);
                    let stroke = BLACK.stroke_width(1);

                    chart
                        .draw_series([Rectangle::new([(lo, summary.q1), (hi, summary.q3)], bar_color.filled())])
                        .map_err(drawing)?;
                    chart
                        .draw_series([
                            PathElement::new(
                                vec![
                                    (lo, summary.q1),
                                    (hi, summary.q1),
                                    (hi, summary.q3),
                                    (lo, summary.q3),
                                    (lo, summary.q1),
                                ],
                                stroke,
                            ),
                            PathElement::new(vec![(lo, summary.median), (hi, summary.median)], stroke),
                            PathElement::new(vec![(x, summary.q3), (x, summary.whisker_high)], stroke),
                            PathElement::new(vec![(x, summary.q1), (x, summary.whisker_low)], stroke),
                            PathElement::new(
                                vec![(cap_lo, summary.whisker_high), (cap_hi, summary.whisker_high)],
                                stroke,
                            ),
                            PathElement::new(
                                vec![(cap_lo, summary.whisker_low), (cap_hi, summary.whisker_low)],
                                stroke,
                            ),
                        ])
                        .map_err(drawing)?;
                    chart
                        .draw_series(summary.outliers.iter().map(|&v| Circle::new((x, v), marker_size, stroke)))
                        .map_err(drawing)?;
                }
            }
        }

        if figure.has_legend() {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(drawing)?;
        }

        root.present().map_err(drawing)?;
    }

    tracing::debug!(
        "Rendered '{}' with {} artists to {} bytes of SVG",
        figure.title(),
        figure.artists().len(),
        svg.len()
    );
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::{box_plot, cdf_plot, histogram_plot, qq_plot};
    use pgf_data::{Frame, Series};

    #[test]
    fn test_pad_degenerate_ranges() {
        assert_eq!(pad((2.0, 2.0)), (1.5, 2.5));
        assert_eq!(pad((f64::INFINITY, f64::NEG_INFINITY)), (0.0, 1.0));
        let (lo, hi) = pad((0.0, 10.0));
        assert!(lo < 0.0 && hi > 10.0);
    }

    #[test]
    fn test_step_path_holds_values() {
        let path = step_path(&[(1.0, 0.25), (2.0, 0.5), (4.0, 1.0)]);
        assert_eq!(path, vec![(1.0, 0.25), (2.0, 0.25), (2.0, 0.5), (4.0, 0.5), (4.0, 1.0)]);
    }

    #[test]
    fn test_dashes_cover_half_the_segment() {
        let segments = dashes(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(segments.len(), DASH_PIECES / 2);
        assert_eq!(segments[0][0], (0.0, 0.0));
    }

    #[test]
    fn test_tick_label_positions() {
        let ticks = vec!["a".to_string(), "b".to_string()];
        assert_eq!(tick_label(&ticks, 1.0), "a");
        assert_eq!(tick_label(&ticks, 2.0), "b");
        assert_eq!(tick_label(&ticks, 1.5), "");
        assert_eq!(tick_label(&ticks, 0.0), "");
        assert_eq!(tick_label(&ticks, 3.0), "");
    }

    #[test]
    fn test_render_every_plot_kind() {
        let series = Series::from_values("values", [1.0, 2.0, 2.5, 3.0, 7.5, 4.0]);
        let frame = Frame::from_columns(vec![
            series.clone(),
            Series::from_values("group", ["a", "b", "a", "b", "a", "b"]),
        ])
        .unwrap();
        let style = PlotStyle::default();

        let figures: Vec<Figure> = vec![
            qq_plot(&series, None, Marker::Triangle).unwrap(),
            histogram_plot(&series, 3usize, None).unwrap(),
            cdf_plot(&series, None, None).unwrap(),
            box_plot(&frame, None, Some("group"), None).unwrap(),
        ];

        for figure in &figures {
            let svg = figure.render_svg(&style).unwrap();
            assert!(svg.contains("<svg"));
            assert!(svg.contains(figure.title()));
        }
    }

    #[test]
    fn test_render_empty_figure() {
        let style = PlotStyle {
            show_grid: false,
            ..PlotStyle::default()
        };
        let svg = Figure::new().render_svg(&style).unwrap();
        assert!(svg.contains("<svg"));
    }
}
