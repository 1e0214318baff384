use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke},
    Color, Pixels, Point, Rectangle, Renderer, Size, Theme,
};
use tipscore::processing::{PlotBounds, PlotPoint, PlotSpec};

const MARGIN_LEFT: f32 = 52.0;
const MARGIN_RIGHT: f32 = 18.0;
const MARGIN_TOP: f32 = 34.0;
const MARGIN_BOTTOM: f32 = 42.0;
const TICKS: usize = 5;

/// Maps data coordinates onto the canvas plot area.
#[derive(Debug, Clone, Copy)]
struct Projection {
    data: PlotBounds,
    area: Rectangle,
}

impl Projection {
    fn new(bounds: PlotBounds, size: Size) -> Self {
        Self {
            data: padded(bounds),
            area: Rectangle {
                x: MARGIN_LEFT,
                y: MARGIN_TOP,
                width: (size.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
                height: (size.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
            },
        }
    }

    fn project(&self, point: PlotPoint) -> Point {
        let fx = (point.x - self.data.x_min) / (self.data.x_max - self.data.x_min);
        let fy = (point.y - self.data.y_min) / (self.data.y_max - self.data.y_min);
        Point::new(
            self.area.x + fx as f32 * self.area.width,
            self.area.y + self.area.height - fy as f32 * self.area.height,
        )
    }
}

/// Widens a degenerate extent and anchors the tip axis at zero.
fn padded(bounds: PlotBounds) -> PlotBounds {
    let (mut x_min, mut x_max) = (bounds.x_min, bounds.x_max);
    if x_max - x_min < f64::EPSILON {
        x_min -= 1.0;
        x_max += 1.0;
    }
    let x_pad = (x_max - x_min) * 0.05;
    let y_min = bounds.y_min.min(0.0);
    let mut y_max = bounds.y_max * 1.1;
    if y_max - y_min < f64::EPSILON {
        y_max = y_min + 1.0;
    }
    PlotBounds {
        x_min: x_min - x_pad,
        x_max: x_max + x_pad,
        y_min,
        y_max,
    }
}

#[derive(Clone)]
pub struct ScatterChart {
    plot: PlotSpec,
}

impl ScatterChart {
    pub fn new(plot: &PlotSpec) -> Self {
        Self { plot: plot.clone() }
    }
}

fn label(frame: &mut Frame, content: String, position: Point, size: f32) {
    frame.fill_text(canvas::Text {
        content,
        position,
        color: Color::from_rgb(0.75, 0.75, 0.8),
        size: Pixels(size),
        ..canvas::Text::default()
    });
}

impl<Message> canvas::Program<Message> for ScatterChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.05),
        );
        label(
            &mut frame,
            self.plot.title.clone(),
            Point::new(MARGIN_LEFT, 8.0),
            16.0,
        );

        let Some(data_bounds) = self.plot.bounds() else {
            return vec![frame.into_geometry()];
        };
        let projection = Projection::new(data_bounds, bounds.size());
        let area = projection.area;

        let axes = Path::new(|builder| {
            builder.move_to(Point::new(area.x, area.y));
            builder.line_to(Point::new(area.x, area.y + area.height));
            builder.line_to(Point::new(area.x + area.width, area.y + area.height));
        });
        frame.stroke(
            &axes,
            Stroke::default()
                .with_color(Color::from_rgb(0.35, 0.35, 0.45))
                .with_width(1.0),
        );

        let data = projection.data;
        for tick in 0..=TICKS {
            let t = tick as f64 / TICKS as f64;
            let x_value = data.x_min + t * (data.x_max - data.x_min);
            let y_value = data.y_min + t * (data.y_max - data.y_min);
            let x_pos = projection.project(PlotPoint {
                x: x_value,
                y: data.y_min,
            });
            let y_pos = projection.project(PlotPoint {
                x: data.x_min,
                y: y_value,
            });
            label(
                &mut frame,
                format!("{x_value:.0}"),
                Point::new(x_pos.x - 8.0, x_pos.y + 6.0),
                11.0,
            );
            label(
                &mut frame,
                format!("{y_value:.1}"),
                Point::new(y_pos.x - 34.0, y_pos.y - 6.0),
                11.0,
            );
        }
        label(
            &mut frame,
            self.plot.x_label.clone(),
            Point::new(area.x + area.width / 2.0 - 40.0, bounds.height - 18.0),
            12.0,
        );
        label(
            &mut frame,
            self.plot.y_label.clone(),
            Point::new(4.0, MARGIN_TOP - 16.0),
            12.0,
        );

        for point in &self.plot.points {
            let marker = Path::new(|builder| builder.circle(projection.project(*point), 3.5));
            frame.fill(&marker, Color::from_rgb(0.18, 0.72, 0.89));
        }

        if let Some(trend) = &self.plot.trend {
            let line = Path::line(projection.project(trend.start), projection.project(trend.end));
            frame.stroke(
                &line,
                Stroke::default()
                    .with_width(2.5)
                    .with_color(Color::from_rgb(0.92, 0.25, 0.2)),
            );
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> PlotBounds {
        PlotBounds {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    #[test]
    fn single_point_extent_is_widened() {
        let padded = padded(bounds(10.0, 10.0, 1.0, 1.0));
        assert!(padded.x_min < 10.0 && padded.x_max > 10.0);
        assert_eq!(padded.y_min, 0.0);
        assert!(padded.y_max > 1.0);
    }

    #[test]
    fn projection_keeps_points_inside_plot_area() {
        let projection = Projection::new(bounds(3.0, 50.0, 1.0, 10.0), Size::new(400.0, 300.0));
        for point in [
            PlotPoint { x: 3.0, y: 1.0 },
            PlotPoint { x: 50.0, y: 10.0 },
            PlotPoint { x: 20.0, y: 4.0 },
        ] {
            let p = projection.project(point);
            assert!(p.x >= projection.area.x && p.x <= projection.area.x + projection.area.width);
            assert!(p.y >= projection.area.y && p.y <= projection.area.y + projection.area.height);
        }
    }

    #[test]
    fn larger_tips_are_drawn_higher() {
        let projection = Projection::new(bounds(0.0, 10.0, 0.0, 10.0), Size::new(200.0, 200.0));
        let low = projection.project(PlotPoint { x: 5.0, y: 1.0 });
        let high = projection.project(PlotPoint { x: 5.0, y: 9.0 });
        assert!(high.y < low.y);
    }
}
