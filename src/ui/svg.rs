//! Inline SVG rendering of track traces.

use crate::normalize::TrackSeries;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN: f64 = 24.0;

/// Render a lap trace as an inline SVG: the track outline drawn as colored
/// segments, cold-to-hot by channel value.
pub fn render_track(series: &TrackSeries) -> String {
    let mut html = format!("<h3>{}</h3>", super::escape(&series.title));
    if series.points.len() < 2 {
        html.push_str("<p>Not enough telemetry samples to draw.</p>");
        return html;
    }

    let (min_x, max_x) = bounds(series.points.iter().map(|p| p.x));
    let (min_y, max_y) = bounds(series.points.iter().map(|p| p.y));
    let (min_v, max_v) = bounds(series.points.iter().map(|p| p.value));

    let span_x = (max_x - min_x).max(f64::EPSILON);
    let span_y = (max_y - min_y).max(f64::EPSILON);
    let scale = ((WIDTH - 2.0 * MARGIN) / span_x).min((HEIGHT - 2.0 * MARGIN) / span_y);

    let project = |x: f64, y: f64| {
        let px = MARGIN + (x - min_x) * scale;
        // SVG y grows downward
        let py = HEIGHT - MARGIN - (y - min_y) * scale;
        (px, py)
    };

    let mut svg = format!(
        r#"<svg viewBox="0 0 {WIDTH} {HEIGHT}" width="{WIDTH}" height="{HEIGHT}" xmlns="http://www.w3.org/2000/svg">"#
    );
    for pair in series.points.windows(2) {
        let (x1, y1) = project(pair[0].x, pair[0].y);
        let (x2, y2) = project(pair[1].x, pair[1].y);
        let t = (pair[0].value - min_v) / (max_v - min_v).max(f64::EPSILON);
        svg.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="4" stroke-linecap="round"/>"#,
            x1,
            y1,
            x2,
            y2,
            color_for(t)
        ));
    }
    svg.push_str("</svg>");

    html.push_str(&svg);
    html.push_str(&format!(
        "<p>{}: {:.0} (blue) to {:.0} (red)</p>",
        super::escape(series.channel.label()),
        min_v,
        max_v
    ));
    html
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Map a normalized value to a blue-to-red color.
fn color_for(t: f64) -> String {
    let hue = 240.0 * (1.0 - t.clamp(0.0, 1.0));
    format!("hsl({:.0}, 85%, 50%)", hue)
}
