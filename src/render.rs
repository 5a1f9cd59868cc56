// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-rendered result page and stacked time chart.

use crate::middleware::SessionContext;
use crate::models::{TerrainFactor, TimeBreakdown};
use crate::services::{Evaluation, Notice, NoticeLevel};
use crate::time_utils::{format_duration, format_pace};
use std::fmt::Write as _;

/// Chart segments, bottom to top.
const SEGMENTS: [(&str, &str); 3] = [
    ("Flat (theoretical)", "#00CC96"),
    ("Elevation + terrain", "#636EFA"),
    ("Weather surcharge", "#EF553B"),
];

const CHART_WIDTH: f64 = 520.0;
const CHART_HEIGHT: f64 = 360.0;
const PLOT_TOP: f64 = 40.0;
const PLOT_BOTTOM: f64 = 320.0;
const BAR_X: f64 = 80.0;
const BAR_WIDTH: f64 = 140.0;

/// Escape text for HTML element and attribute content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Weather impact as a whole percentage, truncated.
///
/// Rounded to micro-percent first so 17.999999999999993 reads as 18.
pub fn impact_percent(weather_impact_pct: f64) -> i64 {
    ((weather_impact_pct * 1e6).round() / 1e6).trunc() as i64
}

/// Stacked single-bar chart: flat time, then elevation+terrain, then weather.
pub fn stacked_chart_svg(breakdown: &TimeBreakdown) -> String {
    let values = [
        breakdown.flat_time_min.max(0.0),
        breakdown.elevation_surcharge_min.max(0.0),
        breakdown.weather_surcharge_min.max(0.0),
    ];
    let total: f64 = values.iter().sum();
    let scale = if total > 0.0 {
        (PLOT_BOTTOM - PLOT_TOP) / total
    } else {
        0.0
    };

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CHART_WIDTH}" height="{CHART_HEIGHT}" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}" role="img" aria-label="Effort breakdown (minutes)">"#
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="22" font-size="15" font-weight="bold">Effort breakdown (minutes)</text>"#,
        BAR_X
    );

    let mut y = PLOT_BOTTOM;
    for ((label, color), value) in SEGMENTS.iter().zip(values) {
        let height = value * scale;
        y -= height;
        let _ = write!(
            svg,
            r#"<rect class="segment" x="{BAR_X}" y="{y:.2}" width="{BAR_WIDTH}" height="{height:.2}" fill="{color}"><title>{label}: {value:.1} min</title></rect>"#
        );
    }

    let _ = write!(
        svg,
        r##"<line x1="{}" y1="{PLOT_BOTTOM}" x2="{}" y2="{PLOT_BOTTOM}" stroke="#444"/>"##,
        BAR_X - 20.0,
        BAR_X + BAR_WIDTH + 20.0
    );
    let _ = write!(
        svg,
        r#"<text x="{}" y="{}" font-size="13" text-anchor="middle">Time</text>"#,
        BAR_X + BAR_WIDTH / 2.0,
        PLOT_BOTTOM + 20.0
    );

    // Legend, top entry first to mirror the stack.
    let legend_x = BAR_X + BAR_WIDTH + 50.0;
    for (i, ((label, color), value)) in SEGMENTS.iter().zip(values).enumerate().rev() {
        let row = (SEGMENTS.len() - 1 - i) as f64;
        let ly = PLOT_TOP + 20.0 + row * 26.0;
        let _ = write!(
            svg,
            r#"<rect x="{legend_x}" y="{}" width="14" height="14" fill="{color}"/><text x="{}" y="{ly}" font-size="13">{label} ({value:.0} min)</text>"#,
            ly - 12.0,
            legend_x + 20.0
        );
    }

    svg.push_str("</svg>");
    svg
}

fn notice_html(notice: &Notice) -> String {
    let class = match notice.level {
        NoticeLevel::Success => "success",
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
    };
    format!(
        r#"<p class="notice {class}">{}</p>"#,
        escape_html(&notice.message)
    )
}

fn terrain_options(selected: TerrainFactor) -> String {
    TerrainFactor::ALL
        .iter()
        .map(|t| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                t.multiplier(),
                if *t == selected { " selected" } else { "" },
                t.label()
            )
        })
        .collect()
}

fn auth_error_message(reason: &str) -> &'static str {
    match reason {
        "access_denied" => "Strava access was not granted.",
        "invalid_state" => "The Strava login expired or was tampered with. Please try again.",
        _ => "Could not connect to Strava. Please try again.",
    }
}

/// Full result page.
pub fn render_page(
    evaluation: &Evaluation,
    session: &SessionContext,
    auth_error: Option<&str>,
) -> String {
    let course = &evaluation.course;
    let result = &evaluation.prediction.result;
    let observation = &evaluation.weather.observation;

    let account = if session.is_connected() {
        let who = session
            .athlete_name
            .as_deref()
            .map(escape_html)
            .unwrap_or_else(|| "Strava".to_string());
        format!(r#"<p class="account">Connected as {who} · <a href="/auth/logout">Disconnect</a></p>"#)
    } else {
        let return_to = format!(
            "/?distance_km={}&elevation_gain_m={}&terrain={}&latitude={}&longitude={}",
            course.distance_km,
            course.elevation_gain_m,
            course.terrain.multiplier(),
            evaluation.location.latitude,
            evaluation.location.longitude,
        );
        format!(
            r#"<p class="account"><a class="connect" href="/auth/strava?return_to={}">Connect my Strava account</a></p>"#,
            escape_html(&urlencoding::encode(&return_to))
        )
    };

    let mut notices: String = evaluation.notices.iter().map(notice_html).collect();
    if let Some(reason) = auth_error {
        notices.insert_str(
            0,
            &format!(
                r#"<p class="notice warning">{}</p>"#,
                auth_error_message(reason)
            ),
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Trail Time Predictor</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 980px; margin: 2rem auto; padding: 0 1rem; color: #222; }}
.columns {{ display: flex; gap: 2rem; flex-wrap: wrap; }}
.columns > section {{ flex: 1 1 280px; }}
label {{ display: block; margin: .6rem 0 .2rem; }}
input, select {{ width: 100%; padding: .3rem; }}
.notice {{ padding: .6rem .8rem; border-radius: 4px; }}
.success {{ background: #e6f6ee; }}
.info {{ background: #e8f0fb; }}
.warning {{ background: #fdf3e1; }}
.metric {{ font-size: 1.8rem; font-weight: bold; }}
.connect {{ background: #fc4c02; color: #fff; padding: .5rem 1rem; border-radius: 4px; text-decoration: none; }}
</style>
</head>
<body>
<h1>Trail Time Predictor</h1>
<p>Estimate your finishing time from your Strava history and live weather.</p>
{account}
{notices}
<hr>
<form method="get" action="/">
<div class="columns">
<section>
<h2>Course</h2>
<label for="distance_km">Distance (km)</label>
<input id="distance_km" name="distance_km" type="number" step="0.1" min="0.1" max="1000" value="{distance}">
<label for="elevation_gain_m">Elevation gain (m)</label>
<input id="elevation_gain_m" name="elevation_gain_m" type="number" step="10" min="0" max="100000" value="{elevation}">
<label for="terrain">Terrain</label>
<select id="terrain" name="terrain">{terrain_options}</select>
</section>
<section>
<h2>Weather</h2>
<label for="latitude">Race latitude</label>
<input id="latitude" name="latitude" type="number" step="0.0001" min="-90" max="90" value="{latitude}">
<label for="longitude">Race longitude</label>
<input id="longitude" name="longitude" type="number" step="0.0001" min="-180" max="180" value="{longitude}">
<p class="notice info">Conditions: {temperature:.1}°C | Impact: +{impact}% on time</p>
</section>
</div>
<p><button type="submit">Estimate</button></p>
</form>
<hr>
<div class="columns">
<section>
<p>Estimated time (weather included)</p>
<p class="metric" id="estimate">{estimate}</p>
</section>
<section>
<p>Flat-equivalent distance</p>
<p class="metric" id="flat-equivalent">{flat_equivalent:.1} km</p>
</section>
<section>
<p>Baseline pace</p>
<p class="metric" id="pace">{pace} min/km</p>
</section>
</div>
{chart}
<p><small>Based on an adjusted Naismith rule and Open-Meteo data.</small></p>
</body>
</html>
"#,
        distance = course.distance_km,
        elevation = course.elevation_gain_m,
        terrain_options = terrain_options(course.terrain),
        latitude = evaluation.location.latitude,
        longitude = evaluation.location.longitude,
        temperature = observation.temperature_celsius,
        impact = impact_percent(result.weather_impact_pct),
        estimate = format_duration(result.weather_adjusted_time_min),
        flat_equivalent = result.flat_equivalent_km,
        pace = format_pace(result.baseline_pace_min_per_km),
        chart = stacked_chart_svg(&evaluation.prediction.breakdown),
    )
}
