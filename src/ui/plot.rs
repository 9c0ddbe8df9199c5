use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{self, RichText, Stroke, Ui};
use egui_plot::{
    BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, MarkerShape, Plot, PlotPoint, Points,
};

use crate::charts::series::{
    BoxChart, BubblePoint, CopiesPricePoint, LineChart, PointChart, StripPoint,
};
use crate::charts::ChartMeta;
use crate::color::ColorMap;
use crate::state::AppState;
use crate::ui::class_label;

const CHART_HEIGHT: f32 = 320.0;

/// Marker radius range used for the bubble chart.
const MIN_BUBBLE_RADIUS: f32 = 1.5;
const MAX_BUBBLE_RADIUS: f32 = 12.0;

// ---------------------------------------------------------------------------
// Dashboard grid (central panel)
// ---------------------------------------------------------------------------

/// Lay out the six charts:
/// bubble on top, price/copies side by side, copies-vs-price, box/strip.
pub fn chart_grid(ui: &mut Ui, state: &AppState) {
    let charts = &state.charts;
    let colors = &state.color_map;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if charts.is_empty() {
                ui.label(RichText::new("No games match the current selection.").weak());
            }
            review_bubbles(ui, &charts.review_bubbles, colors);
            ui.add_space(12.0);

            ui.columns(2, |cols| {
                average_price(&mut cols[0], &charts.average_price, colors);
                copies_by_month(&mut cols[1], &charts.copies_by_month, colors);
            });
            ui.add_space(12.0);

            copies_vs_price(ui, &charts.copies_vs_price, colors);
            ui.add_space(12.0);

            ui.columns(2, |cols| {
                review_distribution(&mut cols[0], &charts.review_distribution, colors);
                review_strip(&mut cols[1], &charts.review_strip, colors);
            });
        });
}

fn chart_heading(ui: &mut Ui, meta: &ChartMeta) {
    ui.label(RichText::new(meta.title).strong().size(15.0));
}

fn base_plot<'a>(id: &str, meta: &ChartMeta) -> Plot<'a> {
    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(meta.x_label)
        .y_axis_label(meta.y_label)
        .height(CHART_HEIGHT)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
}

// ---------------------------------------------------------------------------
// (a) Review score bubbles
// ---------------------------------------------------------------------------

fn review_bubbles(ui: &mut Ui, chart: &PointChart<BubblePoint>, colors: &ColorMap) {
    chart_heading(ui, &chart.meta);

    // One Points item per (class, marker radius) keeps the item count small.
    let mut buckets: BTreeMap<(&str, u8), Vec<[f64; 2]>> = BTreeMap::new();
    for p in &chart.points {
        let (Some(date), Some(score)) = (p.release_date, p.review_score) else {
            continue;
        };
        buckets
            .entry((p.publisher_class.as_str(), bubble_radius_step(p.bubble_size)))
            .or_default()
            .push([day_number(date), score]);
    }

    base_plot("review_bubbles", &chart.meta)
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| format_day(mark.value))
        .label_formatter(|class: &str, value: &PlotPoint| {
            let name = chart
                .points
                .iter()
                .find(|p| {
                    class_label(&p.publisher_class) == class
                        && p.review_score.is_some_and(|s| close(s, value.y))
                        && p.release_date.is_some_and(|d| close(day_number(d), value.x))
                })
                .map(|p| p.name.as_str());
            format!(
                "{}\n{}\nreview score {:.1}",
                name.unwrap_or(class),
                format_day(value.x),
                value.y
            )
        })
        .show(ui, |plot_ui| {
            for ((class, step), points) in buckets {
                let color = colors.color_for(class);
                plot_ui.points(
                    Points::new(points)
                        .name(class_label(class))
                        .color(color.gamma_multiply(0.7))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(step as f32 / 2.0),
                );
            }
        });
}

/// Marker radius in half-pixel steps for a bubble size in `[1, 100]`.
fn bubble_radius_step(bubble_size: f64) -> u8 {
    let t = (bubble_size.clamp(0.0, 100.0) / 100.0) as f32;
    let radius = MIN_BUBBLE_RADIUS + t * (MAX_BUBBLE_RADIUS - MIN_BUBBLE_RADIUS);
    (radius * 2.0).round() as u8
}

// ---------------------------------------------------------------------------
// (b) Average price by month, (c) copies sold by month
// ---------------------------------------------------------------------------

fn average_price(ui: &mut Ui, chart: &LineChart<String>, colors: &ColorMap) {
    chart_heading(ui, &chart.meta);
    base_plot("average_price", &chart.meta)
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| format_month(mark.value))
        .label_formatter(|class: &str, value: &PlotPoint| {
            format!("{class}\n{}\naverage price {:.2}", format_month(value.x), value.y)
        })
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let points: Vec<[f64; 2]> = series
                    .points
                    .iter()
                    .filter_map(|p| Some([month_position(&p.x)?, p.y]))
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name(class_label(&series.publisher_class))
                        .color(colors.color_for(&series.publisher_class))
                        .width(2.0),
                );
            }
        });
}

fn copies_by_month(ui: &mut Ui, chart: &LineChart<NaiveDate>, colors: &ColorMap) {
    chart_heading(ui, &chart.meta);
    base_plot("copies_by_month", &chart.meta)
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| format_month(mark.value))
        .y_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| format_count(mark.value))
        .label_formatter(|class: &str, value: &PlotPoint| {
            format!(
                "{class}\n{}\n{} copies",
                format_month(value.x),
                format_count(value.y)
            )
        })
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let points: Vec<[f64; 2]> = series
                    .points
                    .iter()
                    .map(|p| [day_number(p.x), p.y])
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name(class_label(&series.publisher_class))
                        .color(colors.color_for(&series.publisher_class))
                        .width(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// (d) Copies sold vs. price, log/log
// ---------------------------------------------------------------------------

fn copies_vs_price(ui: &mut Ui, chart: &PointChart<CopiesPricePoint>, colors: &ColorMap) {
    chart_heading(ui, &chart.meta);
    let omitted = chart.omitted_on_log_axes();
    if omitted > 0 {
        ui.label(
            RichText::new(format!(
                "{omitted} games with no copies sold or no price are not shown on log axes"
            ))
            .small()
            .weak(),
        );
    }

    let mut by_class: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for p in chart.log_plottable() {
        if let Some(price) = p.price {
            by_class
                .entry(p.publisher_class.as_str())
                .or_default()
                .push([(p.copies_sold as f64).log10(), price.log10()]);
        }
    }

    let axis = |mark: GridMark, _range: &RangeInclusive<f64>| format_log_tick(mark.value);
    base_plot("copies_vs_price", &chart.meta)
        .x_axis_formatter(axis)
        .y_axis_formatter(axis)
        .label_formatter(|class: &str, value: &PlotPoint| {
            let copies = 10f64.powf(value.x);
            let price = 10f64.powf(value.y);
            let name = chart
                .log_plottable()
                .find(|p| {
                    class_label(&p.publisher_class) == class
                        && close(p.copies_sold as f64, copies.round())
                        && p.price.is_some_and(|pr| close(pr.log10(), value.y))
                })
                .map(|p| p.name.as_str());
            format!(
                "{}\n{} copies\nprice {price:.2}",
                name.unwrap_or(class),
                format_count(copies)
            )
        })
        .show(ui, |plot_ui| {
            for (class, points) in by_class {
                plot_ui.points(
                    Points::new(points)
                        .name(class_label(class))
                        .color(colors.color_for(class))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// (e) Review score box plot
// ---------------------------------------------------------------------------

fn review_distribution(ui: &mut Ui, chart: &BoxChart, colors: &ColorMap) {
    chart_heading(ui, &chart.meta);
    let labels: Vec<&str> = chart
        .boxes
        .iter()
        .map(|b| class_label(&b.publisher_class))
        .collect();

    base_plot("review_distribution", &chart.meta)
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&labels, mark.value)
        })
        .show(ui, |plot_ui| {
            for (i, dist) in chart.boxes.iter().enumerate() {
                let class = dist.publisher_class.as_str();
                let color = colors.color_for(class);
                let s = &dist.summary;

                let elem = BoxElem::new(
                    i as f64,
                    BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
                )
                .name(format!(
                    "{}\nmin {:.1}  max {:.1}\nQ1 {:.1}  median {:.1}  Q3 {:.1}",
                    class_label(class),
                    s.min, s.max, s.q1, s.median, s.q3
                ))
                .box_width(0.5)
                .whisker_width(0.25)
                .fill(color.gamma_multiply(0.35))
                .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(
                    BoxPlot::new(vec![elem])
                        .name(class_label(class))
                        .color(color),
                );

                if !s.outliers.is_empty() {
                    let points: Vec<[f64; 2]> = s.outliers.iter().map(|&v| [i as f64, v]).collect();
                    plot_ui.points(
                        Points::new(points)
                            .name(class_label(class))
                            .color(color)
                            .shape(MarkerShape::Circle)
                            .radius(2.5),
                    );
                }
            }
        });
}

// ---------------------------------------------------------------------------
// (f) Review score strip chart
// ---------------------------------------------------------------------------

fn review_strip(ui: &mut Ui, chart: &PointChart<StripPoint>, colors: &ColorMap) {
    chart_heading(ui, &chart.meta);

    let mut rows: BTreeMap<&str, Vec<(f64, &str)>> = BTreeMap::new();
    for p in &chart.points {
        if let Some(score) = p.review_score {
            rows.entry(p.publisher_class.as_str())
                .or_default()
                .push((score, p.name.as_str()));
        }
    }
    let labels: Vec<&str> = rows.keys().map(|class| class_label(class)).collect();

    base_plot("review_strip", &chart.meta)
        .y_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&labels, mark.value)
        })
        .label_formatter(|class: &str, value: &PlotPoint| {
            let games = rows
                .iter()
                .find(|(c, _)| class_label(c) == class)
                .map(|(_, games)| games);
            let name = games.and_then(|games| {
                games
                    .iter()
                    .find(|(score, name)| {
                        close(*score, value.x) && close(strip_offset(name), value.y.fract())
                    })
                    .map(|(_, name)| *name)
            });
            format!("{}\nreview score {:.1}", name.unwrap_or(class), value.x)
        })
        .show(ui, |plot_ui| {
            for (row, (class, games)) in rows.iter().enumerate() {
                let points: Vec<[f64; 2]> = games
                    .iter()
                    .map(|(score, name)| [*score, row as f64 + strip_offset(name)])
                    .collect();
                plot_ui.points(
                    Points::new(points)
                        .name(class_label(class))
                        .color(colors.color_for(class))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(2.5),
                );
            }
        });
}

/// Deterministic vertical jitter in `[0, 0.3)` so overlapping scores stay
/// visible between redraws.
fn strip_offset(name: &str) -> f64 {
    let hash = name
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
            (h ^ b as u64).wrapping_mul(0x0100_0000_01b3)
        });
    (hash % 1000) as f64 / 1000.0 * 0.3
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

fn day_number(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn date_from_day(value: f64) -> Option<NaiveDate> {
    if !value.is_finite() || value.abs() > i32::MAX as f64 {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(value.round() as i32)
}

/// Plot position of a `"YYYY-MM"` key (its first day).
fn month_position(key: &str) -> Option<f64> {
    NaiveDate::parse_from_str(&format!("{key}-01"), "%Y-%m-%d")
        .ok()
        .map(day_number)
}

fn format_day(value: f64) -> String {
    date_from_day(value)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn format_month(value: f64) -> String {
    date_from_day(value)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

/// `1234567.0` → `"1.2M"`.
fn format_count(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.0}k", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}

/// Tick label for a log10 axis position.
fn format_log_tick(exponent: f64) -> String {
    let value = 10f64.powf(exponent);
    if value < 1.0 {
        format!("{value:.2}")
    } else {
        format_count(value)
    }
}

/// Category name for an axis position that falls on an integer index.
fn category_label(labels: &[&str], value: f64) -> String {
    let index = value.round();
    if (value - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels
        .get(index as usize)
        .map(|s| s.to_string())
        .unwrap_or_default()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bubble_radius_grows_with_size() {
        assert_eq!(bubble_radius_step(1.0), 3);
        assert_eq!(bubble_radius_step(100.0), 24);
        assert!(bubble_radius_step(50.0) > bubble_radius_step(10.0));
    }

    #[test]
    fn days_round_trip_through_axis_positions() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(date_from_day(day_number(date)), Some(date));
        assert_eq!(format_day(day_number(date)), "2024-03-15");
        assert_eq!(format_month(month_position("2024-03").unwrap()), "2024-03");
        assert_eq!(month_position("March"), None);
        assert_eq!(format_day(f64::NAN), "");
    }

    #[test]
    fn counts_are_abbreviated() {
        assert_eq!(format_count(950.0), "950");
        assert_eq!(format_count(25_000.0), "25k");
        assert_eq!(format_count(2_500_000.0), "2.5M");
        assert_eq!(format_log_tick(6.0), "1.0M");
        assert_eq!(format_log_tick(-1.0), "0.10");
    }

    #[test]
    fn categories_only_label_integer_ticks() {
        let labels = ["AA", "AAA"];
        assert_eq!(category_label(&labels, 1.0), "AAA");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn blank_class_is_labelled_on_category_axes() {
        let labels: Vec<&str> = ["", "AA"].into_iter().map(class_label).collect();
        assert_eq!(category_label(&labels, 0.0), "(blank)");
        assert_eq!(category_label(&labels, 1.0), "AA");
    }

    #[test]
    fn strip_offsets_are_stable_and_bounded() {
        let a = strip_offset("Half-Life");
        assert_eq!(a, strip_offset("Half-Life"));
        assert!((0.0..0.3).contains(&a));
    }
}
