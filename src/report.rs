use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use plotters::prelude::*;
use tracing::info;

use crate::analytics::{OverlapProfile, StudyProfile};
use crate::error::ProteomeError;

const PALETTE: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub name: String,
    pub values: Vec<u64>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<u64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

pub trait ChartRenderer {
    fn stacked_bar(
        &self,
        title: &str,
        categories: &[String],
        series: &[Series],
    ) -> Result<Utf8PathBuf, ProteomeError>;

    fn bar(
        &self,
        title: &str,
        categories: &[String],
        values: &[u64],
    ) -> Result<Utf8PathBuf, ProteomeError>;
}

#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    output_dir: Utf8PathBuf,
    size: (u32, u32),
}

impl SvgChartRenderer {
    pub fn new(output_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            size: (1024, 640),
        }
    }

    fn target(&self, title: &str) -> Result<Utf8PathBuf, ProteomeError> {
        fs::create_dir_all(self.output_dir.as_std_path())
            .map_err(|err| ProteomeError::Filesystem(format!("{}: {err}", self.output_dir)))?;
        Ok(self.output_dir.join(format!("{}.svg", slug(title))))
    }

    fn draw(
        &self,
        title: &str,
        categories: &[String],
        series: &[Series],
        legend: bool,
    ) -> Result<Utf8PathBuf, ProteomeError> {
        if categories.is_empty() {
            return Err(ProteomeError::Render(format!("{title}: no categories")));
        }
        if let Some(bad) = series.iter().find(|s| s.values.len() != categories.len()) {
            return Err(ProteomeError::Render(format!(
                "{title}: series {:?} has {} values for {} categories",
                bad.name,
                bad.values.len(),
                categories.len()
            )));
        }

        let path = self.target(title)?;
        let max = (0..categories.len())
            .map(|idx| series.iter().map(|s| s.values[idx]).sum::<u64>())
            .max()
            .unwrap_or(0);
        let y_max = max + max / 10 + 1;

        self.plot(&path, title, categories, series, legend, y_max)?;
        info!(path = %path, "chart written");
        Ok(path)
    }

    fn plot(
        &self,
        path: &Utf8Path,
        title: &str,
        categories: &[String],
        series: &[Series],
        legend: bool,
        y_max: u64,
    ) -> Result<(), ProteomeError> {
        let root = SVGBackend::new(path.as_std_path(), self.size).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 26))
            .margin(16)
            .x_label_area_size(70)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..categories.len() as u32).into_segmented(), 0u64..y_max)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(categories.len())
            .x_label_formatter(&|value| match value {
                SegmentValue::CenterOf(idx) => categories
                    .get(*idx as usize)
                    .cloned()
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .y_desc("proteins")
            .draw()
            .map_err(render_error)?;

        let mut base = vec![0u64; categories.len()];
        for (series_idx, current) in series.iter().enumerate() {
            let color = PALETTE[series_idx % PALETTE.len()];
            let bars: Vec<_> = current
                .values
                .iter()
                .enumerate()
                .map(|(idx, value)| {
                    let bottom = base[idx];
                    let top = bottom + value;
                    base[idx] = top;
                    let x = idx as u32;
                    let mut bar = Rectangle::new(
                        [
                            (SegmentValue::Exact(x), bottom),
                            (SegmentValue::Exact(x + 1), top),
                        ],
                        color.filled(),
                    );
                    bar.set_margin(0, 0, 6, 6);
                    bar
                })
                .collect();
            let drawn = chart.draw_series(bars).map_err(render_error)?;
            if legend {
                drawn.label(current.name.as_str()).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled())
                });
            }
        }

        if legend {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.85))
                .border_style(BLACK)
                .position(SeriesLabelPosition::UpperRight)
                .draw()
                .map_err(render_error)?;
        }

        root.present().map_err(render_error)
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn stacked_bar(
        &self,
        title: &str,
        categories: &[String],
        series: &[Series],
    ) -> Result<Utf8PathBuf, ProteomeError> {
        self.draw(title, categories, series, true)
    }

    fn bar(
        &self,
        title: &str,
        categories: &[String],
        values: &[u64],
    ) -> Result<Utf8PathBuf, ProteomeError> {
        self.draw(title, categories, &[Series::new(title, values.to_vec())], false)
    }
}

fn render_error<E: std::fmt::Display>(err: E) -> ProteomeError {
    ProteomeError::Render(err.to_string())
}

pub fn slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_matches('_').to_string()
}

pub struct Reporter<'a, C: ChartRenderer> {
    renderer: &'a C,
}

impl<'a, C: ChartRenderer> Reporter<'a, C> {
    pub fn new(renderer: &'a C) -> Self {
        Self { renderer }
    }

    pub fn study_chart(&self, profile: &StudyProfile) -> Result<Option<Utf8PathBuf>, ProteomeError> {
        if profile.brain_parts.is_empty() {
            return Ok(None);
        }
        let categories: Vec<String> = profile
            .brain_parts
            .iter()
            .map(|part| part.brain_part.to_string())
            .collect();
        let unique = profile.brain_parts.iter().map(|part| part.unique as u64).collect();
        let common = profile.brain_parts.iter().map(|part| part.common as u64).collect();
        self.renderer
            .stacked_bar(
                &profile.study.to_string(),
                &categories,
                &[Series::new("unique", unique), Series::new("common", common)],
            )
            .map(Some)
    }

    pub fn overlap_chart(&self, overlap: &OverlapProfile) -> Result<Option<Utf8PathBuf>, ProteomeError> {
        if overlap.overlaps.is_empty() {
            return Ok(None);
        }
        let categories: Vec<String> = overlap
            .overlaps
            .iter()
            .map(|entry| entry.study.to_string())
            .collect();
        let values: Vec<u64> = overlap
            .overlaps
            .iter()
            .map(|entry| entry.shared as u64)
            .collect();
        self.renderer
            .bar(&format!("{} overlap", overlap.reference), &categories, &values)
            .map(Some)
    }
}
