use anyhow::{anyhow, Context, Result};
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::models::VitalSigns;

const CHART_WIDTH: u32 = 640;
const CHART_HEIGHT: u32 = 480;

/// Renders the six submitted measurements as a PNG bar chart under the
/// public static directory. Files are keyed by the submission id, so two
/// requests can never overwrite each other's chart.
#[derive(Debug, Clone)]
pub struct ChartService {
    static_dir: PathBuf,
}

impl ChartService {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
        }
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    /// Create the output directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.static_dir).with_context(|| {
            format!(
                "failed to create chart directory {}",
                self.static_dir.display()
            )
        })
    }

    pub fn chart_file_name(submission_id: Uuid) -> String {
        format!("visualization_{submission_id}.png")
    }

    /// Draw the bar chart and return the written path. Rendering or I/O
    /// errors propagate and fail the request they belong to.
    pub fn render(&self, submission_id: Uuid, vitals: &VitalSigns) -> Result<PathBuf> {
        let path = self.static_dir.join(Self::chart_file_name(submission_id));
        let values = vitals.values();
        let y_max = values.iter().copied().fold(1.0_f64, f64::max) * 1.1;

        // Scoped so the backend's borrow of `path` ends before the return.
        {
            let root = BitMapBackend::new(&path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
            root.fill(&WHITE)
                .map_err(|e| anyhow!("failed to clear chart canvas: {e}"))?;

            let mut chart = ChartBuilder::on(&root)
                .caption("Live Visualization", ("sans-serif", 28))
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(60)
                .build_cartesian_2d((0usize..6usize).into_segmented(), 0f64..y_max)
                .map_err(|e| anyhow!("failed to build chart axes: {e}"))?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_desc("Input Parameters")
                .y_desc("Values")
                .x_labels(VitalSigns::FEATURE_LABELS.len())
                .x_label_formatter(&|segment| match segment {
                    SegmentValue::CenterOf(idx) if *idx < VitalSigns::FEATURE_LABELS.len() => {
                        VitalSigns::FEATURE_LABELS[*idx].to_string()
                    }
                    _ => String::new(),
                })
                .draw()
                .map_err(|e| anyhow!("failed to draw chart mesh: {e}"))?;

            chart
                .draw_series(values.iter().enumerate().map(|(idx, value)| {
                    Rectangle::new(
                        [
                            (SegmentValue::Exact(idx), 0.0),
                            (SegmentValue::Exact(idx + 1), *value),
                        ],
                        BLUE.filled(),
                    )
                }))
                .map_err(|e| anyhow!("failed to draw chart bars: {e}"))?;

            root.present()
                .map_err(|e| anyhow!("failed to write chart image {}: {e}", path.display()))?;
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_file_name_is_keyed_by_submission() {
        let id = Uuid::new_v4();
        assert_eq!(
            ChartService::chart_file_name(id),
            format!("visualization_{id}.png")
        );
    }

    #[test]
    fn test_render_writes_png_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let service = ChartService::new(dir.path());
        service.ensure_dir().unwrap();

        let vitals = VitalSigns {
            age: 30,
            systolic_bp: 120,
            diastolic_bp: 80,
            blood_sugar: 100.0,
            body_temp: 98,
            heart_rate: 70,
        };
        let id = Uuid::new_v4();

        let path = service.render(id, &vitals).unwrap();
        assert_eq!(path, dir.path().join(ChartService::chart_file_name(id)));

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn test_render_fails_when_directory_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let service = ChartService::new(dir.path().join("nope"));

        let vitals = VitalSigns {
            age: 30,
            systolic_bp: 120,
            diastolic_bp: 80,
            blood_sugar: 100.0,
            body_temp: 98,
            heart_rate: 70,
        };

        assert!(service.render(Uuid::new_v4(), &vitals).is_err());
    }
}
