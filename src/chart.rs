//! Renderer-independent chart descriptions produced by the analyses.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Palette {
    Blue,
    Green,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub palette: Palette,
    pub bars: Vec<Bar>,
}

impl BarChartSpec {
    pub fn max_value(&self) -> f64 {
        max_of(self.bars.iter().map(|b| b.value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
}

/// Part-of-whole chart. One slice per input row, slices are not merged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProportionSpec {
    pub title: String,
    pub slices: Vec<Slice>,
}

impl ProportionSpec {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Percentage share of each slice. All zero when the total is zero.
    pub fn shares(&self) -> Vec<f64> {
        let total = self.total();
        self.slices
            .iter()
            .map(|s| {
                if total > 0.0 {
                    s.value / total * 100.0
                } else {
                    0.0
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

impl Series {
    pub fn max_value(&self) -> f64 {
        max_of(self.values.iter().copied())
    }
}

/// Overlaid line series sharing one categorical x axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChartSpec {
    pub title: String,
    pub x_label: String,
    pub x_labels: Vec<String>,
    pub series: Vec<Series>,
}

impl LineChartSpec {
    pub fn max_value(&self) -> f64 {
        max_of(self.series.iter().map(Series::max_value))
    }
}

/// Bars on the primary axis, a line on the secondary axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DualAxisSpec {
    pub title: String,
    pub x_label: String,
    pub x_labels: Vec<String>,
    pub primary_label: String,
    pub secondary_label: String,
    pub bars: Series,
    pub line: Series,
}

impl DualAxisSpec {
    /// Factor mapping secondary values onto the primary axis range.
    pub fn secondary_scale(&self) -> f64 {
        let primary = self.bars.max_value();
        let secondary = self.line.max_value();
        if primary <= 0.0 || secondary <= 0.0 {
            return 1.0;
        }
        primary / secondary
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChartSpec {
    Bar(BarChartSpec),
    Proportion(ProportionSpec),
    Line(LineChartSpec),
    DualAxis(DualAxisSpec),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Bar(spec) => &spec.title,
            ChartSpec::Proportion(spec) => &spec.title,
            ChartSpec::Line(spec) => &spec.title,
            ChartSpec::DualAxis(spec) => &spec.title,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ChartSpec::Bar(spec) => spec.bars.is_empty(),
            ChartSpec::Proportion(spec) => spec.slices.is_empty(),
            ChartSpec::Line(spec) => spec.x_labels.is_empty(),
            ChartSpec::DualAxis(spec) => spec.x_labels.is_empty(),
        }
    }
}

fn max_of(values: impl Iterator<Item = f64>) -> f64 {
    values.filter(|v| v.is_finite()).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(name: &str, values: &[f64]) -> Series {
        Series {
            name: name.to_string(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn shares_sum_to_hundred() {
        let spec = ProportionSpec {
            title: "t".to_string(),
            slices: vec![
                Slice {
                    label: "MI".to_string(),
                    value: 30.0,
                },
                Slice {
                    label: "MI".to_string(),
                    value: 10.0,
                },
                Slice {
                    label: "CSK".to_string(),
                    value: 60.0,
                },
            ],
        };
        assert_eq!(spec.shares(), vec![30.0, 10.0, 60.0]);
    }

    #[test]
    fn zero_total_gives_zero_shares() {
        let spec = ProportionSpec {
            title: "t".to_string(),
            slices: vec![Slice {
                label: "MI".to_string(),
                value: 0.0,
            }],
        };
        assert_eq!(spec.shares(), vec![0.0]);
    }

    #[test]
    fn secondary_scale_maps_line_max_to_bar_max() {
        let spec = DualAxisSpec {
            title: "t".to_string(),
            x_label: "Season".to_string(),
            x_labels: vec!["2020".to_string(), "2021".to_string()],
            primary_label: "Total Runs".to_string(),
            secondary_label: "Total Wickets".to_string(),
            bars: series("Runs", &[200.0, 400.0]),
            line: series("Wickets", &[5.0, 8.0]),
        };
        assert_eq!(spec.secondary_scale(), 50.0);
    }

    #[test]
    fn secondary_scale_defaults_without_wickets() {
        let spec = DualAxisSpec {
            title: "t".to_string(),
            x_label: "Season".to_string(),
            x_labels: vec!["2020".to_string()],
            primary_label: "Total Runs".to_string(),
            secondary_label: "Total Wickets".to_string(),
            bars: series("Runs", &[200.0]),
            line: series("Wickets", &[0.0]),
        };
        assert_eq!(spec.secondary_scale(), 1.0);
    }
}
