use std::collections::BTreeMap;

use super::ReportDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Pie,
}

/// A static dataset drawn in place of a chart placeholder
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub unit: String,
    pub series: Vec<(String, f64)>,
}

impl ChartSpec {
    pub fn new(id: &str, title: &str, kind: ChartKind, unit: &str, series: &[(&str, f64)]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            unit: unit.to_string(),
            series: series.iter().map(|(l, v)| (l.to_string(), *v)).collect(),
        }
    }

    /// Largest magnitude in the series, for scaling bars
    pub fn max_magnitude(&self) -> f64 {
        self.series.iter().map(|(_, v)| v.abs()).fold(0.0, f64::max)
    }

    /// Sum of the series, for pie shares
    pub fn total(&self) -> f64 {
        self.series.iter().map(|(_, v)| v).sum()
    }
}

/// Datasets available to reports, keyed by chart id
#[derive(Debug, Clone)]
pub struct ChartRegistry {
    charts: BTreeMap<String, ChartSpec>,
}

impl ChartRegistry {
    pub fn empty() -> Self {
        Self {
            charts: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, chart: ChartSpec) {
        self.charts.insert(chart.id.clone(), chart);
    }

    pub fn get(&self, id: &str) -> Option<&ChartSpec> {
        self.charts.get(id)
    }

    /// Bind every placeholder in `doc` to its dataset. Placeholders without a
    /// dataset are logged and left unbound; returns the number bound.
    pub fn initialize(&self, doc: &mut ReportDocument) -> usize {
        tracing::info!("Setting up charts");
        let placeholders: Vec<String> = doc
            .chart_placeholders()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut bound = 0;
        for id in placeholders {
            match self.charts.get(&id) {
                Some(chart) => {
                    doc.charts.insert(id, chart.clone());
                    bound += 1;
                }
                None => tracing::warn!(chart = %id, "No dataset for chart placeholder"),
            }
        }
        tracing::info!(bound, "Charts initialized");
        bound
    }
}

impl Default for ChartRegistry {
    /// The figures shown in the credit report
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(ChartSpec::new(
            "revenue-chart",
            "Revenue Growth (2022-2024)",
            ChartKind::Bar,
            "M",
            &[("2022", 15.8), ("2023", 228.9), ("2024", 1920.0)],
        ));
        registry.register(ChartSpec::new(
            "customer-chart",
            "Customer Mix (2024)",
            ChartKind::Pie,
            "%",
            &[("Microsoft", 62.0), ("OpenAI", 15.0), ("Other Customers", 23.0)],
        ));
        registry.register(ChartSpec::new(
            "margins-chart",
            "Margins (2024)",
            ChartKind::Bar,
            "%",
            &[
                ("Gross", 72.0),
                ("EBITDA", 60.0),
                ("Operating", 50.0),
                ("Net", -45.0),
            ],
        ));
        registry.register(ChartSpec::new(
            "debt-chart",
            "Debt Maturity Profile ($ millions)",
            ChartKind::Bar,
            "M",
            &[
                ("2025", 500.0),
                ("2026", 1200.0),
                ("2027", 2000.0),
                ("2028", 3300.0),
                ("2029+", 1000.0),
            ],
        ));
        registry
    }
}
