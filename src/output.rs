// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use std::io::Write;

use crate::utils::CsvFriend;

#[derive(Default)]
struct Count {
    num: u64,
}

impl Count {
    pub fn add(&mut self) {
        self.num += 1;
    }
    pub fn tot(&self) -> f64 {
        self.num as f64
    }
}

#[derive(Default)]
struct Avg {
    sum: kahan::KahanSum<f64>,
    num: u64,
}

impl Avg {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.num += 1;
    }
    /// Return NaN if no value was added.
    pub fn avg(&self) -> f64 {
        self.sum.sum() / self.num as f64
    }
}

/// Scalar metrics, each saved as a single value per experiment.
#[derive(Default)]
pub struct OutputScalar {
    one_time: std::collections::BTreeMap<String, f64>,
    avg: std::collections::BTreeMap<String, Avg>,
    count: std::collections::BTreeMap<String, Count>,
}

pub enum ScalarMetricType {
    Avg,
    Count,
}

impl OutputScalar {
    pub fn one_time(&mut self, name: &str, value: f64) {
        self.one_time.insert(name.to_string(), value);
    }

    pub fn init(&mut self, name: &str, metric_type: ScalarMetricType) {
        match metric_type {
            ScalarMetricType::Avg => {
                self.avg.insert(name.to_string(), Avg::default());
            }
            ScalarMetricType::Count => {
                self.count.insert(name.to_string(), Count::default());
            }
        };
    }

    pub fn avg(&mut self, name: &str, value: f64) {
        self.avg
            .get_mut(name)
            .unwrap_or_else(|| panic!("uninitialized metric {name}"))
            .add(value);
    }

    pub fn count(&mut self, name: &str) {
        self.count
            .get_mut(name)
            .unwrap_or_else(|| panic!("uninitialized metric {name}"))
            .add();
    }
}

impl CsvFriend for OutputScalar {
    fn header(&self) -> String {
        self.one_time
            .keys()
            .chain(self.avg.keys())
            .chain(self.count.keys())
            .cloned()
            .collect::<Vec<String>>()
            .join(",")
    }
    fn to_csv(&self) -> String {
        self.one_time
            .values()
            .map(|x| x.to_string())
            .chain(self.avg.values().map(|x| x.avg().to_string()))
            .chain(self.count.values().map(|x| x.tot().to_string()))
            .collect::<Vec<String>>()
            .join(",")
    }
}

#[derive(Default)]
pub struct OutputSeriesSingle {
    /// CSV headers, which explains the meaning of the labels.
    pub headers: Vec<String>,
    /// Each sample is associated with:
    /// - a vector of string labels
    /// - the episode in which the sample was collected
    /// - the value of the sample
    pub values: Vec<(Vec<String>, u64, f64)>,
}

/// Series of values, one per episode, keyed by metric name.
#[derive(Default)]
pub struct OutputSeries {
    pub series: std::collections::HashMap<String, OutputSeriesSingle>,
}

impl OutputSeries {
    /// Record the `value` of metric `name` collected in `episode`.
    ///
    /// The metric must have been declared with `set_headers` and there must
    /// be one label per header.
    pub fn add(
        &mut self,
        name: &str,
        labels: Vec<String>,
        episode: u64,
        value: f64,
    ) -> anyhow::Result<()> {
        let series_single = self
            .series
            .get_mut(name)
            .ok_or(anyhow::anyhow!("undeclared series {}", name))?;
        anyhow::ensure!(
            series_single.headers.len() == labels.len(),
            "series {} expects {} labels, found {}",
            name,
            series_single.headers.len(),
            labels.len()
        );
        series_single.values.push((labels, episode, value));
        Ok(())
    }

    /// Declare the metric `name` with the given label headers, dropping any
    /// value already recorded.
    pub fn set_headers(&mut self, name: &str, headers: &[&str]) {
        let series_single = self.series.entry(name.to_string()).or_default();
        series_single.headers = headers.iter().map(|x| x.to_string()).collect();
        series_single.values.clear();
    }
}

pub struct Output {
    pub scalar: OutputScalar,
    pub series: OutputSeries,
    pub config_csv: String,
}

/// Save all the outputs to files.
pub fn save_outputs(
    outputs: Vec<Output>,
    output_path: &str,
    append: bool,
    additional_header: &str,
    additional_fields: &str,
) -> anyhow::Result<()> {
    let first = match outputs.first() {
        Some(first) => first,
        None => return Ok(()),
    };
    let header_comma = if additional_header.is_empty() {
        ""
    } else {
        ","
    };
    let config_csv_header = crate::config::Config::header();

    // Open all the files.
    let mut scalar_file = crate::utils::open_output_file(
        output_path,
        "scalar.csv",
        append,
        format!(
            "{}{}{},{}",
            additional_header,
            header_comma,
            config_csv_header,
            first.scalar.header()
        )
        .as_str(),
    )?;
    let mut series_files = std::collections::HashMap::new();
    for output in &outputs {
        for (name, elem) in &output.series.series {
            if elem.values.is_empty() || series_files.contains_key(name) {
                continue;
            }
            let series_file = crate::utils::open_output_file(
                output_path,
                format!("{name}.csv").as_str(),
                append,
                format!(
                    "{}{}{},{}{}episode,value",
                    additional_header,
                    header_comma,
                    config_csv_header,
                    elem.headers.join(","),
                    if elem.headers.is_empty() { "" } else { "," },
                )
                .as_str(),
            )?;
            series_files.insert(name.clone(), series_file);
        }
    }

    // Dump the data to files.
    for output in outputs {
        writeln!(
            &mut scalar_file,
            "{}{}{},{}",
            additional_fields,
            header_comma,
            output.config_csv,
            output.scalar.to_csv()
        )?;

        for (name, elem) in &output.series.series {
            if let Some(series_file) = series_files.get_mut(name) {
                for (labels, episode, value) in &elem.values {
                    writeln!(
                        series_file,
                        "{}{}{},{}{}{},{}",
                        additional_fields,
                        header_comma,
                        output.config_csv,
                        labels.join(","),
                        if labels.is_empty() { "" } else { "," },
                        episode,
                        value
                    )?;
                }
            }
        }
    }

    Ok(())
}
