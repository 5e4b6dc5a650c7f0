//! Prometheus text exposition format.
//!
//! Renders a snapshot against its catalog for scraping by a Prometheus
//! server or compatible agent. Every family gets its HELP/TYPE header
//! once, followed by all of its samples.

use std::fmt::Write;

use crate::catalog::{Catalog, NAMESPACE, fq_name};
use crate::snapshot::Snapshot;

/// Render one snapshot into Prometheus text format.
///
/// Families appear in catalog order. A family with no samples in this
/// snapshot still gets its HELP/TYPE header.
pub fn render_prometheus(catalog: &Catalog, snapshot: &Snapshot) -> String {
    let mut out = String::new();

    for desc in catalog.descs() {
        write_header(&mut out, &desc.name, desc.help);
        for sample in snapshot.family(desc.metric) {
            let labels: Vec<(&str, &str)> = desc
                .label_names
                .iter()
                .copied()
                .zip(sample.label_values.iter().map(String::as_str))
                .collect();
            write_sample(&mut out, &desc.name, &labels, sample.value);
        }
    }

    out
}

/// Version metadata for the `immich_exporter_build_info` gauge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: String,
    pub commit: String,
    pub date: String,
}

impl BuildInfo {
    /// Build info baked in at compile time.
    ///
    /// `IMMICH_EXPORTER_COMMIT` and `IMMICH_EXPORTER_BUILD_DATE` are read
    /// from the build environment when present.
    pub fn from_build_env() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: option_env!("IMMICH_EXPORTER_COMMIT")
                .unwrap_or("none")
                .to_string(),
            date: option_env!("IMMICH_EXPORTER_BUILD_DATE")
                .unwrap_or("unknown")
                .to_string(),
        }
    }
}

/// Render the constant build-info family.
pub fn render_build_info(info: &BuildInfo) -> String {
    let name = fq_name(NAMESPACE, "exporter", "build_info");
    let mut out = String::new();
    write_header(&mut out, &name, "Build information");
    write_sample(
        &mut out,
        &name,
        &[
            ("version", info.version.as_str()),
            ("commit", info.commit.as_str()),
            ("date", info.date.as_str()),
        ],
        1.0,
    );
    out
}

fn write_header(out: &mut String, name: &str, help: &str) {
    let _ = writeln!(out, "# HELP {name} {}", escape_help(help));
    let _ = writeln!(out, "# TYPE {name} gauge");
}

fn write_sample(out: &mut String, name: &str, labels: &[(&str, &str)], value: f64) {
    out.push_str(name);
    if !labels.is_empty() {
        out.push('{');
        for (i, (label, value)) in labels.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let _ = write!(out, "{label}=\"{}\"", escape_label_value(value));
        }
        out.push('}');
    }
    out.push(' ');
    out.push_str(&format_value(value));
    out.push('\n');
}

/// Escape a label value: backslash, double quote and newline.
fn escape_label_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape help text: backslash and newline.
fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        // Shortest round-trip form; integral values print without a fraction.
        format!("{value}")
    }
}
