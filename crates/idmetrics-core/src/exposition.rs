//! Prometheus text exposition format (version 0.0.4).
//!
//! Output is a pure function of the snapshot: families in registration
//! order, series in first-observation order, so identical state always
//! encodes to identical bytes.

use std::fmt::Write;

use crate::snapshot::{FamilySnapshot, RegistrySnapshot, SeriesSnapshot};
use crate::store::SeriesValue;

/// Content type scrape transports should answer with.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render every family of the snapshot.
pub fn encode(snapshot: &RegistrySnapshot) -> String {
    let mut out = String::new();
    for family in &snapshot.families {
        encode_family(family, &mut out);
    }
    out
}

/// Render one family: HELP, TYPE, then its samples.
pub fn encode_family(family: &FamilySnapshot, out: &mut String) {
    let name = family.desc.name.as_str();
    let _ = write!(out, "# HELP {} ", name);
    escape_help(&family.desc.help, out);
    out.push('\n');
    let _ = writeln!(out, "# TYPE {} {}", name, family.desc.kind.as_str());

    let labels = family.desc.label_names.as_slice();
    for series in &family.series {
        match &series.value {
            SeriesValue::Counter(v) | SeriesValue::Gauge(v) => {
                write_sample(out, name, "", labels, series, None, &format_value(*v));
            }
            SeriesValue::Histogram(h) => {
                for b in &h.buckets {
                    let le = format_bound(b.le);
                    let count = b.count.to_string();
                    write_sample(out, name, "_bucket", labels, series, Some(le.as_str()), &count);
                }
                let count = h.count.to_string();
                write_sample(out, name, "_bucket", labels, series, Some("+Inf"), &count);
                write_sample(out, name, "_sum", labels, series, None, &format_value(h.sum));
                write_sample(out, name, "_count", labels, series, None, &count);
            }
        }
    }
}

fn write_sample(
    out: &mut String,
    name: &str,
    suffix: &str,
    label_names: &[String],
    series: &SeriesSnapshot,
    le: Option<&str>,
    value: &str,
) {
    out.push_str(name);
    out.push_str(suffix);

    let mut pairs = label_names
        .iter()
        .map(String::as_str)
        .zip(series.label_values.values())
        .chain(le.map(|le| ("le", le)))
        .peekable();

    if pairs.peek().is_some() {
        out.push('{');
        for (i, (k, v)) in pairs.enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(k);
            out.push_str("=\"");
            escape_label(v, out);
            out.push('"');
        }
        out.push('}');
    }

    out.push(' ');
    out.push_str(value);
    out.push('\n');
}

/// Label values escape backslash, double quote and newline.
fn escape_label(v: &str, out: &mut String) {
    for c in v.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
}

/// HELP text escapes backslash and newline only.
fn escape_help(v: &str, out: &mut String) {
    for c in v.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
}

/// Sample value: shortest round-trip decimal, `+Inf`, `-Inf` or `NaN`.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        v.to_string()
    }
}

/// Bucket bound for `le`: like [`format_value`] but always with a decimal point.
pub fn format_bound(v: f64) -> String {
    let s = format_value(v);
    if v.is_finite() && !s.contains('.') {
        format!("{s}.0")
    } else {
        s
    }
}
