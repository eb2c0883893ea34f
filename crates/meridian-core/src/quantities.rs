//! Parsing for Kubernetes-style resource quantity strings, for callers that hand the
//! graph parser raw `podSpec`/`status.capacity` style requests instead of plain numbers.

use crate::error::MeridianError;

/// Parse a cpu quantity: a plain number of cores (`"2"`, `"0.5"`) or a millicore suffix
/// (`"500m"`). Returns fractional cores.
pub fn parse_cpu(s: &str) -> Result<f64, MeridianError> {
    if let Some(milli) = s.strip_suffix('m') {
        milli
            .parse::<f64>()
            .map(|m| m / 1000.0)
            .map_err(|e| MeridianError::invalid_resource(s, e.to_string()))
    } else {
        s.parse::<f64>()
            .map_err(|e| MeridianError::invalid_resource(s, e.to_string()))
    }
}

/// Parse a memory quantity: plain bytes, or a binary-unit suffix (`Ki`, `Mi`, `Gi`).
/// Returns bytes.
pub fn parse_memory(s: &str) -> Result<f64, MeridianError> {
    const UNITS: [(&str, f64); 3] = [
        ("Gi", 1024.0 * 1024.0 * 1024.0),
        ("Mi", 1024.0 * 1024.0),
        ("Ki", 1024.0),
    ];

    for (suffix, multiplier) in UNITS {
        if let Some(num) = s.strip_suffix(suffix) {
            return num
                .parse::<f64>()
                .map(|n| n * multiplier)
                .map_err(|e| MeridianError::invalid_resource(s, e.to_string()));
        }
    }

    s.parse::<f64>()
        .map_err(|e| MeridianError::invalid_resource(s, e.to_string()))
}
