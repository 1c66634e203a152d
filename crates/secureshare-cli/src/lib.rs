//! SecureShare CLI library: per-page flow state machines and display
//! helpers shared by the `secureshare` binary.

pub mod flows;

/// Render a byte count the way the product displays sizes: binary units,
/// at most two decimals, trailing zeros trimmed, zero as "0 Bytes".
pub fn format_file_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes <= 0 {
        return "0 Bytes".to_string();
    }

    let exponent = (((bytes as f64).ln() / 1024_f64.ln()).floor() as usize).min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);
    let rounded = (value * 100.0).round() / 100.0;

    format!("{} {}", rounded, UNITS[exponent])
}

/// Render timestamps like "Aug 01, 2026 10:00" (UTC).
pub fn format_date(date: &chrono::DateTime<chrono::Utc>) -> String {
    date.format("%b %d, %Y %H:%M").to_string()
}

/// Initialize tracing for the CLI binary.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
