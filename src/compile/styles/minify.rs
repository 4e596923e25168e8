//! Release-mode stylesheet minification.

use anyhow::{Result, anyhow};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};

/// Minify CSS source code.
///
/// Produces single-line output without comments whatever the engine
/// emitted.
pub fn minify_css(source: &str) -> Result<String> {
    let mut stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| anyhow!("Failed to parse compiled CSS: {e}"))?;
    stylesheet
        .minify(MinifyOptions::default())
        .map_err(|e| anyhow!("Failed to minify CSS: {e}"))?;
    // `/*! ... */` comments survive minify and would be printed on their own line
    stylesheet.license_comments.clear();
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("Failed to print CSS: {e}"))?;
    Ok(result.code)
}
