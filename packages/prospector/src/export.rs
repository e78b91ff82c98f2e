//! Export of an ore cart to CSV, JSON or an HTML table.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ProspectorError, Result};
use crate::ore::Ore;

/// Output format of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Html,
}

impl ExportFormat {
    /// File extension for this format.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        }
    }
}

/// Write the cart to `{export_dir}/{site}.{extension}` and return the path.
///
/// The file is written to a temporary name first and renamed into place.
///
/// # Errors
/// Returns `Export` for an empty cart or one mixing records of several
/// sites, and `Io` / `Json` when writing fails.
pub fn refine_ore(cart: &[Ore], format: ExportFormat, export_dir: &Path) -> Result<PathBuf> {
    let site = cart_site(cart)?;

    let content = match format {
        ExportFormat::Csv => render_csv(cart),
        ExportFormat::Json => serde_json::to_string_pretty(cart)?,
        ExportFormat::Html => render_html(cart),
    };

    fs::create_dir_all(export_dir)?;
    let ext = format.extension();
    let output_file = export_dir.join(format!("{site}.{ext}"));
    let temp_file = export_dir.join(format!(".{site}.{ext}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    #[cfg(target_os = "windows")]
    if output_file.exists() {
        fs::remove_file(&output_file)?;
    }

    fs::rename(&temp_file, &output_file)?;

    tracing::info!(site, records = cart.len(), path = %output_file.display(), "Exported ore");
    Ok(output_file)
}

/// The single site name shared by every record of the cart.
fn cart_site(cart: &[Ore]) -> Result<&str> {
    let first = cart
        .first()
        .ok_or_else(|| ProspectorError::Export("the ore cart is empty".to_string()))?;
    let site = first.site_name();

    if let Some(other) = cart.iter().find(|ore| ore.site_name() != site) {
        return Err(ProspectorError::Export(format!(
            "the ore cart mixes sites \"{site}\" and \"{}\"",
            other.site_name()
        )));
    }
    Ok(site)
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn push_csv_row<'a>(out: &mut String, cells: impl IntoIterator<Item = &'a str>) {
    for (i, cell) in cells.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if needs_quotes(cell) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out.push_str("\r\n");
}

fn render_csv(cart: &[Ore]) -> String {
    let mut out = String::new();
    if let Some(first) = cart.first() {
        push_csv_row(&mut out, first.names().iter().map(String::as_str));
    }
    for ore in cart {
        push_csv_row(&mut out, ore.attributes().map(|(_, v)| v.unwrap_or_default()));
    }
    out
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_html(cart: &[Ore]) -> String {
    let mut out = String::from("<table border=\"1\" class=\"dataframe\">\n  <thead>\n    <tr>\n");
    if let Some(first) = cart.first() {
        for name in first.names() {
            out.push_str(&format!("      <th>{}</th>\n", escape_html(name)));
        }
    }
    out.push_str("    </tr>\n  </thead>\n  <tbody>\n");
    for ore in cart {
        out.push_str("    <tr>\n");
        for (_, value) in ore.attributes() {
            out.push_str(&format!(
                "      <td>{}</td>\n",
                escape_html(value.unwrap_or_default())
            ));
        }
        out.push_str("    </tr>\n");
    }
    out.push_str("  </tbody>\n</table>\n");
    out
}
