//! Console rendering of the computed reports.

use crate::domain::model::Nutrient;
use crate::domain::report::{
    DilutionResult, NutrientStatus, PearsonResult, RationReport, RationWarning,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    /// Header underlined with dashes, columns separated by two spaces.
    Simple,
    /// Markdown pipe table.
    Github,
}

/// Plain text table. The first column is left-aligned, the rest right-aligned.
#[derive(Debug, Clone)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| display_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(display_width(cell));
                }
            }
        }
        widths
    }

    pub fn render(&self, style: TableStyle) -> String {
        let widths = self.widths();
        let format_row = |cells: &[String]| -> Vec<String> {
            widths
                .iter()
                .enumerate()
                .map(|(i, width)| {
                    let cell = cells.get(i).map(String::as_str).unwrap_or("");
                    pad(cell, *width, i > 0)
                })
                .collect()
        };

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        match style {
            TableStyle::Simple => {
                lines.push(format_row(&self.headers).join("  "));
                lines.push(
                    widths
                        .iter()
                        .map(|w| "-".repeat(*w))
                        .collect::<Vec<_>>()
                        .join("  "),
                );
                for row in &self.rows {
                    lines.push(format_row(row).join("  "));
                }
            }
            TableStyle::Github => {
                lines.push(format!("| {} |", format_row(&self.headers).join(" | ")));
                let rule: Vec<String> = widths
                    .iter()
                    .enumerate()
                    .map(|(i, w)| {
                        if i == 0 {
                            format!(":{}", "-".repeat(w + 1))
                        } else {
                            format!("{}:", "-".repeat(w + 1))
                        }
                    })
                    .collect();
                lines.push(format!("|{}|", rule.join("|")));
                for row in &self.rows {
                    lines.push(format!("| {} |", format_row(row).join(" | ")));
                }
            }
        }
        lines.join("\n")
    }
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, width: usize, right_align: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(display_width(text)));
    if right_align {
        format!("{}{}", fill, text)
    } else {
        format!("{}{}", text, fill)
    }
}

pub fn status_label(status: &NutrientStatus) -> String {
    match status {
        NutrientStatus::Ok => "✅ OK".to_string(),
        NutrientStatus::Low { deviation_pct } => format!("🔻 LOW ({:.1}%)", deviation_pct),
        NutrientStatus::High { deviation_pct } => format!("🔺 HIGH ({:+.1}%)", deviation_pct),
        NutrientStatus::NotApplicable => "N/A".to_string(),
    }
}

pub fn render_ration<W: Write>(report: &RationReport, out: &mut W) -> io::Result<()> {
    for warning in &report.warnings {
        if let RationWarning::NotNormalized { .. } = warning {
            writeln!(out, "⚠️  Warning: {}\n", warning)?;
        }
    }

    writeln!(
        out,
        "### Ration Analysis for: {} ###\n",
        report.animal_description
    )?;

    for warning in &report.warnings {
        if let RationWarning::InclusionExceeded { .. } = warning {
            writeln!(out, "⚠️  {}", warning)?;
        }
    }

    let mut feeds = TextTable::new(["Feed", "Qty", "ME", "CP", "Ca", "P"]);
    for row in &report.contributions {
        let c = &row.contributions;
        feeds.push_row(vec![
            row.name.clone(),
            format!("{:.1}", row.quantity),
            format!("{:.1}", c.get(Nutrient::Me)),
            format!("{:.2}", c.get(Nutrient::Cp)),
            format!("{:.2}", c.get(Nutrient::Ca)),
            format!("{:.2}", c.get(Nutrient::P)),
        ]);
    }
    writeln!(out, "{}", feeds.render(TableStyle::Simple))?;
    writeln!(out, "{}", "-".repeat(60))?;

    let mut balance = TextTable::new(["Nutrient", "Calculated", "Required", "Status"]);
    for comparison in &report.comparisons {
        balance.push_row(vec![
            comparison.nutrient.label().to_string(),
            format!("{:.2}", comparison.calculated),
            comparison
                .target
                .map(|t| format!("{:.2}", t))
                .unwrap_or_else(|| "-".to_string()),
            status_label(&comparison.status),
        ]);
    }
    writeln!(out, "\n### Nutritional Balance ###")?;
    writeln!(out, "{}", balance.render(TableStyle::Github))?;

    let ratios = &report.ratios;
    writeln!(out, "\n### Ratios ###")?;
    writeln!(
        out,
        "Ca/P Ratio: {:.2} (Target: {} - {}) {}",
        ratios.ca_p,
        ratios.ca_p_range.0,
        ratios.ca_p_range.1,
        if ratios.ca_p_acceptable { "✅" } else { "⚠️" }
    )?;
    writeln!(out, "Energy/Protein Ratio: {:.1}", ratios.me_cp)?;

    writeln!(out, "\nFINAL RESULT: {}", report.verdict)?;
    Ok(())
}

pub fn render_pearson<W: Write>(result: &PearsonResult, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "\n### Pearson Square Calculation (Target: {}) ###",
        result.target
    )?;
    writeln!(
        out,
        "Feed 1 ({}): {:.2} parts ({:.1}%)",
        result.feed1_value, result.parts1, result.pct1
    )?;
    writeln!(
        out,
        "Feed 2 ({}): {:.2} parts ({:.1}%)",
        result.feed2_value, result.parts2, result.pct2
    )?;
    writeln!(out, "{}", "-".repeat(30))?;
    writeln!(
        out,
        "Mix {:.2} parts of Feed 1 with {:.2} parts of Feed 2.",
        result.parts1, result.parts2
    )?;
    Ok(())
}

pub fn render_dilution<W: Write>(result: &DilutionResult, out: &mut W) -> io::Result<()> {
    writeln!(out, "\n### Dilution Calculation ###")?;
    writeln!(
        out,
        "Start Conc: {}% | Target Conc: {}%",
        result.start_conc, result.target_conc
    )?;
    writeln!(out, "Dilution Factor: {:.2}", result.dilution_factor)?;
    writeln!(out, "{}", "-".repeat(30))?;
    writeln!(
        out,
        "Add {:.2} parts of water to 1 part of solution.",
        result.water_parts
    )?;
    Ok(())
}

#[derive(Serialize)]
struct JsonEnvelope<'a, T: Serialize> {
    command: &'a str,
    generated_at: String,
    result: &'a T,
}

pub fn render_json<T: Serialize, W: Write>(
    command: &str,
    result: &T,
    out: &mut W,
) -> crate::utils::error::Result<()> {
    let envelope = JsonEnvelope {
        command,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        result,
    };
    serde_json::to_writer_pretty(&mut *out, &envelope)?;
    writeln!(out)?;
    Ok(())
}
