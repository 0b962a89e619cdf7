//! Parse command - extract fields from a single document text.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use console::style;
use tracing::{debug, info};

use waybill_core::{DocumentParser, DriverDocumentParser, FieldMapping};

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Human-readable text
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input text file, or "-" for stdin
    #[arg(required = true)]
    input: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Treat the text as something other than a driver document
    #[arg(long)]
    not_driver: bool,

    /// Skip normalization and print values as extracted
    #[arg(long)]
    raw: bool,

    /// Also extract the carrier
    #[arg(long)]
    carrier: bool,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    if args.raw {
        config.normalization.enabled = false;
    }
    if args.carrier {
        config.extraction.include_carrier = true;
    }

    let text = read_input(&args.input)?;
    info!("Read {} characters from {}", text.chars().count(), args.input);

    let parser = DriverDocumentParser::with_config(config)?;
    let (found, fields) = parser.parse(&text, !args.not_driver);
    if !found {
        eprintln!("{} No driver data found", style("!").yellow());
    }

    let output = format_fields(&fields, args.format)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &output)?;
            debug!("Wrote output to {}", path.display());
            eprintln!(
                "{} Output written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => println!("{}", output),
    }

    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    fs::read_to_string(input).map_err(|e| anyhow::anyhow!("Failed to read {}: {}", input, e))
}

/// Render a field mapping in the requested format.
pub fn format_fields(fields: &FieldMapping, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
        OutputFormat::Csv => format_csv(fields),
        OutputFormat::Text => Ok(format_text(fields)),
    }
}

fn format_csv(fields: &FieldMapping) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(fields.iter().map(|(field, _)| field.key()))?;
    wtr.write_record(fields.iter().map(|(_, value)| value.display()))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(fields: &FieldMapping) -> String {
    let mut output = String::new();

    for (field, value) in fields.iter() {
        output.push_str(&format!("{}: {}\n", field.key(), value.display()));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use waybill_core::Field;

    fn sample() -> FieldMapping {
        let mut fields = FieldMapping::new();
        fields.insert(Field::DriverName, "Иванов Иван Иванович");
        fields.insert(
            Field::Phones,
            vec!["+7 (912) 345-67-89".to_string(), "+7 (495) 123-45-67".to_string()],
        );
        fields
    }

    #[test]
    fn test_format_text() {
        let text = format_text(&sample());
        assert!(text.contains("Водитель: Иванов Иван Иванович\n"));
        assert!(text.contains("Телефон: +7 (912) 345-67-89, +7 (495) 123-45-67\n"));
    }

    #[test]
    fn test_format_csv() {
        let csv = format_csv(&sample()).unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert!(header.contains("Водитель"));
        assert!(header.contains("Телефон"));
        assert!(lines.next().unwrap().contains("\"+7 (912) 345-67-89, +7 (495) 123-45-67\""));
    }

    #[test]
    fn test_format_empty_mapping() {
        let json = format_fields(&FieldMapping::new(), OutputFormat::Json).unwrap();
        assert_eq!(json, "{}");
    }
}
