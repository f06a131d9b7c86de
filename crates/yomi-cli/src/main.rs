use std::path::Path;
use std::process;
use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;

use yomi_core::analyzer::LexiconAnalyzer;
use yomi_core::convert::{ConvertRequest, Converter};
use yomi_core::dict::TableDictionary;
use yomi_core::division::Division;
use yomi_core::render::{Mode, Target};
use yomi_core::romaji::RomajiSystem;

#[derive(Parser)]
#[command(name = "yomitool", about = "Japanese reading and transliteration tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert text into a target script
    Convert {
        /// Path to the lexicon file (spelling<TAB>reading lines)
        lexicon_file: String,
        /// Text to convert
        text: String,
        /// Target script: hiragana, katakana, or romaji
        #[arg(long, default_value = "hiragana")]
        to: String,
        /// Presentation mode: normal, spaced, okurigana, or furigana
        #[arg(long, default_value = "normal")]
        mode: String,
        /// Romanization system: hepburn, nippon, or passport
        #[arg(long, default_value = "hepburn")]
        system: String,
        /// Opening delimiter for reading annotations
        #[arg(long, default_value = "(")]
        delimiter_start: String,
        /// Closing delimiter for reading annotations
        #[arg(long, default_value = ")")]
        delimiter_end: String,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved division/element structure for a text
    Divisions {
        /// Path to the lexicon file (spelling<TAB>reading lines)
        lexicon_file: String,
        /// Text to analyze
        text: String,
        /// Romanization system: hepburn, nippon, or passport
        #[arg(long, default_value = "hepburn")]
        system: String,
        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct ConvertReport {
    input: String,
    target: Target,
    mode: Mode,
    system: RomajiSystem,
    output: String,
}

fn parse_selector<T>(value: &str, what: &str) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().unwrap_or_else(|e| {
        eprintln!("Invalid {}: {}", what, e);
        process::exit(1);
    })
}

fn open_converter(lexicon_file: &str) -> Converter {
    let dict = TableDictionary::open(Path::new(lexicon_file)).unwrap_or_else(|e| {
        eprintln!("Failed to open lexicon at {}: {}", lexicon_file, e);
        process::exit(1);
    });
    let dict = Arc::new(dict);
    Converter::new(Arc::new(LexiconAnalyzer::new(dict.clone())), dict)
}

fn print_division_table(divisions: &[Division]) {
    use unicode_width::UnicodeWidthStr;

    fn pad(s: &str, width: usize) -> String {
        let display = UnicodeWidthStr::width(s);
        if display < width {
            format!("{}{}", s, " ".repeat(width - display))
        } else {
            s.to_string()
        }
    }

    let header = ["#", "Spelling", "Category", "Hiragana", "Katakana", "Romaji"];
    let mut rows: Vec<[String; 6]> = Vec::new();
    for (i, division) in divisions.iter().enumerate() {
        for element in &division.elements {
            rows.push([
                i.to_string(),
                element.spelling.clone(),
                element.category.to_string(),
                element.hiragana.clone(),
                element.katakana.clone(),
                element.romaji.clone(),
            ]);
        }
    }

    let mut widths: Vec<usize> = header.iter().map(|h| UnicodeWidthStr::width(*h)).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    let line = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| pad(cell, w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", line(&header));
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(|c| c.as_str()).collect();
        println!("{}", line(&cells));
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Convert {
            lexicon_file,
            text,
            to,
            mode,
            system,
            delimiter_start,
            delimiter_end,
            json,
        } => {
            let target: Target = parse_selector(&to, "target script");
            let mode: Mode = parse_selector(&mode, "mode");
            let system: RomajiSystem = parse_selector(&system, "romanization system");
            let converter = open_converter(&lexicon_file);

            let request = ConvertRequest {
                target,
                mode,
                system,
                delimiter_start,
                delimiter_end,
            };
            let output = converter.convert(&text, &request);

            if json {
                let report = ConvertReport {
                    input: text,
                    target,
                    mode,
                    system,
                    output,
                };
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).expect("JSON serialization failed")
                );
            } else {
                println!("{}", output);
            }
        }

        Command::Divisions {
            lexicon_file,
            text,
            system,
            json,
        } => {
            let system: RomajiSystem = parse_selector(&system, "romanization system");
            let converter = open_converter(&lexicon_file);
            let divisions = converter.divisions(&text, system);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&divisions).expect("JSON serialization failed")
                );
            } else {
                print_division_table(&divisions);
            }
        }
    }
}
