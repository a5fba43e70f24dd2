//! Convert a raw contacts CSV export into the column layout expected by an
//! address-label sheet.
//!
//! Besides the column remapping this cleans the data up on the way through:
//! rows whose name is on a drop list are skipped, "A and B" couple names
//! become "A & B", empty or sloppy country values are normalized to "USA",
//! street/city fields are title-cased, and rows that agree on name, first
//! address line and city (case-insensitively) are collapsed to the first
//! occurrence.

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    process::exit,
};
use structopt::StructOpt;
use thiserror::Error;

#[derive(Debug, Error)]
enum ExportError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(StructOpt)]
#[structopt(about = "Map a contacts CSV export to an address-label CSV")]
struct Opt {
    /// Source CSV file to be processed
    #[structopt(name = "input-file", parse(from_os_str))]
    input_file: PathBuf,

    /// Path for the output file
    #[structopt(short = "o", long = "output", default_value = "zazzle.csv")]
    output_file: PathBuf,

    /// File listing names to drop, one per line
    #[structopt(long, parse(from_os_str))]
    known_drops: Option<PathBuf>,

    /// File listing names that should not receive mail, one per line
    #[structopt(long, parse(from_os_str))]
    known_no_mail: Option<PathBuf>,

    /// Expand "First1 & First2 Last" into one row per person
    #[structopt(long)]
    split_shared_names: bool,
}

/// Row of the source export. Only these columns are used; anything else in
/// the file is ignored, and a column missing entirely reads as empty.
#[derive(Debug, Deserialize)]
struct ContactRow {
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    address_line_1: String,
    #[serde(default)]
    address_line_2: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    postal_code: String,
}

/// Row of the label sheet. Field order is the output column order.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct LabelRow {
    #[serde(rename = "Full Name")]
    full_name: String,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Company")]
    company: String,
    #[serde(rename = "Address 1")]
    address_1: String,
    #[serde(rename = "Address 2 (e.g. Unit #)")]
    address_2: String,
    #[serde(rename = "Address 3")]
    address_3: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Zip Code")]
    zip_code: String,
    #[serde(rename = "Phone Number")]
    phone_number: String,
    #[serde(rename = "Email")]
    email: String,
}

/// Read a drop list: one name per line, trimmed, empty lines ignored.
fn read_names(path: &Path) -> Result<HashSet<String>, ExportError> {
    let file = File::open(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut names = HashSet::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = line.trim();
        if !name.is_empty() {
            names.insert(name.to_string());
        }
    }
    Ok(names)
}

/// Title-case every alphabetic run: first letter upper, rest lower.
/// "123 main st" becomes "123 Main St".
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alphabetic = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alphabetic {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alphabetic = true;
        } else {
            out.push(c);
            prev_alphabetic = false;
        }
    }
    out
}

/// Split "First1 & First2 Last" into ("First1 Last", "First2 Last"). When
/// the part after the ampersand is a single word there is no shared last
/// name and the two halves are returned as-is. `None` when there is no
/// ampersand or either half is empty.
fn split_shared_last_name(name: &str) -> Option<(String, String)> {
    let (first_half, second_half) = name.split_once('&')?;
    let person1 = first_half.trim();
    let person2 = second_half.trim();
    if person1.is_empty() || person2.is_empty() {
        return None;
    }
    let words: Vec<&str> = person2.split_whitespace().collect();
    if words.len() > 1 {
        let last_name = words[words.len() - 1];
        let person2_first = words[..words.len() - 1].join(" ");
        Some((
            format!("{} {}", person1, last_name),
            format!("{} {}", person2_first, last_name),
        ))
    } else {
        Some((person1.to_string(), person2.to_string()))
    }
}

fn normalize_country(country: &str) -> String {
    match country {
        "" | "Us" => "USA".to_string(),
        other => other.to_string(),
    }
}

/// The mapping pipeline: drop listed names, normalize "and" to "&",
/// optionally split shared-last-name couples, fix countries, title-case the
/// address fields and drop case-insensitive (name, address 1, city)
/// duplicates, keeping the first occurrence.
fn map_contacts(rows: Vec<ContactRow>, drops: &HashSet<String>, split_shared: bool) -> Vec<LabelRow> {
    let mut seen = HashSet::new();
    let mut labels = Vec::new();
    for row in rows {
        // Drop lists match the raw export name, before any rewriting.
        if drops.contains(&row.full_name) {
            continue;
        }
        let name = row.full_name.replace(" and ", " & ");
        let names = if split_shared {
            match split_shared_last_name(&name) {
                Some((first, second)) => vec![first, second],
                None => vec![name],
            }
        } else {
            vec![name]
        };
        for full_name in names {
            let label = LabelRow {
                full_name,
                country: normalize_country(&row.country),
                company: String::new(),
                address_1: title_case(&row.address_line_1),
                address_2: title_case(&row.address_line_2),
                address_3: String::new(),
                city: title_case(&row.city),
                state: row.state.clone(),
                zip_code: row.postal_code.clone(),
                phone_number: String::new(),
                email: String::new(),
            };
            let key = (
                label.full_name.to_uppercase(),
                label.address_1.to_uppercase(),
                label.city.to_uppercase(),
            );
            if seen.insert(key) {
                labels.push(label);
            }
        }
    }
    labels
}

fn run(opt: &Opt) -> Result<(), ExportError> {
    let mut drops = HashSet::new();
    for list in [&opt.known_drops, &opt.known_no_mail].iter().filter_map(|o| o.as_ref()) {
        drops.extend(read_names(list)?);
    }

    let mut reader = csv::Reader::from_path(&opt.input_file)?;
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<ContactRow>, _>>()?;
    let total = rows.len();

    let labels = map_contacts(rows, &drops, opt.split_shared_names);

    let mut writer = csv::Writer::from_path(&opt.output_file)?;
    for label in &labels {
        writer.serialize(label)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: opt.output_file.clone(),
        source,
    })?;

    info!(
        "Mapped {} of {} contacts into {}",
        labels.len(),
        total,
        opt.output_file.display()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opt = Opt::from_args();
    if let Err(err) = run(&opt) {
        error!("{}", err);
        exit(1);
    }
}
