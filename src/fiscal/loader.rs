//! CSV-based fiscal table loader
//!
//! Loads fiscal tables from CSV files in data/fiscal/

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::inheritance::TaxBracket;

/// Default path to fiscal tables directory
pub const DEFAULT_FISCAL_PATH: &str = "data/fiscal";

/// Errors raised while loading or validating fiscal tables
#[derive(Debug, Error)]
pub enum FiscalModelError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("{file}: cannot parse '{value}' on record {record}")]
    Parse {
        file: &'static str,
        record: usize,
        value: String,
    },

    #[error("invalid {table} table: {reason}")]
    InvalidTable { table: &'static str, reason: String },

    #[error("missing fiscal constant '{0}'")]
    MissingConstant(&'static str),
}

fn open_reader(path: &Path, file: &'static str) -> Result<csv::Reader<File>, FiscalModelError> {
    let full_path = path.join(file);
    let handle = File::open(&full_path).map_err(|source| FiscalModelError::Io {
        path: full_path,
        source,
    })?;
    Ok(csv::Reader::from_reader(handle))
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    file: &'static str,
    line: usize,
) -> Result<T, FiscalModelError> {
    let raw = record.get(index).unwrap_or("").trim();
    raw.parse().map_err(|_| FiscalModelError::Parse {
        file,
        record: line,
        value: raw.to_string(),
    })
}

/// Load the demembrement table from CSV
/// Returns Vec<(floor_age, usufruct_pct)>
pub fn load_demembrement(path: &Path) -> Result<Vec<(u32, f64)>, FiscalModelError> {
    const FILE: &str = "demembrement.csv";
    let mut reader = open_reader(path, FILE)?;

    let mut bands = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result?;
        let age: u32 = parse_field(&record, 0, FILE, line + 1)?;
        let pct: f64 = parse_field(&record, 1, FILE, line + 1)?;
        bands.push((age, pct));
    }

    Ok(bands)
}

/// Load a progressive schedule (floor, rate) from CSV
pub fn load_brackets(path: &Path, file: &'static str) -> Result<Vec<TaxBracket>, FiscalModelError> {
    let mut reader = open_reader(path, file)?;

    let mut brackets = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result?;
        let floor: f64 = parse_field(&record, 0, file, line + 1)?;
        let rate: f64 = parse_field(&record, 1, file, line + 1)?;
        brackets.push(TaxBracket { floor, rate });
    }

    Ok(brackets)
}

/// Load named scalar constants from CSV
/// Returns HashMap<name, value>
pub fn load_constants(path: &Path) -> Result<HashMap<String, f64>, FiscalModelError> {
    const FILE: &str = "fiscal_constants.csv";
    let mut reader = open_reader(path, FILE)?;

    let mut constants = HashMap::new();
    for (line, result) in reader.records().enumerate() {
        let record = result?;
        let name = record.get(0).unwrap_or("").trim().to_string();
        let value: f64 = parse_field(&record, 1, FILE, line + 1)?;
        constants.insert(name, value);
    }

    Ok(constants)
}

/// All fiscal tables as read from disk, before validation
pub struct LoadedFiscalTables {
    pub demembrement: Vec<(u32, f64)>,
    pub child_brackets: Vec<TaxBracket>,
    pub life_insurance_brackets: Vec<TaxBracket>,
    pub constants: HashMap<String, f64>,
}

impl LoadedFiscalTables {
    /// Load all tables from the default path
    pub fn load_default() -> Result<Self, FiscalModelError> {
        Self::load_from(Path::new(DEFAULT_FISCAL_PATH))
    }

    /// Load all tables from a specific path
    pub fn load_from(path: &Path) -> Result<Self, FiscalModelError> {
        Ok(Self {
            demembrement: load_demembrement(path)?,
            child_brackets: load_brackets(path, "inheritance_child_brackets.csv")?,
            life_insurance_brackets: load_brackets(path, "life_insurance_brackets.csv")?,
            constants: load_constants(path)?,
        })
    }

    pub fn constant(&self, name: &'static str) -> Result<f64, FiscalModelError> {
        self.constants
            .get(name)
            .copied()
            .ok_or(FiscalModelError::MissingConstant(name))
    }
}
