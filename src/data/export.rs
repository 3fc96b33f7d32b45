//! JSON export of surfaces, smiles and convergence tables
//!
//! Every file wraps its payload in a [`Report`] stamped with the UTC time it
//! was generated, for consumption by external plotting tools.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::{Smile, VolSimResult, VolatilitySurface};
use crate::simulation::{BenchmarkComparison, ConvergenceRecord};

/// Timestamped export payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report<T> {
    pub generated_at: DateTime<Utc>,
    pub data: T,
}

/// Convergence study with an optional closed-form benchmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceTable {
    pub records: Vec<ConvergenceRecord>,
    pub benchmark: Option<BenchmarkComparison>,
}

fn write_report<T: Serialize>(data: T, path: &Path) -> VolSimResult<()> {
    let report = Report {
        generated_at: Utc::now(),
        data,
    };
    let json = serde_json::to_string_pretty(&report)?;
    fs::write(path, json)?;
    tracing::info!(path = %path.display(), "Wrote report");
    Ok(())
}

/// Read back any report written by this module
pub fn read_report<T: DeserializeOwned>(path: impl AsRef<Path>) -> VolSimResult<Report<T>> {
    let json = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&json)?)
}

pub fn write_surface_json(surface: &VolatilitySurface, path: impl AsRef<Path>) -> VolSimResult<()> {
    write_report(surface, path.as_ref())
}

pub fn write_smiles_json(smiles: &[Smile], path: impl AsRef<Path>) -> VolSimResult<()> {
    write_report(smiles, path.as_ref())
}

pub fn write_convergence_json(
    records: &[ConvergenceRecord],
    benchmark: Option<BenchmarkComparison>,
    path: impl AsRef<Path>,
) -> VolSimResult<()> {
    let table = ConvergenceTable {
        records: records.to_vec(),
        benchmark,
    };
    write_report(table, path.as_ref())
}
