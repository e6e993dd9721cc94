use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{Catalog, CatalogError, Institution, Program, ProgramCutoffs, SeatAllotment};
use crate::counselling::domain::{Category, InstitutionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    InstitutionId,
    InstitutionName,
    ProgramId,
    ProgramName,
    Capacity,
    Score(Category),
    Rank(Category),
}

impl Column {
    fn classify(header: &str) -> Result<Self, CatalogError> {
        let normalized = header.trim().to_ascii_lowercase();
        let column = match normalized.as_str() {
            "institution_id" => Column::InstitutionId,
            "institution_name" => Column::InstitutionName,
            "program_id" => Column::ProgramId,
            "program_name" => Column::ProgramName,
            "capacity" => Column::Capacity,
            other => {
                let (prefix, code) = other
                    .split_once('_')
                    .ok_or_else(|| CatalogError::UnknownColumn(header.to_string()))?;
                let category = code
                    .parse::<Category>()
                    .map_err(|_| CatalogError::UnknownColumn(header.to_string()))?;
                match prefix {
                    "score" => Column::Score(category),
                    "rank" => Column::Rank(category),
                    _ => return Err(CatalogError::UnknownColumn(header.to_string())),
                }
            }
        };
        Ok(column)
    }
}

impl Catalog {
    /// Load a catalog CSV from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse a catalog CSV with one row per (institution, program).
    ///
    /// Expected columns are `institution_id`, `institution_name`, `program_id`,
    /// `program_name`, an optional `capacity`, and optional `score_<CAT>` /
    /// `rank_<CAT>` columns per reservation category. Empty cells mean "no value".
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = csv_reader
            .headers()?
            .iter()
            .map(Column::classify)
            .collect::<Result<Vec<_>, _>>()?;

        for required in [
            (Column::InstitutionId, "institution_id"),
            (Column::ProgramId, "program_id"),
            (Column::ProgramName, "program_name"),
        ] {
            if !columns.contains(&required.0) {
                return Err(CatalogError::MissingColumn(required.1));
            }
        }

        let mut institutions: Vec<Institution> = Vec::new();
        let mut positions: HashMap<InstitutionId, usize> = HashMap::new();

        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            let row = parse_row(&columns, &record, line)?;

            let index = match positions.get(&row.institution_id) {
                Some(index) => *index,
                None => {
                    let name = row
                        .institution_name
                        .clone()
                        .unwrap_or_else(|| row.institution_id.0.clone());
                    institutions.push(Institution {
                        id: row.institution_id.clone(),
                        name,
                        programs: Vec::new(),
                    });
                    positions.insert(row.institution_id.clone(), institutions.len() - 1);
                    institutions.len() - 1
                }
            };

            institutions[index].programs.push(row.program);
        }

        Catalog::new(institutions)
    }
}

struct CatalogRow {
    institution_id: InstitutionId,
    institution_name: Option<String>,
    program: Program,
}

fn parse_row(
    columns: &[Column],
    record: &csv::StringRecord,
    line: u64,
) -> Result<CatalogRow, CatalogError> {
    let mut institution_id = None;
    let mut institution_name = None;
    let mut program_id = None;
    let mut program_name = None;
    let mut capacity = None;
    let mut cutoffs = ProgramCutoffs::new();
    let mut closing_ranks = Vec::new();

    for (column, value) in columns.iter().zip(record.iter()) {
        if value.is_empty() {
            continue;
        }

        let invalid = || CatalogError::InvalidValue {
            column: column_label(*column),
            value: value.to_string(),
            line,
        };

        match column {
            Column::InstitutionId => institution_id = Some(value.to_string()),
            Column::InstitutionName => institution_name = Some(value.to_string()),
            Column::ProgramId => program_id = Some(value.to_string()),
            Column::ProgramName => program_name = Some(value.to_string()),
            Column::Capacity => capacity = Some(value.parse::<u32>().map_err(|_| invalid())?),
            Column::Score(category) => {
                let score = value.parse::<f64>().map_err(|_| invalid())?;
                if !score.is_finite() || score < 0.0 {
                    return Err(invalid());
                }
                cutoffs.insert(*category, score);
            }
            Column::Rank(category) => {
                let rank = value.parse::<u32>().map_err(|_| invalid())?;
                closing_ranks.push((*category, rank));
            }
        }
    }

    let missing = |column: Column| CatalogError::InvalidValue {
        column: column_label(column),
        value: String::new(),
        line,
    };
    let institution_id = institution_id.ok_or_else(|| missing(Column::InstitutionId))?;
    let program_id = program_id.ok_or_else(|| missing(Column::ProgramId))?;
    let program_name = program_name.ok_or_else(|| missing(Column::ProgramName))?;

    let mut program = Program::new(&program_id, &program_name);
    if !cutoffs.is_empty() {
        program.cutoffs = Some(cutoffs);
    }
    if capacity.is_some() || !closing_ranks.is_empty() {
        let seats = closing_ranks.into_iter().fold(
            SeatAllotment::new(capacity.unwrap_or_default()),
            |seats, (category, rank)| seats.with_cutoff(category, rank),
        );
        program.seats = Some(seats);
    }

    Ok(CatalogRow {
        institution_id: InstitutionId(institution_id),
        institution_name,
        program,
    })
}

fn column_label(column: Column) -> String {
    match column {
        Column::InstitutionId => "institution_id".to_string(),
        Column::InstitutionName => "institution_name".to_string(),
        Column::ProgramId => "program_id".to_string(),
        Column::ProgramName => "program_name".to_string(),
        Column::Capacity => "capacity".to_string(),
        Column::Score(category) => format!("score_{}", category.code()),
        Column::Rank(category) => format!("rank_{}", category.code()),
    }
}
