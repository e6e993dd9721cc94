use merit_counsel::config::CounsellingConfig;
use merit_counsel::counselling::{
    Catalog, CatalogError, CatalogStore, CounsellingService, PreferenceChoice,
    ProbabilisticAvailability, Stream,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) type LiveService = CounsellingService<ProbabilisticAvailability>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) catalog: Arc<CatalogStore>,
    pub(crate) catalog_path: Option<PathBuf>,
}

/// CSV catalog when a path is given, the built-in sample otherwise.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogError> {
    let catalog = match path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::sample(),
    };

    let source = path
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "built-in sample".to_string());
    info!(
        source = %source,
        institutions = catalog.institutions().len(),
        programs = catalog.program_count(),
        "catalog loaded"
    );
    Ok(catalog)
}

pub(crate) fn build_service(config: &CounsellingConfig) -> Result<Arc<LiveService>, CatalogError> {
    let catalog = load_catalog(config.catalog_path.as_deref())?;
    let availability = ProbabilisticAvailability::new(config.seat_success_rate, config.seed);

    Ok(Arc::new(CounsellingService::new(
        Arc::new(CatalogStore::new(catalog)),
        availability,
        config,
    )))
}

/// `INST:PROG`, e.g. `CEG:CSE`.
pub(crate) fn parse_choice(raw: &str) -> Result<PreferenceChoice, String> {
    match raw.trim().split_once(':') {
        Some((institution, program))
            if !institution.trim().is_empty() && !program.trim().is_empty() =>
        {
            Ok(PreferenceChoice::new(institution.trim(), program.trim()))
        }
        _ => Err(format!("expected INSTITUTION:PROGRAM, got '{raw}'")),
    }
}

pub(crate) fn parse_stream(raw: &str) -> Result<Stream, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "science" => Ok(Stream::Science),
        "commerce" => Ok(Stream::Commerce),
        "arts" => Ok(Stream::Arts),
        other => Err(format!(
            "unknown stream '{other}' (expected science, commerce or arts)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use merit_counsel::counselling::{InstitutionId, ProgramId};

    #[test]
    fn parses_institution_program_pairs() {
        let choice = parse_choice(" CEG:CSE ").expect("valid choice");
        assert_eq!(choice.institution_id, InstitutionId::from("CEG"));
        assert_eq!(choice.program_id, ProgramId::from("CSE"));

        assert!(parse_choice("CEG").is_err());
        assert!(parse_choice("CEG:").is_err());
    }

    #[test]
    fn parses_streams_case_insensitively() {
        assert_eq!(parse_stream("Commerce"), Ok(Stream::Commerce));
        assert!(parse_stream("law").is_err());
    }

    #[test]
    fn missing_catalog_file_is_reported() {
        let result = load_catalog(Some(Path::new("/nonexistent/catalog.csv")));
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
