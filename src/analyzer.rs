//! Chemical name -> use / benefit / disadvantage reports

use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::model::{Attribute, ModelBundle};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// One line of the names file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChemicalName(String);

impl ChemicalName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChemicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split a names document into chemical names, in input order.
///
/// Trailing whitespace is trimmed and blank lines are skipped; duplicates are
/// kept.
pub fn parse_names(contents: &str) -> Vec<ChemicalName> {
    contents
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(|line| ChemicalName(line.to_string()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionReport {
    pub chemical: String,
    #[serde(rename = "use")]
    pub uses: String,
    pub benefit: String,
    pub disadvantage: String,
}

impl fmt::Display for PredictionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chemical: {}\n- Use: {}\n- Benefits: {}\n- Disadvantages: {}\n",
            self.chemical, self.uses, self.benefit, self.disadvantage
        )
    }
}

/// Join report blocks with a newline, leaving a blank line between them
pub fn render(reports: &[PredictionReport]) -> String {
    reports
        .iter()
        .map(|report| report.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub reports: Vec<PredictionReport>,
    pub rendered: String,
}

/// Predicts chemical attributes with an owned model bundle
pub struct ChemicalAnalyzer {
    bundle: ModelBundle,
}

impl ChemicalAnalyzer {
    pub fn new(bundle: ModelBundle) -> Self {
        Self { bundle }
    }

    pub fn predict(&self, name: &ChemicalName) -> Result<PredictionReport, AnalysisError> {
        let features = self.bundle.vectorizer.transform(name.as_str());
        if features.is_empty() {
            tracing::warn!("'{}' has no known terms; predicting from priors", name);
        }

        let [uses, benefit, disadvantage] = Attribute::ALL.map(|attribute| {
            self.bundle
                .predict(&features, attribute)
                .map(str::to_string)
                .map_err(|source| AnalysisError::Prediction {
                    chemical: name.to_string(),
                    source,
                })
        });

        let report = PredictionReport {
            chemical: name.to_string(),
            uses: uses?,
            benefit: benefit?,
            disadvantage: disadvantage?,
        };

        tracing::debug!(
            "{}: use={:?} benefit={:?} disadvantage={:?}",
            report.chemical,
            report.uses,
            report.benefit,
            report.disadvantage
        );

        Ok(report)
    }

    /// Predict every name; the first failure aborts the batch
    pub fn analyze(&self, names: &[ChemicalName]) -> Result<Vec<PredictionReport>, AnalysisError> {
        names.iter().map(|name| self.predict(name)).collect()
    }
}

/// Read names, load the bundle, predict, and write the report file.
///
/// The output file is replaced only once every report has been produced.
pub fn run(config: &AnalyzerConfig) -> Result<RunSummary, AnalysisError> {
    let start = Instant::now();

    if !config.names_path.exists() {
        return Err(AnalysisError::NamesFileNotFound(config.names_path.clone()));
    }

    let contents = std::fs::read_to_string(&config.names_path)?;
    let names = parse_names(&contents);
    if names.is_empty() {
        return Err(AnalysisError::NoChemicalNames(config.names_path.clone()));
    }
    tracing::info!("Read {} chemical names from {:?}", names.len(), config.names_path);

    let analyzer = ChemicalAnalyzer::new(ModelBundle::load(&config.model_path)?);
    let reports = analyzer.analyze(&names)?;
    let rendered = render(&reports);

    write_atomically(&config.output_path, rendered.as_bytes())?;

    tracing::info!(
        "Wrote {} reports to {:?} in {}ms",
        reports.len(),
        config.output_path,
        start.elapsed().as_millis()
    );

    Ok(RunSummary {
        output_path: config.output_path.clone(),
        reports,
        rendered,
    })
}

fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), AnalysisError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.persist(path).map_err(|e| AnalysisError::Io(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::SAMPLE_BUNDLE;

    fn analyzer() -> ChemicalAnalyzer {
        ChemicalAnalyzer::new(ModelBundle::from_json(SAMPLE_BUNDLE).unwrap())
    }

    fn workspace(names: Option<&str>) -> (tempfile::TempDir, AnalyzerConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalyzerConfig {
            names_path: dir.path().join("chemical_names.txt"),
            model_path: dir.path().join("skincare_model.json"),
            output_path: dir.path().join("ans.txt"),
        };
        std::fs::write(&config.model_path, SAMPLE_BUNDLE).unwrap();
        if let Some(names) = names {
            std::fs::write(&config.names_path, names).unwrap();
        }
        (dir, config)
    }

    #[test]
    fn test_parse_names_keeps_order_and_duplicates() {
        let names = parse_names("Glycerin  \n\n Paraben\r\nGlycerin\n   \n");
        let names: Vec<&str> = names.iter().map(ChemicalName::as_str).collect();
        assert_eq!(names, vec!["Glycerin", " Paraben", "Glycerin"]);
    }

    #[test]
    fn test_report_template() {
        let report = PredictionReport {
            chemical: "Glycerin".to_string(),
            uses: "Humectant".to_string(),
            benefit: "Hydrates".to_string(),
            disadvantage: "None".to_string(),
        };
        assert_eq!(
            report.to_string(),
            "Chemical: Glycerin\n- Use: Humectant\n- Benefits: Hydrates\n- Disadvantages: None\n"
        );
    }

    #[test]
    fn test_render_separates_blocks_with_blank_line() {
        let reports = analyzer()
            .analyze(&parse_names("Glycerin\nParaben"))
            .unwrap();
        assert_eq!(
            render(&reports),
            "Chemical: Glycerin\n- Use: Humectant\n- Benefits: Hydrates and softens skin\n- Disadvantages: Rarely irritating\n\
             \n\
             Chemical: Paraben\n- Use: Preservative\n- Benefits: Limited benefit\n- Disadvantages: Possible endocrine disruption\n"
        );
    }

    #[test]
    fn test_unknown_name_still_predicts() {
        let report = analyzer()
            .predict(&parse_names("Niacinamide")[0])
            .unwrap();
        assert_eq!(report.chemical, "Niacinamide");
        assert!(!report.uses.is_empty());
    }

    #[test]
    fn test_run_writes_output() {
        let (_dir, config) = workspace(Some("Glycerin\nParaben\n"));

        let summary = run(&config).unwrap();

        let written = std::fs::read_to_string(&config.output_path).unwrap();
        assert_eq!(written, summary.rendered);
        assert_eq!(summary.reports.len(), 2);
        assert!(written.starts_with("Chemical: Glycerin\n"));
        assert!(written.contains("\n\nChemical: Paraben\n"));
    }

    #[test]
    fn test_run_is_idempotent() {
        let (_dir, config) = workspace(Some("Retinol\nGlycerin\n"));

        run(&config).unwrap();
        let first = std::fs::read(&config.output_path).unwrap();
        run(&config).unwrap();
        let second = std::fs::read(&config.output_path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_run_overwrites_existing_output() {
        let (_dir, config) = workspace(Some("Paraben"));
        std::fs::write(&config.output_path, "stale report that is much longer than the new one\n".repeat(20))
            .unwrap();

        run(&config).unwrap();

        let written = std::fs::read_to_string(&config.output_path).unwrap();
        assert!(written.starts_with("Chemical: Paraben\n"));
        assert!(!written.contains("stale"));
    }

    #[test]
    fn test_missing_names_file() {
        let (_dir, config) = workspace(None);

        let err = run(&config).unwrap_err();

        assert_eq!(err.to_string(), "chemical_names.txt not found");
        assert!(!config.output_path.exists());
    }

    #[test]
    fn test_blank_names_file() {
        let (_dir, config) = workspace(Some("\n  \n"));
        assert!(matches!(run(&config), Err(AnalysisError::NoChemicalNames(_))));
    }

    #[test]
    fn test_corrupt_model_leaves_previous_output() {
        let (_dir, config) = workspace(Some("Glycerin"));
        std::fs::write(&config.model_path, "{}").unwrap();
        std::fs::write(&config.output_path, "previous").unwrap();

        assert!(matches!(run(&config), Err(AnalysisError::Model(_))));
        assert_eq!(std::fs::read_to_string(&config.output_path).unwrap(), "previous");
    }
}
