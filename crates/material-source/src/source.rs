//! Material Sources

use crate::query::MaterialQuery;
use crate::SourceError;
use record_normalizer::{strength_to_psi, RawMaterial};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Anything that can answer a regional material query
pub trait MaterialSource {
    /// Raw records for plants within the query's region
    fn materials_within_region(&self, query: &MaterialQuery) -> Result<Vec<RawMaterial>, SourceError>;
}

/// Apply the strength window and record cap the database would apply.
///
/// Records whose strength cannot be read are passed through so the
/// normalizer can report them.
fn select(records: Vec<RawMaterial>, query: &MaterialQuery) -> Vec<RawMaterial> {
    let min = query.strength_min_psi as f64;
    let max = query.strength_max_psi as f64;
    let limit = query.record_limit().unwrap_or(usize::MAX);
    let total = records.len();

    let selected: Vec<RawMaterial> = records
        .into_iter()
        .filter(|r| {
            match r
                .concrete_compressive_strength_28d
                .as_deref()
                .map(strength_to_psi)
            {
                Some(Ok(psi)) => psi > min && psi < max,
                _ => true,
            }
        })
        .take(limit)
        .collect();

    debug!(
        "Selected {}/{} records (strength {}..{} psi, limit {:?})",
        selected.len(),
        total,
        min,
        max,
        query.record_limit()
    );
    selected
}

/// Source backed by records already in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<RawMaterial>,
}

impl InMemorySource {
    /// Create a source over the given records
    pub fn new(records: Vec<RawMaterial>) -> Self {
        Self { records }
    }

    /// Number of held records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the source holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl MaterialSource for InMemorySource {
    fn materials_within_region(&self, query: &MaterialQuery) -> Result<Vec<RawMaterial>, SourceError> {
        Ok(select(self.records.clone(), query))
    }
}

/// Source backed by a JSON array of captured material records
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source reading from `path` on every query
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// File backing this source
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<RawMaterial>, SourceError> {
        let path = self.path.display().to_string();
        let text = fs::read_to_string(&self.path).map_err(|e| SourceError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let records: Vec<RawMaterial> = serde_json::from_str(&text)
            .map_err(|e| SourceError::ParseError(format!("{}: {}", path, e)))?;

        if records.is_empty() {
            warn!("No material records in {}", path);
        }
        Ok(records)
    }
}

impl MaterialSource for JsonFileSource {
    fn materials_within_region(&self, query: &MaterialQuery) -> Result<Vec<RawMaterial>, SourceError> {
        // The capture is already regional; postal code and distance are not re-applied.
        let records = self.load()?;
        info!(
            "Loaded {} materials from {} for postal code {:05} within {}",
            records.len(),
            self.path.display(),
            query.postal_code,
            query.plant_distance()
        );
        Ok(select(records, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn material(id: &str, strength: Option<&str>) -> RawMaterial {
        RawMaterial {
            id: id.to_string(),
            concrete_compressive_strength_28d: strength.map(str::to_string),
            gwp: Some("300 kgCO2e".to_string()),
            plant_or_group: None,
        }
    }

    #[test]
    fn test_strength_window_is_exclusive() {
        let source = InMemorySource::new(vec![
            material("a", Some("2000 psi")),
            material("b", Some("4000 psi")),
            material("c", Some("8000 psi")),
            material("d", Some("60 MPa")),
        ]);
        let got = source
            .materials_within_region(&MaterialQuery::for_postal_code(10001))
            .unwrap();
        let ids: Vec<_> = got.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn test_unreadable_strength_passes_through() {
        let source = InMemorySource::new(vec![
            material("a", None),
            material("b", Some("30 N/mm2")),
        ]);
        let got = source
            .materials_within_region(&MaterialQuery::default())
            .unwrap();
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn test_record_limit_and_return_all() {
        let records: Vec<_> = (0..10).map(|i| material(&i.to_string(), Some("4000 psi"))).collect();
        let source = InMemorySource::new(records);

        let mut query = MaterialQuery {
            max_records: 3,
            ..Default::default()
        };
        assert_eq!(source.materials_within_region(&query).unwrap().len(), 3);

        query.return_all = true;
        assert_eq!(source.materials_within_region(&query).unwrap().len(), 10);
    }

    #[test]
    fn test_json_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"x1","concrete_compressive_strength_28d":"4000 psi","gwp":"310 kgCO2e",
                "plant_or_group":{{"owned_by":{{"name":"Acme"}}}}}},
               {{"id":"x2","concrete_compressive_strength_28d":"1 ksi","gwp":"200 kgCO2e"}}]"#
        )
        .unwrap();

        let source = JsonFileSource::new(file.path());
        let got = source
            .materials_within_region(&MaterialQuery::for_postal_code(2134))
            .unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, "x1");
    }

    #[test]
    fn test_json_file_errors() {
        let missing = JsonFileSource::new("/nonexistent/materials.json");
        assert!(matches!(
            missing.materials_within_region(&MaterialQuery::default()),
            Err(SourceError::Io { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"not\": \"an array\"}}").unwrap();
        let bad = JsonFileSource::new(file.path());
        assert!(matches!(
            bad.materials_within_region(&MaterialQuery::default()),
            Err(SourceError::ParseError(_))
        ));
    }
}
