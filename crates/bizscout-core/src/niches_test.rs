use std::path::Path;

use super::*;

const SAMPLE: &str = r"
medspas:
  label: Medical Spas
  search_query: med spa
  vocabulary: [botox, filler, laser, facial]
  canonical_services:
    - Botox
    - Dermal Fillers
    - Laser Hair Removal
dentists:
  label: Dentists
  vocabulary: [cleaning, whitening]
  canonical_services: [Teeth Whitening, Dental Implants]
";

#[test]
fn parses_nested_mapping_keyed_by_niche() {
    let registry = NicheRegistry::from_yaml_str(SAMPLE).unwrap();
    assert_eq!(registry.len(), 2);

    let medspas = registry.get("medspas").unwrap();
    assert_eq!(medspas.key, "medspas");
    assert_eq!(medspas.label, "Medical Spas");
    assert_eq!(medspas.search_terms(), "med spa");
    assert_eq!(
        medspas.canonical_services,
        vec!["Botox", "Dermal Fillers", "Laser Hair Removal"]
    );
}

#[test]
fn search_terms_fall_back_to_label() {
    let registry = NicheRegistry::from_yaml_str(SAMPLE).unwrap();
    assert_eq!(registry.get("dentists").unwrap().search_terms(), "Dentists");
}

#[test]
fn unknown_key_returns_error() {
    let registry = NicheRegistry::from_yaml_str(SAMPLE).unwrap();
    let err = registry.get("plumbers").unwrap_err();
    assert_eq!(err.key, "plumbers");
    assert_eq!(err.to_string(), "unknown niche: 'plumbers'");
}

#[test]
fn list_all_is_sorted_by_key() {
    let registry = NicheRegistry::from_yaml_str(SAMPLE).unwrap();
    let keys: Vec<&str> = registry.list_all().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["dentists", "medspas"]);
}

#[test]
fn duplicate_terms_are_collapsed_case_insensitively() {
    let yaml = r"
salons:
  label: Hair Salons
  vocabulary: [Balayage, balayage, ' highlights ', '']
";
    let registry = NicheRegistry::from_yaml_str(yaml).unwrap();
    let salons = registry.get("salons").unwrap();
    assert_eq!(salons.vocabulary, vec!["Balayage", "highlights"]);
    assert!(salons.canonical_services.is_empty());
}

#[test]
fn rejects_empty_label() {
    let yaml = r"
gyms:
  label: '  '
  vocabulary: [crossfit]
";
    let err = NicheRegistry::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("gyms")));
}

#[test]
fn rejects_niche_without_terms() {
    let yaml = r"
gyms:
  label: Gyms
";
    let err = NicheRegistry::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn rejects_non_slug_keys() {
    let yaml = r"
Med Spas:
  label: Medical Spas
  vocabulary: [botox]
";
    let err = NicheRegistry::from_yaml_str(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let err = NicheRegistry::from_yaml_str("medspas: [unclosed").unwrap_err();
    assert!(matches!(err, ConfigError::NichesFileParse(_)));
}

#[test]
fn from_definitions_rejects_duplicate_keys() {
    let def = NicheDefinition {
        key: "medspas".to_string(),
        label: "Medical Spas".to_string(),
        search_query: None,
        vocabulary: vec!["botox".to_string()],
        canonical_services: vec![],
    };
    let err = NicheRegistry::from_definitions([def.clone(), def]).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate")));
}

#[test]
fn load_niches_reports_missing_file() {
    let err = load_niches(Path::new("/nonexistent/niches.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::NichesFileIo { .. }));
}

#[test]
fn shipped_niches_file_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/niches.yaml");
    let registry = load_niches(&path).expect("config/niches.yaml must load");
    assert!(registry.get("medspas").is_ok());
    assert!(registry.get("dentists").is_ok());
}
