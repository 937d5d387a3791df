// mismo-anon-core/tests/config_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use mismo_anon_core::config::{self, AnonymizerConfig};
use mismo_anon_core::{Anonymizer, AnonymizerError};

#[test]
fn test_load_default_policy() {
    let config = AnonymizerConfig::load_default().unwrap();
    assert_eq!(config.generator.creditor_names.len(), 8);
    assert!(!config.generator.first_names.is_empty());
    assert_eq!(config.generator.phone_prefix, "555");
    assert_eq!(config.parser.max_depth, 256);
    assert_eq!(config.batch.extension, "xml");
}

#[test]
fn test_load_from_file_partial() -> Result<()> {
    let yaml_content = r#"
generator:
  creditor_names:
    - "TEST CREDITOR ONE"
  city: "Testville"
parser:
  recover: false
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml_content.as_bytes())?;
    let config = AnonymizerConfig::load_from_file(file.path())?;
    assert_eq!(config.generator.creditor_names, vec!["TEST CREDITOR ONE"]);
    assert_eq!(config.generator.city, "Testville");
    assert!(config.generator.first_names.is_empty());
    // Omitted scalars take struct defaults.
    assert_eq!(config.generator.state, "CA");
    assert!(!config.parser.recover);
    assert_eq!(config.parser.max_depth, 256);
    Ok(())
}

#[test]
fn test_load_from_file_reports_path_on_bad_yaml() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"generator: [not, a, map")?;
    let err = AnonymizerConfig::load_from_file(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config file"));
    Ok(())
}

#[test]
fn test_load_from_missing_file() {
    let err = AnonymizerConfig::load_from_file("/nonexistent/mismo-anon.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_merge_without_user_config() {
    let default_config = AnonymizerConfig::load_default().unwrap();
    let merged = config::merge_config(default_config.clone(), None);
    assert_eq!(merged, default_config);
}

#[test]
fn test_merge_fills_empty_lists_and_keeps_overrides() -> Result<()> {
    let default_config = AnonymizerConfig::load_default()?;
    let mut user = AnonymizerConfig::default();
    user.generator.company_names = vec!["USER COMPANY".to_string()];
    user.generator.city = "Elsewhere".to_string();
    user.batch.output_dir_name = "scrubbed".to_string();

    let merged = config::merge_config(default_config.clone(), Some(user));
    assert_eq!(merged.generator.company_names, vec!["USER COMPANY"]);
    assert_eq!(merged.generator.first_names, default_config.generator.first_names);
    assert_eq!(merged.generator.creditor_names, default_config.generator.creditor_names);
    assert_eq!(merged.generator.city, "Elsewhere");
    assert_eq!(merged.batch.output_dir_name, "scrubbed");
    merged.validate()?;
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected_by_anonymizer() {
    let mut config = AnonymizerConfig::load_default().unwrap();
    config.generator.min_age_years = 70;
    config.generator.max_age_years = 40;
    config.parser.max_depth = 0;
    let err = Anonymizer::new(config).unwrap_err();
    match err {
        AnonymizerError::InvalidConfig(message) => {
            assert!(message.contains("min_age_years"));
            assert!(message.contains("max_depth"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_candidate_paths_end_with_local_file() {
    let paths = config::config_candidate_paths();
    assert_eq!(paths.last().unwrap(), &std::path::PathBuf::from("./mismo-anon.yaml"));
}

#[test]
fn test_oversized_depth_is_rejected_from_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"parser:\n  max_depth: 10000000\n")?;
    let merged = config::merge_config(
        AnonymizerConfig::load_default()?,
        Some(AnonymizerConfig::load_from_file(file.path())?),
    );
    let err = merged.validate().unwrap_err().to_string();
    assert!(err.contains("parser.max_depth"));
    assert!(err.contains(&config::MAX_NESTING_DEPTH.to_string()));
    Ok(())
}
