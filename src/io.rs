use std::path::Path;

use log::info;

use crate::{manifest::Manifest, result::Result};

/// The formats a program manifest can be stored in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Format> {
        match path
            .extension()
            .and_then(|ex| ex.to_str())
            .map(|ex| ex.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            Some(ex) => Err(format!(
                "{} is not a program manifest, expected extension yaml, yml or json but got {}",
                path.display(),
                ex
            )),
            None => Err(format!(
                "{} is not a program manifest, expected extension yaml, yml or json",
                path.display()
            )),
        }
    }
}

pub fn parse_manifest(text: &str, format: Format) -> Result<Manifest> {
    match format {
        Format::Yaml => serde_yaml::from_str(text).map_err(|e| format!("{}", e)),
        Format::Json => serde_json::from_str(text).map_err(|e| format!("{}", e)),
    }
}

/// Reads the program manifest at `path`, choosing the format by extension.
pub fn read_manifest(path: &Path) -> Result<Manifest> {
    let format = Format::from_path(path)?;
    info!("Reading {:?} manifest {}", format, path.display());
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Could not read {}: {}", path.display(), e))?;
    parse_manifest(&text, format).map_err(|e| format!("{}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        for (path, expected) in [
            ("prog.yaml", Format::Yaml),
            ("prog.YML", Format::Yaml),
            ("dir/prog.json", Format::Json),
        ] {
            assert_eq!(Format::from_path(Path::new(path)), Ok(expected));
        }
        assert!(Format::from_path(Path::new("prog.n9")).is_err());
        assert!(Format::from_path(Path::new("prog")).is_err());
    }

    #[test]
    fn test_parse_both_formats() {
        let yaml = "body:\n  - write: {int: 1}\n";
        let json = r#"{"body": [{"write": {"int": 1}}]}"#;
        assert_eq!(
            parse_manifest(yaml, Format::Yaml).unwrap(),
            parse_manifest(json, Format::Json).unwrap()
        );
    }

    #[test]
    fn test_parse_error_is_reported() {
        assert!(parse_manifest("body: [{jump: 3}]", Format::Yaml).is_err());
        assert!(parse_manifest("{", Format::Json).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = read_manifest(Path::new("does/not/exist.yaml")).unwrap_err();
        assert!(err.starts_with("Could not read does/not/exist.yaml"), "{}", err);
    }
}
