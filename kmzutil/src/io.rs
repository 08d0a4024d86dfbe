use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Pretty-prints with a 2-space indent. Non-ASCII characters are written as-is.
pub fn to_json<T: Serialize>(obj: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(obj)?)
}

/// Overwrites the file, creating parent directories as needed.
pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, obj: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs_err::create_dir_all(parent)?;
        }
    }
    fs_err::write(path, to_json(obj)?)?;
    Ok(())
}

pub fn read_json<P: AsRef<Path>, T: DeserializeOwned>(path: P) -> Result<T> {
    let path = path.as_ref();
    let contents = fs_err::read_to_string(path)?;
    let obj = serde_json::from_str(&contents)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(obj)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("names.json");
        let names = vec!["Córdoba".to_string(), "Neuquén".to_string()];
        write_json(&path, &names).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Córdoba"));
        assert!(raw.contains("\n  \"Neuquén\""));

        let back: Vec<String> = read_json(&path).unwrap();
        assert_eq!(back, names);
    }

    #[test]
    fn read_json_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "[{").unwrap();
        let err = read_json::<_, Vec<String>>(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
    }
}
