//! Directory and path utilities for test resources.
//!
//! Sample configuration documents live in `samples/` next to this crate's
//! manifest. The crate directory is captured at compile time by the build script.

use std::path::PathBuf;

/// The source directory path for the `rankconf-testkit`, set at compile time
/// (provided by the build script).
pub const TESTKIT_SRC_DIR_STR: &str = env!("TESTKIT_SRC_DIR");

/// Returns the path to the testkit source directory.
pub fn get_testkit_src_dir() -> anyhow::Result<PathBuf> {
    let res = PathBuf::from(TESTKIT_SRC_DIR_STR);
    if !res.is_dir() {
        anyhow::bail!("{} not found", res.display());
    }
    Ok(res)
}

/// Returns the path to the sample documents directory (`rankconf-testkit/samples`).
pub fn get_samples_dir() -> anyhow::Result<PathBuf> {
    let samples_dir = get_testkit_src_dir()?.join("samples");
    if !samples_dir.is_dir() {
        anyhow::bail!("{} not found", samples_dir.display());
    }
    Ok(samples_dir)
}

/// Returns the path to the sample document `name` (for example `"scan_full.json"`).
pub fn get_sample_path(name: &str) -> anyhow::Result<PathBuf> {
    let path = get_samples_dir()?.join(name);
    if !path.is_file() {
        anyhow::bail!("{} not found", path.display());
    }
    Ok(path)
}

/// Lists the sample documents, sorted by file name.
pub fn list_samples() -> anyhow::Result<Vec<PathBuf>> {
    let mut samples = std::fs::read_dir(get_samples_dir()?)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    samples.retain(|path| path.extension().is_some_and(|ext| ext == "json"));
    samples.sort();
    Ok(samples)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_dirs() {
        assert!(super::get_testkit_src_dir().is_ok());
        assert!(super::get_sample_path("scan_full.json").is_ok());
        assert!(super::get_sample_path("no_such_sample.json").is_err());
    }

    #[test]
    fn test_samples_are_valid_json() {
        let samples = super::list_samples().unwrap();
        assert!(samples.len() >= 5);
        for path in samples {
            let text = std::fs::read_to_string(&path).unwrap();
            let value: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert!(value.is_object(), "{}", path.display());
        }
    }
}
