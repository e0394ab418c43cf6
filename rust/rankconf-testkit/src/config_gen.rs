//! Configuration document generation for tests.

use std::collections::HashSet;
use std::io::{Seek, SeekFrom, Write};

use serde_json::{Map, Value, json};

/// Writes `document` to a new temporary file and returns it, positioned at the start.
pub fn write_config(document: &Value) -> anyhow::Result<tempfile::NamedTempFile> {
    write_config_text(&serde_json::to_string_pretty(document)?)
}

/// Writes raw (possibly malformed) document text to a new temporary file.
pub fn write_config_text(text: &str) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("rankconf-")
        .suffix(".json")
        .tempfile()?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    file.seek(SeekFrom::Start(0))?;
    Ok(file)
}

/// A minimal valid document around the given column selector members.
///
/// `selector` must be an object; its members are merged into a document that
/// already has `workspace`, `array` and `query_attributes`.
pub fn document_with(selector: Value) -> Value {
    let mut doc = json!({
        "workspace": "/tmp/rankconf/ws",
        "array": "test_array",
        "query_attributes": ["REF", "ALT", "GT"],
    });
    if let (Some(doc), Value::Object(members)) = (doc.as_object_mut(), selector) {
        doc.extend(members);
    }
    doc
}

/// One randomly generated partition declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedPartition {
    pub begin: i64,
    pub end: Option<i64>,
}

/// Generates `count` partition declarations in random declaration order. Roughly
/// half of them get an explicit `end`, which may be below `begin`, overlap later
/// partitions, or leave a gap.
///
/// Begins stay distinct after swapping an `end` that is below its `begin`.
pub fn random_partitions(count: usize, seed: u64) -> Vec<GeneratedPartition> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut begin = rng.i64(-1_000..1_000);
    let mut used_begins = HashSet::with_capacity(count);
    let mut partitions = Vec::with_capacity(count);
    for _ in 0..count {
        begin += rng.i64(1..500);
        let mut end = rng.bool().then(|| begin + rng.i64(-100..1_000));
        if let Some(e) = end {
            if e < begin && used_begins.contains(&e) {
                end = None;
            }
        }
        used_begins.insert(end.map_or(begin, |e| e.min(begin)));
        partitions.push(GeneratedPartition { begin, end });
    }
    rng.shuffle(&mut partitions);
    partitions
}

/// Builds a `column_partitions` object from generated partitions, keyed by
/// declaration index.
pub fn partitions_object(partitions: &[GeneratedPartition]) -> Value {
    let mut obj = Map::new();
    for (i, p) in partitions.iter().enumerate() {
        let mut decl = Map::new();
        decl.insert("begin".into(), p.begin.into());
        if let Some(end) = p.end {
            decl.insert("end".into(), end.into());
        }
        obj.insert(i.to_string(), Value::Object(decl));
    }
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_partitions_have_distinct_begins() {
        let partitions = random_partitions(50, 42);
        let mut begins: Vec<_> = partitions.iter().map(|p| p.begin).collect();
        begins.sort_unstable();
        begins.dedup();
        assert_eq!(begins.len(), 50);
        assert_eq!(random_partitions(50, 42), partitions);
    }

    #[test]
    fn test_document_with() {
        let doc = document_with(json!({ "scan_full": true }));
        assert_eq!(doc["workspace"], "/tmp/rankconf/ws");
        assert_eq!(doc["scan_full"], true);
    }

    #[test]
    fn test_write_config() {
        let doc = document_with(json!({
            "column_partitions": partitions_object(&random_partitions(3, 1)),
        }));
        let file = write_config(&doc).unwrap();
        let text = std::fs::read_to_string(file.path()).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);
    }
}
