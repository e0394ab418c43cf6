use rankconf::{
    ColumnInterval, ErrorKind, PartitionDecl, PartitionResolver, ResolvedConfig, UpperBound,
    load_rank_config,
};
use rankconf_testkit::{
    config_gen::{
        document_with, partitions_object, random_partitions, write_config, write_config_text,
    },
    dirs::get_sample_path,
};
use serde_json::json;

#[test]
fn test_load_rank_config_from_file() {
    let file = write_config(&document_with(json!({
        "query_column_ranges": [[[0, 5], 45]],
        "query_row_ranges": [[0, 2], [76, 77]],
    })))
    .unwrap();

    let view = load_rank_config(file.path(), 1).unwrap();
    assert_eq!(view.workspace(), "/tmp/rankconf/ws");
    assert_eq!(view.array_name(), "test_array");
    assert_eq!(
        view.column_intervals(),
        &[
            ColumnInterval::new(0, UpperBound::Inclusive(5)),
            ColumnInterval::new(45, UpperBound::Inclusive(45)),
        ]
    );
    assert_eq!(view.rows(), Some(&[76i64, 77][..]));

    let err = load_rank_config(file.path(), 2).unwrap_err();
    assert!(err.is_rank_error());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_rank_config(dir.path().join("missing.json"), 0).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Io { .. }));
}

#[test]
fn test_malformed_file_names_path() {
    let file = write_config_text("{ \"workspace\": \"/ws\", ").unwrap();
    let err = ResolvedConfig::from_file(file.path()).unwrap_err();
    match err.kind() {
        ErrorKind::MalformedDocument { context, .. } => {
            assert!(context.contains(&file.path().display().to_string()));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_sample_partitions() {
    let path = get_sample_path("column_partitions.json").unwrap();
    let config = ResolvedConfig::from_file(path).unwrap();
    let partitions = config.columns().partitions().unwrap();

    // Ranks follow declaration order: chr2, chr1, chr3.
    let rank0 = config.view_for_rank(0).unwrap();
    assert_eq!(
        rank0.column_intervals(),
        &[ColumnInterval::new(1_000_000, UpperBound::Inclusive(3_999_999))]
    );
    assert_eq!(rank0.array_name(), "variants_chr2");
    assert_eq!(rank0.workspace(), "/data/workspace");

    let rank1 = config.view_for_rank(1).unwrap();
    assert_eq!(
        rank1.column_intervals(),
        &[ColumnInterval::new(0, UpperBound::Inclusive(999_999))]
    );
    assert_eq!(rank1.array_name(), "variants");

    let rank2 = config.view_for_rank(2).unwrap();
    assert_eq!(
        rank2.column_intervals(),
        &[ColumnInterval::new(4_000_000, UpperBound::Inclusive(5_000_000))]
    );
    assert_eq!(rank2.workspace(), "/data/workspace_chr3");
    assert_eq!(rank2.rows(), Some(&[0i64, 1, 2, 3][..]));

    assert!(config.view_for_rank(3).unwrap_err().is_rank_error());
    assert_eq!(partitions.find_by_column(2_500_000).unwrap().key(), "chr2");
    assert!(partitions.find_by_column(6_000_000).is_none());

    assert_eq!(
        config
            .string_field("vcf_header_filename")
            .unwrap()
            .resolve("vcf_header_filename", 2)
            .unwrap(),
        "/data/h2.vcf"
    );
}

#[test]
fn test_sample_errors() {
    let path = get_sample_path("conflicting_selectors.json").unwrap();
    let err = ResolvedConfig::from_file(path).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::ConflictingSelectors { .. }));

    let path = get_sample_path("duplicate_partitions.json").unwrap();
    let err = ResolvedConfig::from_file(path).unwrap_err();
    match err.kind() {
        ErrorKind::DuplicatePartitionBoundary {
            begin,
            first_key,
            second_key,
        } => {
            assert_eq!(*begin, 100);
            assert_eq!(first_key, "0");
            assert_eq!(second_key, "2");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_random_partitions_do_not_overlap() {
    for seed in 0..200 {
        let generated = random_partitions(1 + (seed as usize % 12), seed);
        let config = ResolvedConfig::from_document(&document_with(json!({
            "column_partitions": partitions_object(&generated),
        })))
        .unwrap();
        let partitions = config.columns().partitions().unwrap();
        assert_eq!(partitions.len(), generated.len());

        let sorted = partitions.sorted_intervals();
        for pair in sorted.windows(2) {
            assert!(pair[0].end < UpperBound::Inclusive(pair[1].begin), "seed {seed}");
            assert!(UpperBound::Inclusive(pair[0].begin) <= pair[0].end, "seed {seed}");
        }

        for (rank, decl) in generated.iter().enumerate() {
            let resolved = partitions.get(rank).unwrap();
            let (begin, declared_end) = match decl.end {
                Some(end) if end < decl.begin => (end, UpperBound::Inclusive(decl.begin)),
                Some(end) => (decl.begin, UpperBound::Inclusive(end)),
                None => (decl.begin, UpperBound::Unbounded),
            };
            assert_eq!(resolved.begin(), begin, "seed {seed}");
            // Ends are only ever narrowed.
            assert!(resolved.end() <= declared_end, "seed {seed}");
            let view = config.view_for_rank(rank).unwrap();
            assert_eq!(view.column_intervals(), &[resolved.interval()]);
        }
    }
}

#[test]
fn test_duplicate_detection_any_order() {
    let decls = [
        PartitionDecl::new("a", 10),
        PartitionDecl::new("b", 20).with_end(30),
        PartitionDecl::new("c", 10).with_end(15),
    ];
    let orders: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    for order in orders {
        let mut resolver = PartitionResolver::new();
        for idx in order {
            resolver.push(decls[idx].clone());
        }
        let err = resolver.resolve().unwrap_err();
        assert!(
            matches!(err.kind(), ErrorKind::DuplicatePartitionBoundary { begin: 10, .. }),
            "{order:?}"
        );
    }
}
