//! End to end queries through the umbrella crate: OBJ on disk, JSON database
//! on disk, ranked matches out.

#![cfg(feature = "io")]

use shapefind::prelude::*;
use std::fs;

const DATABASE: &str = r#"{
    "entries": [
        { "id": "A", "inertia": [[0,0,0],[0,0,0],[0,0,0]], "average_distance": 1.0, "distance_variance": 0.0 },
        { "id": "B", "inertia": [[1,0,0],[0,1,0],[0,0,1]], "average_distance": 2.0, "distance_variance": 0.5 }
    ]
}"#;

/// Three points on the plane x = 1 and two faces repeating a corner,
/// so every face has zero area and the tensor stays zero.
const FLAT_QUERY: &str = "\
v 1 0 0
v 1 1 0
v 1 0 1
f 1 1 2
f 2 3 3
";

#[test]
fn test_open_and_search_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("descriptors.json");
    let mesh_path = dir.path().join("query.obj");
    fs::write(&db_path, DATABASE).unwrap();
    fs::write(&mesh_path, FLAT_QUERY).unwrap();

    let ctx = SearchContext::open(SearchConfig::default(), &db_path).unwrap();
    assert_eq!(ctx.database().len(), 2);

    let matches = ctx.search_file(&mesh_path).unwrap();
    let ids: Vec<_> = matches.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
    assert_eq!(matches[0].dissimilarity, 0.0);
    assert_eq!(matches[1].dissimilarity, 4.5);
}

#[test]
fn test_nan_vertex_in_query_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("descriptors.json");
    let mesh_path = dir.path().join("query.obj");
    fs::write(&db_path, DATABASE).unwrap();
    fs::write(&mesh_path, "v nan 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

    let ctx = SearchContext::open(SearchConfig::default(), &db_path).unwrap();
    let err = ctx.search_file(&mesh_path).unwrap_err();
    assert!(matches!(err, Error::MalformedMesh(_)));
}

#[test]
fn test_database_with_zero_axis_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("descriptors.json");
    fs::write(&db_path, r#"{ "axis": [0, 0, 0], "entries": [] }"#).unwrap();

    let err = SearchContext::open(SearchConfig::default(), &db_path).unwrap_err();
    assert!(matches!(err, Error::DatabaseUnavailable(_)));
}

#[test]
fn test_open_missing_database() {
    let dir = tempfile::tempdir().unwrap();
    let err = SearchContext::open(SearchConfig::default(), dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, Error::DatabaseUnavailable(_)));
}

#[test]
fn test_unsupported_query_format() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("descriptors.json");
    fs::write(&db_path, DATABASE).unwrap();
    let ctx = SearchContext::open(SearchConfig::default(), &db_path).unwrap();

    let err = ctx.search_file(dir.path().join("query.stl")).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
}

#[test]
fn test_shared_context_across_threads() {
    let db = parse_database(DATABASE).unwrap();
    let ctx = SearchContext::new(SearchConfig::default(), db);
    let query = Descriptor::new(shapefind::nalgebra::Matrix3::zeros(), 1.0, 0.0);

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let matches = ctx.search_descriptor(&query).unwrap();
                assert_eq!(matches[0].id, "A");
            });
        }
    });
}
