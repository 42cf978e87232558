use table_convert::ingestion::csv::load_csv_from_bytes;
use table_convert::processing::{
    deduplicate, fill_missing, project_columns, run_pipeline, summary, CleaningOptions, Stage,
};
use table_convert::types::{DataType, Table, Value};
use table_convert::ConvertError;

fn dupes() -> Table {
    let bytes = std::fs::read("tests/fixtures/people_dupes.csv").unwrap();
    load_csv_from_bytes(&bytes).unwrap()
}

#[test]
fn dedup_keeps_first_occurrences_in_order() {
    let t = dupes();
    let out = deduplicate(&t);

    assert_eq!(out.row_count(), 3);
    let ids: Vec<&Value> = out.column("id").unwrap().collect();
    assert_eq!(ids, vec![&Value::Int64(1), &Value::Int64(2), &Value::Int64(3)]);
    // Rows with missing cells compare equal when every other cell matches.
    assert_eq!(out.rows[1][2], Value::Null);
}

#[test]
fn dedup_is_idempotent() {
    let once = deduplicate(&dupes());
    assert_eq!(deduplicate(&once), once);
}

#[test]
fn fill_leaves_no_missing_cells_and_keeps_the_input() {
    let t = dupes();
    let before = t.clone();
    let out = fill_missing(&t, "0");

    assert_eq!(out.null_count(), 0);
    assert_eq!(out.row_count(), t.row_count());
    assert_eq!(t, before);
    // Text filled into a float column makes it mixed.
    assert_eq!(out.schema.fields[2].data_type, DataType::Mixed);
    assert_eq!(out.rows[1][2], Value::Utf8("0".to_string()));
}

#[test]
fn projection_orders_columns_as_requested() {
    let t = dupes();
    let out = project_columns(&t, &["score".to_string(), "id".to_string()]).unwrap();
    assert_eq!(out.column_names(), vec!["score", "id"]);
    assert_eq!(out.row_count(), t.row_count());
}

#[test]
fn projection_of_unknown_column_lists_what_exists() {
    let err = project_columns(&dupes(), &["nonexistent".to_string()]).unwrap_err();
    assert_eq!(
        err,
        ConvertError::UnknownColumn {
            column: "nonexistent".to_string(),
            available: vec!["id".to_string(), "name".to_string(), "score".to_string()],
        }
    );
}

#[test]
fn full_pipeline_runs_stages_in_fixed_order() {
    let t = dupes();
    let opts = CleaningOptions {
        remove_duplicates: true,
        fill_missing: Some("n/a".to_string()),
        keep_columns: vec!["name".to_string(), "id".to_string()],
        ..Default::default()
    };
    let out = run_pipeline(&t, &opts).unwrap();

    let order: Vec<Stage> = out.stages.iter().map(|s| s.stage).collect();
    assert_eq!(
        order,
        vec![Stage::Deduplicate, Stage::FillMissing, Stage::ProjectColumns]
    );
    assert!(out.stages.iter().all(|s| s.applied));
    assert_eq!(out.table.column_names(), vec!["name", "id"]);
    assert_eq!(out.table.row_count(), 3);
    assert_eq!(out.table.rows[2][0], Value::Utf8("n/a".to_string()));
}

#[test]
fn options_from_json_drive_the_pipeline() {
    let opts = CleaningOptions::from_json(r#"{"remove_duplicates": true}"#).unwrap();
    let out = run_pipeline(&dupes(), &opts).unwrap();
    assert!(out.applied(Stage::Deduplicate));
    assert!(!out.applied(Stage::FillMissing));
    assert_eq!(out.table.row_count(), 3);
}

#[test]
fn summary_keeps_numeric_columns_and_rows() {
    let t = deduplicate(&dupes());
    let numeric = summary::project(&t).unwrap();

    assert_eq!(numeric.table().column_names(), vec!["id", "score"]);
    assert_eq!(numeric.table().row_count(), t.row_count());

    let stats = numeric.stats();
    assert_eq!(stats[0].name, "id");
    assert_eq!(stats[0].count, 3);
    assert_eq!(stats[0].sum, Value::Int64(6));
    assert_eq!(stats[1].count, 2);
    assert_eq!(stats[1].max, Value::Float64(98.5));
}

#[test]
fn summary_of_text_only_table_is_none() {
    let t = Table::from_columns(vec![("name", vec!["a".into(), "b".into()])]).unwrap();
    assert!(summary::project(&t).is_none());
}
