use std::fs;
use std::path::PathBuf;

use query_engine_sql::sql;
use query_engine_translation::translation;

/// Translate the golden file request against the shared schema and render the result.
pub fn test_translation(testname: &str) -> anyhow::Result<String> {
    tests_common::init_logging();
    let directory = PathBuf::from("tests/goldenfiles").join(testname);

    let request = fs::read_to_string(directory.join("request.sql"))?;
    let statement = sql::parse(&request)?;
    let schema = tests_common::fixtures::media_schema();

    let compiled = translation::query::translate(&schema, &statement)?;

    Ok(format!(
        "{}\n\nvariables: {}\ncolumns: {}\nshape: {}",
        compiled.query,
        serde_json::to_string(&compiled.variables)?,
        compiled.column_names().join(", "),
        compiled.shape
    ))
}
