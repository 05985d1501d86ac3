use std::collections::HashMap;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaBuilder};

use super::columns;
use super::constants::{FORMAT_VERSION, KEY_FORMAT_VERSION};
use super::peak_list_columns;

/// Creates a Field with CV term metadata annotation
fn field_with_cv(name: &str, data_type: DataType, nullable: bool, cv_accession: &str) -> Field {
    let mut metadata = HashMap::new();
    metadata.insert("cv_accession".to_string(), cv_accession.to_string());
    Field::new(name, data_type, nullable).with_metadata(metadata)
}

/// Non-nullable list item field shared by every list column.
pub(crate) fn list_item(data_type: DataType) -> Arc<Field> {
    Arc::new(Field::new("item", data_type, false))
}

fn list_of(data_type: DataType) -> DataType {
    DataType::List(list_item(data_type))
}

fn with_version(builder: SchemaBuilder) -> Schema {
    let mut metadata = HashMap::new();
    metadata.insert(KEY_FORMAT_VERSION.to_string(), FORMAT_VERSION.to_string());
    builder.finish().with_metadata(metadata)
}

/// Creates the scan table schema.
///
/// "Long" layout: one row per observation, scan-level values repeated on
/// every row of the scan so that Parquet's RLE collapses them. A scan without
/// observations is kept as one row with null `mz` and `intensity`.
///
/// # Example
///
/// ```
/// use mzpick::schema::create_scan_schema;
///
/// let schema = create_scan_schema();
/// assert_eq!(schema.fields().len(), 5);
/// ```
pub fn create_scan_schema() -> Schema {
    let mut builder = SchemaBuilder::new();

    builder.push(field_with_cv(
        columns::SCAN_NUMBER,
        DataType::Int64,
        false,
        "MS:1000797", // peak list scans
    ));
    builder.push(field_with_cv(
        columns::MS_LEVEL,
        DataType::Int16,
        false,
        "MS:1000511", // ms level
    ));
    builder.push(field_with_cv(
        columns::RETENTION_TIME,
        DataType::Float32,
        false,
        "MS:1000016", // scan start time
    ));
    // Null on the single placeholder row of a scan without observations
    builder.push(field_with_cv(
        columns::MZ,
        DataType::Float64,
        true,
        "MS:1000040", // m/z
    ));
    builder.push(field_with_cv(
        columns::INTENSITY,
        DataType::Float32,
        true,
        "MS:1000042", // peak intensity
    ));

    with_version(builder)
}

/// Creates the scan table schema wrapped in an Arc.
pub fn create_scan_schema_arc() -> Arc<Schema> {
    Arc::new(create_scan_schema())
}

/// Creates the peak list table schema.
///
/// "Wide" layout: one row per peak with its samples stored as list columns.
/// Every column except `row_id` is nullable so that rows without peaks can be
/// stored.
pub fn create_peak_list_schema() -> Schema {
    use peak_list_columns::*;

    let mut builder = SchemaBuilder::new();
    builder.push(Field::new(ROW_ID, DataType::Int64, false));
    builder.push(Field::new(RAW_FILE, DataType::Utf8, true));
    builder.push(field_with_cv(MZ, DataType::Float64, true, "MS:1000040"));
    builder.push(Field::new(RT_APEX, DataType::Float32, true));
    builder.push(Field::new(RT_START, DataType::Float32, true));
    builder.push(Field::new(RT_END, DataType::Float32, true));
    builder.push(Field::new(HEIGHT, DataType::Float32, true));
    builder.push(Field::new(AREA, DataType::Float64, true));
    builder.push(Field::new(SCAN_COUNT, DataType::Int32, true));
    builder.push(Field::new(SAMPLE_SCAN_NUMBERS, list_of(DataType::Int64), true));
    builder.push(Field::new(SAMPLE_RETENTION_TIMES, list_of(DataType::Float32), true));
    builder.push(Field::new(SAMPLE_MZ, list_of(DataType::Float64), true));
    builder.push(Field::new(SAMPLE_INTENSITIES, list_of(DataType::Float32), true));

    with_version(builder)
}

/// Creates the peak list table schema wrapped in an Arc.
pub fn create_peak_list_schema_arc() -> Arc<Schema> {
    Arc::new(create_peak_list_schema())
}
