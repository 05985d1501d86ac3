use arrow::datatypes::{DataType, Schema};

use super::builders::list_item;
use super::{columns, peak_list_columns};

/// Checks that `schema` holds every `(name, type)` pair in `required`.
fn validate_columns(
    schema: &Schema,
    required: &[(&str, DataType)],
) -> Result<(), SchemaValidationError> {
    for (name, expected_type) in required {
        match schema.field_with_name(name) {
            Ok(field) => {
                if field.data_type() != expected_type {
                    return Err(SchemaValidationError::TypeMismatch {
                        column: name.to_string(),
                        expected: format!("{:?}", expected_type),
                        found: format!("{:?}", field.data_type()),
                    });
                }
            }
            Err(_) => {
                return Err(SchemaValidationError::MissingColumn(name.to_string()));
            }
        }
    }
    Ok(())
}

/// Validates that a schema can be read as a scan table.
pub fn validate_scan_schema(schema: &Schema) -> Result<(), SchemaValidationError> {
    validate_columns(
        schema,
        &[
            (columns::SCAN_NUMBER, DataType::Int64),
            (columns::MS_LEVEL, DataType::Int16),
            (columns::RETENTION_TIME, DataType::Float32),
            (columns::MZ, DataType::Float64),
            (columns::INTENSITY, DataType::Float32),
        ],
    )
}

/// Validates that a schema can be read as a peak list table.
///
/// List columns are compared on their item type only.
pub fn validate_peak_list_schema(schema: &Schema) -> Result<(), SchemaValidationError> {
    use peak_list_columns::*;

    validate_columns(
        schema,
        &[
            (ROW_ID, DataType::Int64),
            (RAW_FILE, DataType::Utf8),
            (MZ, DataType::Float64),
            (RT_APEX, DataType::Float32),
            (RT_START, DataType::Float32),
            (RT_END, DataType::Float32),
            (HEIGHT, DataType::Float32),
            (AREA, DataType::Float64),
            (SCAN_COUNT, DataType::Int32),
        ],
    )?;

    for (name, item_type) in [
        (SAMPLE_SCAN_NUMBERS, DataType::Int64),
        (SAMPLE_RETENTION_TIMES, DataType::Float32),
        (SAMPLE_MZ, DataType::Float64),
        (SAMPLE_INTENSITIES, DataType::Float32),
    ] {
        let field = schema
            .field_with_name(name)
            .map_err(|_| SchemaValidationError::MissingColumn(name.to_string()))?;
        match field.data_type() {
            DataType::List(item) if item.data_type() == &item_type => {}
            other => {
                return Err(SchemaValidationError::TypeMismatch {
                    column: name.to_string(),
                    expected: format!("{:?}", DataType::List(list_item(item_type))),
                    found: format!("{:?}", other),
                })
            }
        }
    }
    Ok(())
}

/// Errors that can occur during schema validation
#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    /// A required column is missing from the schema
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A column has an incorrect data type
    #[error("Type mismatch for column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Name of the column with the type mismatch
        column: String,
        /// Expected data type
        expected: String,
        /// Actual data type found
        found: String,
    },
}
