use arrow::array::{
    Array, ArrowPrimitiveType, Float32Array, Float64Array, Int16Array, Int64Array, ListArray,
    PrimitiveArray, StringArray,
};
use arrow::record_batch::RecordBatch;

use super::ReaderError;

fn get_column<'a, T: Array + 'static>(
    batch: &'a RecordBatch,
    name: &str,
    type_name: &str,
) -> Result<&'a T, ReaderError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| ReaderError::ColumnNotFound(name.to_string()))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ReaderError::InvalidFormat(format!("{} is not {}", name, type_name)))
}

/// Get a required Int64 column by name.
pub(super) fn get_int64_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a Int64Array, ReaderError> {
    get_column(batch, name, "Int64")
}

/// Get a required Int16 column by name.
pub(super) fn get_int16_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a Int16Array, ReaderError> {
    get_column(batch, name, "Int16")
}

/// Get a required Float32 column by name.
pub(super) fn get_float32_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a Float32Array, ReaderError> {
    get_column(batch, name, "Float32")
}

/// Get a required Float64 column by name.
pub(super) fn get_float64_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a Float64Array, ReaderError> {
    get_column(batch, name, "Float64")
}

/// Get a required String column by name.
pub(super) fn get_string_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a StringArray, ReaderError> {
    get_column(batch, name, "String")
}

/// Get a required List column by name.
pub(super) fn get_list_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a ListArray, ReaderError> {
    get_column(batch, name, "List")
}

/// Extract the values of one list entry.
pub(super) fn extract_list<T: ArrowPrimitiveType>(
    list_array: &ListArray,
    idx: usize,
) -> Result<Vec<T::Native>, ReaderError> {
    if list_array.is_null(idx) {
        return Ok(Vec::new());
    }
    let values = list_array.value(idx);
    let values = values
        .as_any()
        .downcast_ref::<PrimitiveArray<T>>()
        .ok_or_else(|| {
            ReaderError::InvalidFormat(format!(
                "list items are {}, expected {}",
                values.data_type(),
                T::DATA_TYPE
            ))
        })?;
    Ok(values.values().to_vec())
}
