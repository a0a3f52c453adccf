//! Series line decoding.
//!
//! Splits one `attr_1:...:attr_n:v_1,...,v_m` line into its raw attribute
//! tokens and a numeric value sequence, validating the field count and
//! rejecting series whose values are all missing.

use crate::constants::{FIELD_SEPARATOR, MISSING_VALUE_TOKEN, VALUE_SEPARATOR};
use crate::error::{Result, TsfError};
use crate::models::{Observation, SeriesRecord};

/// Decode one series line against a schema of `attribute_count` attributes
pub fn decode_series_line(line_num: usize, line: &str, attribute_count: usize) -> Result<SeriesRecord> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    let expected = attribute_count + 1;
    if fields.len() != expected {
        return Err(TsfError::MissingAttributesOrValues {
            line: line_num,
            expected,
            found: fields.len(),
        });
    }

    let (attribute_fields, value_field) = fields.split_at(attribute_count);
    let value_field = value_field[0].trim();
    if value_field.is_empty() {
        return Err(TsfError::MissingAttributesOrValues {
            line: line_num,
            expected,
            found: attribute_count,
        });
    }

    let values = value_field
        .split(VALUE_SEPARATOR)
        .map(|token| parse_observation(line_num, token))
        .collect::<Result<Vec<_>>>()?;

    if values.iter().all(Option::is_none) {
        return Err(TsfError::AllValuesMissing { line: line_num });
    }

    Ok(SeriesRecord {
        line: line_num,
        attribute_values: attribute_fields.iter().map(|s| s.to_string()).collect(),
        values,
    })
}

fn parse_observation(line_num: usize, token: &str) -> Result<Observation> {
    let token = token.trim();
    if token == MISSING_VALUE_TOKEN {
        return Ok(None);
    }

    token
        .parse::<f64>()
        .map(Some)
        .map_err(|_| TsfError::InvalidAttributeValues {
            line: line_num,
            field: "series value".to_string(),
            value: token.to_string(),
        })
}
