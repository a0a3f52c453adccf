//! TSF header parsing and meta-data extraction.
//!
//! Consumes lines up to and including the `@data` marker, building the
//! ordered attribute schema and the scalar dataset meta-data
//! (frequency, horizon, missing flag, equal-length flag).

use crate::constants::{ATTRIBUTE_DIRECTIVE, DATA_MARKER, DIRECTIVE_PREFIX, directives};
use crate::error::{Result, TsfError};
use crate::models::{AttributeSchema, AttributeType, DatasetMetadata};
use crate::reader::LineReader;
use std::io::BufRead;
use tracing::{debug, trace};

/// Everything declared before `@data`
#[derive(Debug, Clone, PartialEq)]
pub struct TsfHeader {
    pub schema: AttributeSchema,
    pub metadata: DatasetMetadata,
    /// Line number of the `@data` marker
    pub data_marker_line: usize,
}

impl TsfHeader {
    /// Name of the first `date` attribute, the default index candidate
    pub fn default_index(&self) -> Option<&str> {
        self.schema.first_date_attribute().map(|a| a.name.as_str())
    }
}

/// Read header lines until `@data`, leaving the reader on the first series line
pub fn parse_header<R: BufRead>(reader: &mut LineReader<R>) -> Result<TsfHeader> {
    let mut builder = HeaderBuilder::new();

    while let Some((line_num, line)) = reader.next_line()? {
        let trimmed = line.trim();

        if trimmed == DATA_MARKER {
            let header = builder.build(line_num)?;
            debug!(
                "Parsed header: {} attributes, frequency={:?}, horizon={:?}, missing={:?}, equallength={:?}",
                header.schema.len(),
                header.metadata.frequency,
                header.metadata.horizon,
                header.metadata.contains_missing,
                header.metadata.equal_length
            );
            return Ok(header);
        }

        builder.parse_line(line_num, trimmed)?;
    }

    Err(TsfError::MissingDataSection)
}

/// Accumulates declarations line by line
struct HeaderBuilder {
    schema: AttributeSchema,
    metadata: DatasetMetadata,
}

impl HeaderBuilder {
    fn new() -> Self {
        Self {
            schema: AttributeSchema::new(),
            metadata: DatasetMetadata::default(),
        }
    }

    fn parse_line(&mut self, line_num: usize, line: &str) -> Result<()> {
        // Blank lines and comments carry no meta-data
        if !line.starts_with(DIRECTIVE_PREFIX) {
            return Ok(());
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let invalid_spec = || TsfError::InvalidMetadataSpecification {
            line: line_num,
            content: line.to_string(),
        };

        if tokens[0] == ATTRIBUTE_DIRECTIVE {
            let [_, name, type_name] = tokens[..] else {
                return Err(invalid_spec());
            };
            let attribute_type: AttributeType =
                type_name
                    .parse()
                    .map_err(|_| TsfError::InvalidAttributeType {
                        line: line_num,
                        name: name.to_string(),
                        attribute_type: type_name.to_string(),
                    })?;
            if !self.schema.push(name, attribute_type) {
                return Err(invalid_spec());
            }
            trace!("Declared attribute {} ({})", name, attribute_type);
            return Ok(());
        }

        let [directive, value] = tokens[..] else {
            return Err(invalid_spec());
        };

        match directive {
            directives::FREQUENCY => {
                set_once(&mut self.metadata.frequency, value.to_string())
                    .ok_or_else(invalid_spec)?;
            }
            directives::HORIZON => {
                let horizon = value
                    .parse::<u32>()
                    .map_err(|_| invalid_metadata(line_num, directive, value))?;
                set_once(&mut self.metadata.horizon, horizon).ok_or_else(invalid_spec)?;
            }
            directives::MISSING => {
                let flag = parse_bool(value)
                    .ok_or_else(|| invalid_metadata(line_num, directive, value))?;
                set_once(&mut self.metadata.contains_missing, flag).ok_or_else(invalid_spec)?;
            }
            directives::EQUAL_LENGTH => {
                let flag = parse_bool(value)
                    .ok_or_else(|| invalid_metadata(line_num, directive, value))?;
                set_once(&mut self.metadata.equal_length, flag).ok_or_else(invalid_spec)?;
            }
            _ => {
                // Unknown directives carry nothing we decode
                debug!("Ignoring unrecognised directive {} at line {}", directive, line_num);
            }
        }

        Ok(())
    }

    fn build(self, data_marker_line: usize) -> Result<TsfHeader> {
        if self.schema.is_empty() {
            return Err(TsfError::MissingAttributeSection);
        }

        Ok(TsfHeader {
            schema: self.schema,
            metadata: self.metadata,
            data_marker_line,
        })
    }
}

/// Store `value` if the slot is empty; `None` if it was already set
fn set_once<T>(slot: &mut Option<T>, value: T) -> Option<()> {
    if slot.is_some() {
        return None;
    }
    *slot = Some(value);
    Some(())
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn invalid_metadata(line: usize, directive: &str, value: &str) -> TsfError {
    TsfError::InvalidMetadata {
        line,
        directive: directive.to_string(),
        value: value.to_string(),
    }
}
