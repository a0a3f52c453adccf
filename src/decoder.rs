//! TSF decoding entry points.
//!
//! Runs the header parser once, then decodes and materializes each series
//! line in file order, folding it into the table assembler. Any structural
//! violation aborts the decode.

use crate::assembler::TableAssembler;
use crate::config::DecodeOptions;
use crate::constants::COMMENT_PREFIX;
use crate::error::{Result, TsfError};
use crate::header::parse_header;
use crate::models::TsfDataset;
use crate::reader::LineReader;
use crate::series::decode_series_line;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;
use tracing::debug;

/// Decode a TSF stream into a long-format table
pub fn decode<R: BufRead>(source: R, options: &DecodeOptions) -> Result<TsfDataset> {
    let mut reader = LineReader::new(source);
    let header = parse_header(&mut reader)?;
    let mut assembler = TableAssembler::new(&header, &options.value_column)?;

    while let Some((line_num, line)) = reader.next_line()? {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            continue;
        }

        let record = decode_series_line(line_num, line, header.schema.len())?;
        assembler.push_series(record)?;
    }

    if assembler.series_count() == 0 {
        return Err(TsfError::MissingSeriesInformation);
    }

    debug!(
        "Decoded {} series ({} rows) from {} lines",
        assembler.series_count(),
        assembler.row_count(),
        reader.line_number()
    );

    assembler.finish(header, options)
}

/// Decode TSF content held in memory
pub fn decode_str(content: &str, options: &DecodeOptions) -> Result<TsfDataset> {
    decode(Cursor::new(content.as_bytes()), options)
}

/// Decode a TSF file; the file is closed on every exit path
pub fn decode_file(path: &Path, options: &DecodeOptions) -> Result<TsfDataset> {
    if !path.exists() {
        return Err(TsfError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path)?;
    debug!("Decoding {}", path.display());
    decode(BufReader::new(file), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::IndexRecommendation;
    use polars::prelude::{DataType, TimeUnit};

    const TOURISM_SAMPLE: &str = "\
# Monthly tourism sample
@relation tourism
@attribute series_name string
@attribute start_timestamp date
@frequency monthly
@horizon 2
@missing true
@equallength false

@data
T1:1979-01-01 00-00-00:10,20,?,40
T2:1990-11-01 00-00-00:1,2,3
";

    #[test]
    fn test_decode_sample() {
        let dataset = decode_str(TOURISM_SAMPLE, &DecodeOptions::default()).unwrap();

        assert_eq!(dataset.series_count, 2);
        assert_eq!(dataset.row_count(), 7);
        assert_eq!(dataset.metadata.frequency.as_deref(), Some("monthly"));
        assert_eq!(dataset.metadata.horizon, Some(2));
        assert_eq!(dataset.metadata.contains_missing, Some(true));
        assert_eq!(dataset.metadata.equal_length, Some(false));

        let names: Vec<&str> = dataset
            .frame
            .column("series_name")
            .unwrap()
            .str()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(names, vec!["T1", "T1", "T1", "T1", "T2", "T2", "T2"]);
    }

    #[test]
    fn test_into_parts() {
        let dataset = decode_str(TOURISM_SAMPLE, &DecodeOptions::default()).unwrap();
        let (table, frequency, horizon, missing, equal_length) = dataset.into_parts();
        assert_eq!(table.height(), 7);
        assert_eq!(frequency.as_deref(), Some("monthly"));
        assert_eq!(horizon, Some(2));
        assert_eq!(missing, Some(true));
        assert_eq!(equal_length, Some(false));
    }

    #[test]
    fn test_custom_value_column_and_key() {
        let options = DecodeOptions::default()
            .with_value_column("visitors")
            .with_key("series_name");
        let dataset = decode_str(TOURISM_SAMPLE, &options).unwrap();

        assert!(dataset.frame.column("visitors").is_ok());
        assert!(dataset.frame.column("series_value").is_err());
        assert_eq!(
            dataset.index,
            IndexRecommendation::Keyed {
                key: "series_name".into(),
                index: "start_timestamp".into()
            }
        );
    }

    #[test]
    fn test_comment_and_blank_lines_in_series_section() {
        let content = "@attribute series_name string\n@data\n\n# first\nT1:1,2\n\nT2:3\n";
        let dataset = decode_str(content, &DecodeOptions::default()).unwrap();
        assert_eq!(dataset.series_count, 2);
        assert_eq!(dataset.row_count(), 3);
    }

    #[test]
    fn test_crlf_input() {
        let content = "@attribute series_name string\r\n@data\r\nT1:1,2\r\n";
        let dataset = decode_str(content, &DecodeOptions::default()).unwrap();
        let values: Vec<f64> = dataset
            .frame
            .column("series_value")
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_missing_series_information() {
        let err = decode_str("@attribute a string\n@data\n", &DecodeOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingSeriesInformation);

        let err = decode_str("@attribute a string\n@data\n\n# nothing\n", &DecodeOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingSeriesInformation);
    }

    #[test]
    fn test_first_error_aborts_decode() {
        let content = "@attribute a string\n@data\nT1:1,2\nT2:?,?\nT3:x\n";
        let err = decode_str(content, &DecodeOptions::default()).unwrap_err();
        match err {
            TsfError::AllValuesMissing { line } => assert_eq!(line, 4),
            other => panic!("Expected AllValuesMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_structural_errors_precede_key_validation() {
        let content = "@attribute a string\n@data\nT1:1:2\n";
        let options = DecodeOptions::default().with_key("undeclared");
        let err = decode_str(content, &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingAttributesOrValues);
    }

    #[test]
    fn test_file_not_found() {
        let err = decode_file(Path::new("/nonexistent/dataset.tsf"), &DecodeOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
    }

    #[test]
    fn test_date_column_type() {
        let dataset = decode_str(TOURISM_SAMPLE, &DecodeOptions::default()).unwrap();
        assert_eq!(
            dataset.frame.column("start_timestamp").unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
    }
}
