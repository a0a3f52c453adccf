//! Format constants for the TSF decoder
//!
//! Literal tokens of the TSF grammar, default names, and file patterns
//! used by the decoder and the batch processor.

// =============================================================================
// TSF Grammar Tokens
// =============================================================================

/// Prefix shared by every meta-data directive
pub const DIRECTIVE_PREFIX: char = '@';

/// Marker line separating the header from the series lines
pub const DATA_MARKER: &str = "@data";

/// Attribute declaration directive (`@attribute name type`)
pub const ATTRIBUTE_DIRECTIVE: &str = "@attribute";

/// Scalar meta-data directives
pub mod directives {
    pub const FREQUENCY: &str = "@frequency";
    pub const HORIZON: &str = "@horizon";
    pub const MISSING: &str = "@missing";
    pub const EQUAL_LENGTH: &str = "@equallength";
}

/// Comment prefix tolerated in the series section
pub const COMMENT_PREFIX: char = '#';

/// Separator between attribute fields and the value list on a series line
pub const FIELD_SEPARATOR: char = ':';

/// Separator between values within the value list
pub const VALUE_SEPARATOR: char = ',';

/// Token standing for a missing observation
pub const MISSING_VALUE_TOKEN: &str = "?";

// =============================================================================
// Timestamp Patterns
// =============================================================================

/// Start timestamp pattern; hyphens separate both date and time components
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// Date-only form accepted for day-or-coarser frequencies
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Output Defaults
// =============================================================================

/// Default name of the observation value column
pub const DEFAULT_VALUE_COLUMN: &str = "series_value";

/// File extension of TSF inputs
pub const TSF_EXTENSION: &str = "tsf";

/// File extension of converted outputs
pub const PARQUET_EXTENSION: &str = "parquet";
