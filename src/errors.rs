/*!
 * Error types for the subconv library.
 *
 * Every error carries enough context (file name, cue identifier) to be shown
 * to a user verbatim, using the thiserror crate for ergonomic definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while detecting, parsing or serializing subtitles
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Detection or structural parse failure
    #[error("Invalid {format} file: {file}")]
    InvalidFormat {
        /// Human readable format name, e.g. "SubRip"
        format: &'static str,
        /// Base name of the offending file
        file: String,
    },

    /// The input path does not exist
    #[error("{} does not exist.", .0.display())]
    MissingFile(PathBuf),

    /// The input path exists but is not a regular file
    #[error("{} is not a file.", .0.display())]
    NotAFile(PathBuf),

    /// No provider recognised the input
    #[error("Unknown file type: {0}")]
    UnknownFormat(String),

    /// The requested output format id is not registered
    #[error("Unknown output format: {0}")]
    UnknownOutputFormat(String),

    /// TTAF1 template could not be resolved to an existing file
    #[error("The template file \"{0}\" could not be found.")]
    TemplateNotFound(String),

    /// TTAF1 template exists but fails TTAF1 detection
    #[error("The template file \"{0}\" is not a valid TTAF1 file.")]
    InvalidTemplate(String),

    /// A TTAF1 `begin`/`end` attribute is not a frame count
    #[error("Invalid {attribute} value for cue {cue_id}")]
    MalformedCueTiming {
        /// `xml:id` of the cue, empty when absent
        cue_id: String,
        /// Attribute name, `begin` or `end`
        attribute: &'static str,
    },

    /// None of the candidate encodings matched the input bytes
    #[error("Could not detect the character encoding of {file} (tried: {tried})")]
    EncodingDetection {
        /// Base name of the offending file
        file: String,
        /// Candidate encodings, comma separated
        tried: String,
    },

    /// The output could not be persisted
    #[error("Could not write file {}: {reason}", .path.display())]
    WriteFailure {
        /// Output path
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },

    /// Malformed XML while reading or writing TTAF1
    #[error("XML error: {0}")]
    Xml(String),

    /// Any other I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the library
pub type SubtitleResult<T> = Result<T, SubtitleError>;
