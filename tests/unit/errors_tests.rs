/*!
 * Tests for user-facing error messages
 */

use std::path::PathBuf;
use subconv::SubtitleError;

/// Messages carry the file or cue they refer to
#[test]
fn test_subtitle_error_display_shouldMatchUserMessages() {
    let cases = [
        (
            SubtitleError::InvalidFormat { format: "SubRip", file: "a.srt".to_string() },
            "Invalid SubRip file: a.srt",
        ),
        (SubtitleError::MissingFile(PathBuf::from("in.srt")), "in.srt does not exist."),
        (SubtitleError::NotAFile(PathBuf::from("dir")), "dir is not a file."),
        (SubtitleError::UnknownFormat("x.bin".to_string()), "Unknown file type: x.bin"),
        (SubtitleError::UnknownOutputFormat("ass".to_string()), "Unknown output format: ass"),
        (
            SubtitleError::TemplateNotFound("news.xml".to_string()),
            "The template file \"news.xml\" could not be found.",
        ),
        (
            SubtitleError::InvalidTemplate("page.xml".to_string()),
            "The template file \"page.xml\" is not a valid TTAF1 file.",
        ),
        (
            SubtitleError::MalformedCueTiming { cue_id: "subtitle3".to_string(), attribute: "end" },
            "Invalid end value for cue subtitle3",
        ),
    ];

    for (error, message) in cases {
        assert_eq!(error.to_string(), message);
    }
}
