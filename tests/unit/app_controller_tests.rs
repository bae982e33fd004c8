/*!
 * Tests for the conversion controller
 */

use anyhow::Result;
use subconv::app_config::Config;
use subconv::registry::FormatKind;
use subconv::{Controller, DocumentOverrides, SubtitleError};
use crate::common;

/// Loading detects the format before parsing
#[test]
fn test_load_withEachSample_shouldDetectKind() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test()?;

    for (name, sample, kind) in [
        ("a.srt", common::SRT_SAMPLE, FormatKind::SubRip),
        ("b.vtt", common::VTT_SAMPLE, FormatKind::WebVtt),
        ("c.xml", common::TTAF1_SAMPLE, FormatKind::Ttaf1),
        ("d.txt", common::TXT_SAMPLE, FormatKind::PlainText),
    ] {
        let path = common::create_test_file(temp_dir.path(), name, sample)?;
        let (detected, document) = controller.load(&path)?;
        assert_eq!(detected, kind);
        common::assert_cues_match(&document.cues, &common::sample_cues());
    }
    Ok(())
}

/// Extension does not influence detection
#[test]
fn test_load_withMisleadingExtension_shouldUseContents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "really_vtt.srt", common::VTT_SAMPLE)?;

    let (kind, _) = Controller::new_for_test()?.load(&path)?;
    assert_eq!(kind, FormatKind::WebVtt);
    Ok(())
}

/// Unrecognised contents name the file
#[test]
fn test_load_withUnknownContents_shouldReportUnknownFormat() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "readme.srt", "hello world")?;

    let err = Controller::new_for_test()?.load(&path).unwrap_err();
    assert!(matches!(err, SubtitleError::UnknownFormat(_)));
    assert_eq!(err.to_string(), "Unknown file type: readme.srt");
    Ok(())
}

/// Loading on its own still checks the input path
#[test]
fn test_load_withMissingOrDirectoryInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test()?;

    let err = controller.load(&temp_dir.path().join("missing.srt")).unwrap_err();
    assert!(matches!(err, SubtitleError::MissingFile(_)));

    let err = controller.load(temp_dir.path()).unwrap_err();
    assert!(matches!(err, SubtitleError::NotAFile(_)));
    Ok(())
}

/// The configured framerate applies to frame-based input
#[test]
fn test_load_withConfiguredFramerate_shouldUseIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "a.txt", "1) 00:00:01:15 00:00:02:00\nHi\n")?;

    let mut config = Config::default();
    config.framerate = Some(30.0);
    let (_, document) = Controller::with_config(config)?.load(&path)?;
    assert!((document.cues[0].from - 1.5).abs() < 1e-9);

    // Per-run overrides win over the configuration
    let overrides = DocumentOverrides {
        framerate: Some(50.0),
        ..DocumentOverrides::default()
    };
    let mut config = Config::default();
    config.framerate = Some(30.0);
    let (_, document) = Controller::with_config(config)?.with_overrides(overrides).load(&path)?;
    assert!((document.cues[0].from - 1.3).abs() < 1e-9);
    Ok(())
}

/// The controller exposes its configuration
#[test]
fn test_config_shouldReturnGivenConfiguration() -> Result<()> {
    let mut config = Config::default();
    config.output_format = "webvtt".to_string();
    let controller = Controller::with_config(config.clone())?;
    assert_eq!(controller.config(), &config);
    Ok(())
}
