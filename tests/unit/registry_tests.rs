/*!
 * Tests for the format registry and auto-detection
 */

use anyhow::Result;
use subconv::registry::{FormatKind, detect_format, detect_provider_for_file, implementations};
use crate::common;

fn samples() -> [(FormatKind, &'static str); 4] {
    [
        (FormatKind::SubRip, common::SRT_SAMPLE),
        (FormatKind::WebVtt, common::VTT_SAMPLE),
        (FormatKind::Ttaf1, common::TTAF1_SAMPLE),
        (FormatKind::PlainText, common::TXT_SAMPLE),
    ]
}

/// Each sample is accepted by its own provider and by no other
#[test]
fn test_detect_withEachSample_shouldOnlyMatchOwnProvider() {
    for (owner, sample) in samples() {
        for kind in FormatKind::ALL {
            assert_eq!(
                kind.provider().detect(sample.as_bytes()),
                kind == owner,
                "{} provider on {} sample",
                kind.display_name(),
                owner.display_name()
            );
        }
        assert_eq!(detect_format(sample.as_bytes()), Some(owner));
    }
}

/// Empty and whitespace-only inputs are never recognised
#[test]
fn test_detect_withEmptyInput_shouldRejectEverywhere() {
    for contents in [&b""[..], b"\n\n", b"   ", b"\xEF\xBB\xBF"] {
        for kind in FormatKind::ALL {
            assert!(!kind.provider().detect(contents), "{} accepted {:?}", kind, contents);
        }
        assert_eq!(detect_format(contents), None);
    }
}

/// Byte-order marks and CRLF line endings do not affect detection
#[test]
fn test_detect_withBomAndCrlf_shouldStillMatch() {
    for (owner, sample) in samples() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(sample.replace('\n', "\r\n").as_bytes());
        assert_eq!(detect_format(&bytes), Some(owner));
    }
}

/// A file that satisfies two grammars resolves to the earlier format
#[test]
fn test_detect_withSubRipAndPlainTextBlocks_shouldPreferSubRip() {
    let contents = format!("{}\n{}", common::SRT_SAMPLE, common::TXT_SAMPLE);
    assert!(FormatKind::PlainText.provider().detect(contents.as_bytes()));
    assert_eq!(detect_format(contents.as_bytes()), Some(FormatKind::SubRip));
}

/// Identifiers and extensions are stable
#[test]
fn test_implementations_shouldListIdsInProbeOrder() {
    let listed = implementations();
    assert_eq!(
        listed,
        vec![
            ("srt", FormatKind::SubRip),
            ("webvtt", FormatKind::WebVtt),
            ("ttaf1", FormatKind::Ttaf1),
            ("txt", FormatKind::PlainText),
        ]
    );

    let extensions: Vec<&str> = FormatKind::ALL.iter().map(|kind| kind.extension()).collect();
    assert_eq!(extensions, vec!["srt", "vtt", "xml", "txt"]);
}

/// Unknown identifiers are rejected with a descriptive error
#[test]
fn test_from_str_withUnknownId_shouldFail() {
    let err = "sub".parse::<FormatKind>().unwrap_err();
    assert_eq!(err.to_string(), "Unknown output format: sub");
    assert_eq!(FormatKind::from_id(" TTAF1 "), Some(FormatKind::Ttaf1));
}

/// Detection from a file on disk
#[test]
fn test_detect_provider_for_file_shouldReadFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let vtt = common::create_test_file(temp_dir.path(), "a.vtt", common::VTT_SAMPLE)?;
    let junk = common::create_test_file(temp_dir.path(), "b.srt", "not a subtitle")?;

    assert_eq!(detect_provider_for_file(&vtt)?, Some(FormatKind::WebVtt));
    assert_eq!(detect_provider_for_file(&junk)?, None);
    assert!(detect_provider_for_file(&temp_dir.path().join("missing.srt")).is_err());
    Ok(())
}
