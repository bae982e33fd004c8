/*!
 * Tests for the format providers through the public trait
 */

use subconv::registry::FormatKind;
use subconv::{ExportOptions, ParseOptions, SourceEncoding, SubtitleCue, SubtitleDocument, SubtitleError};
use crate::common;

fn parse(kind: FormatKind, contents: &[u8]) -> SubtitleDocument {
    kind.provider()
        .parse(contents, "sample", &ParseOptions::default())
        .expect("sample should parse")
}

/// Every sample parses to the same cues
#[test]
fn test_parse_withEachSample_shouldYieldSameCues() {
    let expected = common::sample_cues();
    for (kind, sample) in [
        (FormatKind::SubRip, common::SRT_SAMPLE),
        (FormatKind::WebVtt, common::VTT_SAMPLE),
        (FormatKind::Ttaf1, common::TTAF1_SAMPLE),
        (FormatKind::PlainText, common::TXT_SAMPLE),
    ] {
        let document = parse(kind, sample.as_bytes());
        common::assert_cues_match(&document.cues, &expected);
    }
}

/// Serialize then parse keeps timing within each format's precision
#[test]
fn test_serialize_thenParse_shouldPreserveCues() {
    let cues = vec![
        SubtitleCue::from_plain(0.0, 1.2, "Zero start"),
        SubtitleCue::from_plain(61.44, 65.0, "Fish & \"chips\""),
        SubtitleCue::from_plain(3600.8, 3601.96, "An hour in"),
    ];

    for kind in FormatKind::ALL {
        let mut document = SubtitleDocument::with_cues(kind, cues.clone());
        document.framerate = Some(25.0);

        let bytes = kind.provider().serialize(&document, &ExportOptions::default()).unwrap();
        let back = kind
            .provider()
            .parse(&bytes, "roundtrip", &ParseOptions::default().with_framerate(25.0))
            .unwrap();
        common::assert_cues_match(&back.cues, &cues);
    }
}

/// Multi-line cue text survives the line-oriented formats
#[test]
fn test_serialize_withLineBreaks_shouldKeepThemInTextFormats() {
    let cues = vec![SubtitleCue::from_plain(1.0, 2.0, "First line\nSecond line")];
    for kind in [FormatKind::SubRip, FormatKind::WebVtt, FormatKind::PlainText] {
        let mut document = SubtitleDocument::with_cues(kind, cues.clone());
        document.framerate = Some(25.0);
        let bytes = kind.provider().serialize(&document, &ExportOptions::default()).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("First line\nSecond line\n"), "{}", text);

        let back = kind.provider().parse(&bytes, "lines", &ParseOptions::default().with_framerate(25.0)).unwrap();
        assert_eq!(back.cues[0].text, "First line<br />Second line");
    }
}

/// TTAF1 keeps the break marker as escaped element text
#[test]
fn test_ttaf1_serialize_withLineBreaks_shouldKeepThemOnReimport() {
    let cues = vec![SubtitleCue::from_plain(1.0, 2.0, "First line\nSecond line")];
    let mut document = SubtitleDocument::with_cues(FormatKind::Ttaf1, cues);
    document.framerate = Some(25.0);

    let bytes = FormatKind::Ttaf1.provider().serialize(&document, &ExportOptions::default()).unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert!(text.contains(r#"end="50f">First line&lt;br /&gt;Second line</p>"#), "{}", text);

    let back = parse(FormatKind::Ttaf1, &bytes);
    assert_eq!(back.cues[0].text, "First line<br />Second line");
}

/// WebVTT output always carries the header and hour fields
#[test]
fn test_webvtt_serialize_shouldEmitHeaderAndHours() {
    let document = parse(FormatKind::WebVtt, common::VTT_SAMPLE.as_bytes());
    let out = FormatKind::WebVtt.provider().serialize(&document, &ExportOptions::default()).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("WEBVTT\n\n1\n00:00:01.000 --> 00:00:04.000\nThis is a test subtitle.\n\n"));
    assert!(text.contains("00:00:05.000 --> 00:00:09.000\nTom & Jerry\n"));
}

/// WebVTT with a header comment and no cue identifiers
#[test]
fn test_webvtt_parse_withHeaderTextAndShortClock_shouldRead() {
    let contents = "WEBVTT - converted\n\n01:02.500 --> 01:03.000\nHi\n";
    let document = parse(FormatKind::WebVtt, contents.as_bytes());
    assert_eq!(document.cues.len(), 1);
    assert!((document.cues[0].from - 62.5).abs() < 1e-9);
    assert!((document.cues[0].to - 63.0).abs() < 1e-9);
}

/// TTAF1 frame attributes at the declared frame rate
#[test]
fn test_ttaf1_parse_withFrameAttributes_shouldUseDeclaredRate() {
    let contents = common::TTAF1_SAMPLE.replace(r#"ttp:frameRate="25""#, r#"ttp:frameRate="50""#);
    let document = parse(FormatKind::Ttaf1, contents.as_bytes());

    assert_eq!(document.framerate, Some(50.0));
    assert!((document.cues[1].from - 2.5).abs() < 1e-9);
    assert!((document.cues[1].to - 4.5).abs() < 1e-9);
    let extras = document.extras.ttaf1().unwrap();
    assert_eq!(extras.title.as_deref(), Some("Sample"));
    assert_eq!(extras.copyright, None);
}

/// Latin-1 input is transcoded before parsing
#[test]
fn test_parse_withLatin1Input_shouldTranscode() {
    let contents = b"1\n00:00:01,000 --> 00:00:02,000\nCaf\xe9\n";
    let document = parse(FormatKind::SubRip, contents);
    assert_eq!(document.cues[0].text, "Caf\u{e9}");
}

/// A restricted candidate list surfaces an encoding error
#[test]
fn test_parse_withUnmatchedEncoding_shouldFail() {
    let contents = b"1\n00:00:01,000 --> 00:00:02,000\nCaf\xe9\n";
    let options = ParseOptions {
        framerate: None,
        encodings: vec![SourceEncoding::Ascii],
    };
    let err = FormatKind::SubRip.provider().parse(contents, "cafe.srt", &options).unwrap_err();
    assert!(matches!(err, SubtitleError::EncodingDetection { .. }));
    assert_eq!(err.to_string(), "Could not detect the character encoding of cafe.srt (tried: ascii)");
}

/// Every provider rejects foreign input with its own name and the file base name
#[test]
fn test_parse_withForeignInput_shouldReportInvalidFormat() {
    let expected = [
        (FormatKind::SubRip, "Invalid SubRip file: in.bin"),
        (FormatKind::WebVtt, "Invalid WebVTT file: in.bin"),
        (FormatKind::Ttaf1, "Invalid TTAF1 file: in.bin"),
        (FormatKind::PlainText, "Invalid plain text file: in.bin"),
    ];
    for (kind, message) in expected {
        let err = kind
            .provider()
            .parse(b"nothing to see", "/some/dir/in.bin", &ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, SubtitleError::InvalidFormat { .. }));
        assert_eq!(err.to_string(), message);
    }
}

/// A WebVTT header without any cue is still invalid
#[test]
fn test_webvtt_parse_withHeaderOnly_shouldFail() {
    let err = FormatKind::WebVtt
        .provider()
        .parse(b"WEBVTT\n\n", "empty.vtt", &ParseOptions::default())
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid WebVTT file: empty.vtt");
}

/// Frame-based formats fall back to 25 fps with a warning
#[test]
fn test_plain_text_withoutFramerate_shouldWarnOnImportAndExport() {
    let (document, logs) = common::capture_logs(|| parse(FormatKind::PlainText, b"1) 00:00:01:05 00:00:02:00\nHi\n"));
    assert!((document.cues[0].from - 1.2).abs() < 1e-9);
    assert!(logs.iter().any(|line| line == "WARN No framerate specified for import, assuming 25 FPS."));

    let (out, logs) = common::capture_logs(|| {
        FormatKind::PlainText
            .provider()
            .serialize(&SubtitleDocument::with_cues(FormatKind::PlainText, document.cues.clone()), &ExportOptions::default())
    });
    assert_eq!(String::from_utf8(out.unwrap()).unwrap(), "1) 00:00:01:05 00:00:02:00\nHi\n\n");
    assert!(logs.iter().any(|line| line == "WARN No framerate specified for export, assuming 25 FPS."));
}

/// Hours beyond 99 are written in full and read back
#[test]
fn test_subrip_withHundredsOfHours_shouldRoundTrip() {
    let cues = vec![SubtitleCue::from_plain(360_000.5, 360_001.0, "Late")];
    let document = SubtitleDocument::with_cues(FormatKind::SubRip, cues.clone());
    let out = FormatKind::SubRip.provider().serialize(&document, &ExportOptions::default()).unwrap();
    assert!(String::from_utf8(out.clone()).unwrap().contains("100:00:00,500 --> 100:00:01,000"));

    let back = parse(FormatKind::SubRip, &out);
    common::assert_cues_match(&back.cues, &cues);
}

/// Export with a byte-order mark, import strips it
#[test]
fn test_serialize_withBom_shouldPrefixUtf8Bom() {
    let document = SubtitleDocument::with_cues(FormatKind::SubRip, common::sample_cues());
    let out = FormatKind::SubRip
        .provider()
        .serialize(&document, &ExportOptions::default().with_bom(true))
        .unwrap();
    assert_eq!(&out[..3], &[0xEF_u8, 0xBB, 0xBF]);
    assert_eq!(&out[3..4], b"1");

    let back = parse(FormatKind::SubRip, &out);
    common::assert_cues_match(&back.cues, &common::sample_cues());
}
