mod common;

use common::{
    a4_config, body_lines, contains, doc, scratch_path, section, small_config, truetype_config,
};
use docbrand_pdf::{
    Error, LayoutConfig, RenderError, convert_json_bytes_to_pdf, convert_json_to_pdf, render,
};

const ACME_JSON: &str = r###"{
    "brandName": "Acme",
    "sections": [
        {"sectionNumber": 1, "title": "Overview", "subtitle": "Intro", "content": "## Goals\n- Grow\n- Ship"}
    ]
}"###;

#[test]
fn renders_a_pdf_with_standard_fonts() {
    let bytes = convert_json_bytes_to_pdf(ACME_JSON.as_bytes(), &a4_config()).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(contains(&bytes, b"/Count 2"));
    assert!(contains(&bytes, b"/Helvetica-Bold"));
    assert!(contains(&bytes, b"/WinAnsiEncoding"));
    assert!(contains(&bytes, b"/FlateDecode"));
}

#[test]
fn document_info_carries_brand_and_date() {
    let bytes = convert_json_bytes_to_pdf(ACME_JSON.as_bytes(), &a4_config()).unwrap();
    assert!(contains(&bytes, b"(ACME)"));
    assert!(contains(&bytes, b"D:20240309"));
    assert!(contains(&bytes, b"docbrand-pdf"));
    assert!(contains(&bytes, b"/Info"));
}

#[test]
fn output_is_byte_identical_across_runs() {
    let d = doc(
        "Acme",
        vec![
            section(1, "One", "a", "**Lead** in\n\n- item"),
            section(2, "Two", "b", &body_lines(30)),
        ],
    );
    let config = small_config(300.0);
    assert_eq!(render(&d, &config).unwrap(), render(&d, &config).unwrap());
}

#[test]
fn page_count_follows_layout() {
    let d = doc("Acme", vec![section(1, "T", "S", &body_lines(8))]);
    let bytes = render(&d, &small_config(288.0)).unwrap();
    assert!(contains(&bytes, b"/Count 3"));
}

#[test]
fn empty_document_is_a_single_cover_page() {
    let bytes = convert_json_bytes_to_pdf(b"{}", &a4_config()).unwrap();
    assert!(contains(&bytes, b"/Count 1"));
}

#[test]
fn missing_section_fields_are_empty() {
    let json = br#"{"brandName": "Acme", "sections": [{"content": "just text"}]}"#;
    let bytes = convert_json_bytes_to_pdf(json, &a4_config()).unwrap();
    assert!(contains(&bytes, b"/Count 2"));
}

#[test]
fn unsupported_characters_fail_the_whole_document() {
    let d = doc("Acme", vec![section(1, "T", "S", "fine\n\u{65E5}\u{672C}\u{8A9E}")]);
    match render(&d, &a4_config()) {
        Err(Error::Render(RenderError::UnsupportedChar { ch, font })) => {
            assert_eq!(ch, '\u{65E5}');
            assert_eq!(font, "Helvetica");
        }
        other => panic!("expected UnsupportedChar, got {other:?}"),
    }
}

#[test]
fn unsupported_bold_title_names_the_bold_font() {
    let d = doc("Acme", vec![section(1, "\u{0416}", "S", "")]);
    match render(&d, &a4_config()) {
        Err(Error::Render(RenderError::UnsupportedChar { font, .. })) => {
            assert_eq!(font, "Helvetica-Bold");
        }
        other => panic!("expected UnsupportedChar, got {other:?}"),
    }
}

#[test]
fn invalid_geometry_is_rejected() {
    let config = LayoutConfig {
        margin: 400.0,
        ..a4_config()
    };
    assert!(matches!(
        render(&doc("Acme", Vec::new()), &config),
        Err(Error::InvalidGeometry(_))
    ));
}

#[test]
fn malformed_json_is_reported() {
    assert!(matches!(
        convert_json_bytes_to_pdf(b"{\"sections\": 3}", &a4_config()),
        Err(Error::Json(_))
    ));
}

#[test]
fn converts_file_to_file() {
    let input = scratch_path("acme.json");
    let output = scratch_path("acme.pdf");
    std::fs::write(&input, ACME_JSON).unwrap();

    convert_json_to_pdf(&input, &output, &a4_config()).unwrap();
    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}

#[test]
fn failed_conversion_writes_nothing() {
    let input = scratch_path("broken.json");
    let output = scratch_path("broken.pdf");
    let _ = std::fs::remove_file(&output);
    std::fs::write(&input, r#"{"brandName": "日本"}"#).unwrap();

    let result = convert_json_to_pdf(&input, &output, &a4_config());
    assert!(matches!(result, Err(Error::Render(_))));
    assert!(!output.exists());
}

#[test]
fn missing_input_is_an_io_error() {
    let input = scratch_path("does-not-exist.json");
    let output = scratch_path("never.pdf");
    assert!(matches!(
        convert_json_to_pdf(&input, &output, &a4_config()),
        Err(Error::Io(_))
    ));
}

#[test]
fn truetype_fonts_are_embedded_as_cid_fonts() {
    let d = doc(
        "\u{0416}\u{0451}\u{043B}\u{0442}\u{044B}\u{0439}",
        vec![section(
            1,
            "\u{041E}\u{0431}\u{0437}\u{043E}\u{0440}",
            "Intro",
            "- **\u{0440}\u{043E}\u{0441}\u{0442}** fast",
        )],
    );
    let config = truetype_config();
    let bytes = render(&d, &config).unwrap();
    assert!(contains(&bytes, b"/Type0"));
    assert!(contains(&bytes, b"/Identity-H"));
    assert!(contains(&bytes, b"/ToUnicode"));
    assert!(contains(&bytes, b"/FontFile2"));
    assert!(contains(&bytes, b"/DejaVuSansMono-Bold"));
    assert!(!contains(&bytes, b"/WinAnsiEncoding"));
    assert_eq!(bytes, render(&d, &config).unwrap());
}

#[test]
fn truetype_font_without_a_glyph_fails() {
    let d = doc("Acme", vec![section(1, "T", "S", "\u{65E5}")]);
    match render(&d, &truetype_config()) {
        Err(Error::Render(RenderError::UnsupportedChar { ch, font })) => {
            assert_eq!(ch, '\u{65E5}');
            assert_eq!(font, "DejaVuSansMono");
        }
        other => panic!("expected UnsupportedChar, got {other:?}"),
    }
}
