use hex_highlighter::{Harness, HighlightState};

// Markup shaped like the generator's real output: a `hex-fields` wrapper,
// spacer divs, per-struct title and size blocks, and field leaves whose
// visible content lives in inner label/size/contents spans.
const CARVED_PNG_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head><title>carved.png</title></head>
<body>
<div class="hex-fields"><div>
  <div class="spacer"></div>
  <div class="hex-struct hex-struct-png-header hex-struct-png-header-0">
    <h3 class="hex-struct-title">png_header</h3>
    <div class="hex-struct-sz">(8 bytes)</div>
    <div class="spacer"></div>
    <span class="hex-field hex-field-magic" id="hdr-magic">
      <span class="hex-label">magic</span>
      <span class="hex-sz">(8 bytes)</span>
      <span class="hex-contents">89 50 4e 47 0d 0a 1a 0a</span>
    </span>
  </div>
  <div class="spacer"></div>
  <div class="hex-struct hex-struct-chunk hex-struct-chunk-0">
    <h3 class="hex-struct-title">chunk</h3>
    <div class="hex-struct-sz">(25 bytes)</div>
    <div class="spacer"></div>
    <span class="hex-field hex-field-length" id="c0-length">
      <span class="hex-label">length</span>
      <span class="hex-sz">(4 bytes)</span>
      <span class="hex-contents">00 00 00 0d</span>
    </span>
    <div class="spacer"></div>
    <span class="hex-field hex-field-type" id="c0-type">
      <span class="hex-label">type</span>
      <span class="hex-sz">(4 bytes)</span>
      <span class="hex-contents">49 48 44 52</span>
    </span>
    <div class="spacer"></div>
    <span class="hex-field hex-field-crc" id="c0-crc">
      <span class="hex-label">crc</span>
      <span class="hex-sz">(4 bytes)</span>
      <span class="hex-contents">9a 76 82 70</span>
    </span>
  </div>
  <div class="spacer"></div>
  <div class="hex-struct hex-struct-chunk hex-struct-chunk-1">
    <h3 class="hex-struct-title">chunk</h3>
    <div class="hex-struct-sz">(16 bytes)</div>
    <div class="spacer"></div>
    <span class="hex-field hex-field-length" id="c1-length">
      <span class="hex-label">length</span>
      <span class="hex-sz">(4 bytes)</span>
      <span class="hex-contents">00 00 00 04</span>
    </span>
    <div class="spacer"></div>
    <span class="hex-field hex-field-crc" id="c1-crc">
      <span class="hex-label">crc</span>
      <span class="hex-sz">(4 bytes)</span>
      <span class="hex-contents">ae 42 60 82</span>
    </span>
  </div>
  <div class="spacer"></div>
</div></div>
<script src="hex.js"></script>
</body>
</html>
"#;

#[test]
fn scoped_highlight_on_a_generated_page() -> hex_highlighter::Result<()> {
    let mut h = Harness::from_html(CARVED_PNG_PAGE)?;
    h.click("#c0-length")?;

    h.assert_highlighted("#c0-length")?;
    h.assert_not_highlighted("#c1-length")?;
    h.assert_not_highlighted("#c0-type")?;
    h.assert_not_highlighted("#c0-crc")?;
    assert_eq!(h.highlighted_count(), 1);
    Ok(())
}

#[test]
fn two_instances_of_the_same_struct_kind_highlight_independently() -> hex_highlighter::Result<()> {
    let mut h = Harness::from_html(CARVED_PNG_PAGE)?;

    // The scoping token is the instance class (chunk-0 / chunk-1), not the
    // shared kind class, so the sibling chunk stays untouched.
    h.click("#c0-crc")?;
    h.assert_highlighted("#c0-crc")?;
    h.assert_not_highlighted("#c1-crc")?;

    h.click("#c1-crc")?;
    h.assert_highlighted("#c1-crc")?;
    h.assert_not_highlighted("#c0-crc")?;
    assert_eq!(h.highlighted_count(), 1);
    Ok(())
}

#[test]
fn clicking_the_contents_span_selects_the_field() -> hex_highlighter::Result<()> {
    let mut h = Harness::from_html(CARVED_PNG_PAGE)?;
    h.click(".hex-struct-png-header-0 .hex-contents")?;

    h.assert_highlighted("#hdr-magic")?;
    match h.highlight_state() {
        HighlightState::Highlighted(identity) => {
            assert_eq!(
                identity.selector(),
                ".hex-struct-png-header-0 .hex-field-magic"
            );
        }
        HighlightState::Idle => panic!("expected a highlighted state"),
    }
    Ok(())
}

#[test]
fn cross_struct_clear_spans_the_whole_document() -> hex_highlighter::Result<()> {
    let mut h = Harness::from_html(CARVED_PNG_PAGE)?;
    h.click("#hdr-magic")?;
    h.assert_highlighted("#hdr-magic")?;

    h.click("#c0-type")?;
    h.assert_not_highlighted("#hdr-magic")?;
    h.assert_highlighted("#c0-type")?;
    assert_eq!(h.highlighted_count(), 1);
    Ok(())
}

#[test]
fn field_unique_within_its_struct_highlights_alone() -> hex_highlighter::Result<()> {
    let mut h = Harness::from_html(CARVED_PNG_PAGE)?;
    h.click("#c0-type")?;

    h.assert_highlighted("#c0-type")?;
    assert_eq!(h.highlighted_count(), 1);
    Ok(())
}

#[test]
fn structs_appended_after_load_participate_fully() -> hex_highlighter::Result<()> {
    let mut h = Harness::from_html(CARVED_PNG_PAGE)?;
    h.append_html(
        ".hex-fields > div",
        r#"
        <div class="hex-struct hex-struct-chunk hex-struct-chunk-2">
          <span class="hex-field hex-field-length" id="c2-length">00 00 00 00</span>
          <span class="hex-field hex-field-length" id="c2-length-b">ff ff ff ff</span>
        </div>
        "#,
    )?;

    h.click("#c2-length")?;
    h.assert_highlighted("#c2-length")?;
    h.assert_highlighted("#c2-length-b")?;
    h.assert_not_highlighted("#c0-length")?;
    assert_eq!(h.highlighted_count(), 2);
    Ok(())
}

#[test]
fn struct_title_text_survives_parsing() -> hex_highlighter::Result<()> {
    let h = Harness::from_html(CARVED_PNG_PAGE)?;
    h.assert_text(".hex-struct-png-header-0 .hex-struct-title", "png_header")?;
    h.assert_text(".hex-struct-chunk-1 .hex-struct-sz", "(16 bytes)")?;
    Ok(())
}

#[test]
fn initial_state_is_idle_with_no_markers() -> hex_highlighter::Result<()> {
    let h = Harness::from_html(CARVED_PNG_PAGE)?;
    assert_eq!(h.highlight_state(), &HighlightState::Idle);
    assert_eq!(h.highlighted_count(), 0);
    Ok(())
}
