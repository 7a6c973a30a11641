use hex_highlighter::Harness;
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseResult};

const HIGHLIGHT_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/highlight_property_fuzz_test.txt";
const DEFAULT_HIGHLIGHT_PROPTEST_CASES: u32 = 256;

const FIELD_NAMES: &[&str] = &["magic", "size", "offset", "crc", "flags"];

const MAX_STRUCTS: usize = 4;
const MAX_FIELDS_PER_STRUCT: usize = 6;

fn highlight_proptest_cases() -> u32 {
    std::env::var("HEX_HIGHLIGHTER_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_HIGHLIGHT_PROPTEST_CASES)
}

/// A generated document: per struct instance, the field-name index of each
/// field slot. Field names repeat freely, both within and across structs.
#[derive(Clone, Debug)]
struct DocSpec {
    structs: Vec<Vec<usize>>,
}

impl DocSpec {
    fn render(&self) -> String {
        let mut html = String::from("<div class=\"hex-fields\"><div>\n");
        for (si, fields) in self.structs.iter().enumerate() {
            html.push_str(&format!(
                "<div class=\"hex-struct hex-struct-rec hex-struct-rec-{si}\">\n"
            ));
            for (ki, name_idx) in fields.iter().enumerate() {
                let name = FIELD_NAMES[*name_idx];
                html.push_str(&format!(
                    "<span class=\"hex-field hex-field-{name}\" id=\"f-{si}-{ki}\">00</span>\n"
                ));
            }
            html.push_str("</div>\n");
        }
        html.push_str("</div></div>\n");
        html
    }

    /// Field element ids expected to be highlighted after clicking slot
    /// `(si, ki)`: every slot in struct `si` sharing the clicked name.
    fn expected_set(&self, si: usize, ki: usize) -> Vec<(usize, usize)> {
        let clicked_name = self.structs[si][ki];
        self.structs[si]
            .iter()
            .enumerate()
            .filter(|(_, name_idx)| **name_idx == clicked_name)
            .map(|(slot, _)| (si, slot))
            .collect()
    }
}

fn doc_strategy() -> impl Strategy<Value = DocSpec> {
    vec(
        vec(0..FIELD_NAMES.len(), 1..MAX_FIELDS_PER_STRUCT),
        1..MAX_STRUCTS,
    )
    .prop_map(|structs| DocSpec { structs })
}

fn check<T>(result: hex_highlighter::Result<T>) -> Result<T, TestCaseError> {
    result.map_err(|err| TestCaseError::fail(err.to_string()))
}

/// Verifies the core invariant: the marker sits on exactly the expected
/// set and on nothing else.
fn assert_exact_highlight(h: &Harness, doc: &DocSpec, expected: &[(usize, usize)]) -> TestCaseResult {
    for (si, fields) in doc.structs.iter().enumerate() {
        for ki in 0..fields.len() {
            let selector = format!("#f-{si}-{ki}");
            if expected.contains(&(si, ki)) {
                check(h.assert_highlighted(&selector))?;
            } else {
                check(h.assert_not_highlighted(&selector))?;
            }
        }
    }
    prop_assert_eq!(h.highlighted_count(), expected.len());
    Ok(())
}

fn run_click_sequence(doc: &DocSpec, picks: &[(usize, usize)]) -> TestCaseResult {
    let html = doc.render();
    let mut h = check(Harness::from_html(&html))?;

    for (raw_si, raw_ki) in picks {
        let si = raw_si % doc.structs.len();
        let ki = raw_ki % doc.structs[si].len();

        check(h.click(&format!("#f-{si}-{ki}")))?;
        assert_exact_highlight(&h, doc, &doc.expected_set(si, ki))?;
    }
    Ok(())
}

fn run_double_clicks(doc: &DocSpec, picks: &[(usize, usize)]) -> TestCaseResult {
    let html = doc.render();
    let mut h = check(Harness::from_html(&html))?;

    for (raw_si, raw_ki) in picks {
        let si = raw_si % doc.structs.len();
        let ki = raw_ki % doc.structs[si].len();
        let selector = format!("#f-{si}-{ki}");

        check(h.click(&selector))?;
        let state_after_one = h.highlight_state().clone();
        let count_after_one = h.highlighted_count();

        check(h.click(&selector))?;
        prop_assert_eq!(h.highlight_state(), &state_after_one);
        prop_assert_eq!(h.highlighted_count(), count_after_one);
        assert_exact_highlight(&h, doc, &doc.expected_set(si, ki))?;
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: highlight_proptest_cases(),
        failure_persistence: Some(Box::new(FileFailurePersistence::Direct(
            HIGHLIGHT_PROPTEST_REGRESSION_FILE,
        ))),
        .. ProptestConfig::default()
    })]

    // Exclusivity, completeness, and clear-on-reclick in one walk: after
    // every click the marker set equals the clicked (struct, field) pair's
    // match set exactly, so any leftover from a previous click fails.
    #[test]
    fn marker_set_tracks_the_last_click_exactly(
        doc in doc_strategy(),
        picks in vec((0usize..MAX_STRUCTS, 0usize..MAX_FIELDS_PER_STRUCT), 1..8),
    ) {
        run_click_sequence(&doc, &picks)?;
    }

    // Idempotence: a second click on the same field changes nothing.
    #[test]
    fn reclicking_is_idempotent(
        doc in doc_strategy(),
        picks in vec((0usize..MAX_STRUCTS, 0usize..MAX_FIELDS_PER_STRUCT), 1..5),
    ) {
        run_double_clicks(&doc, &picks)?;
    }
}
