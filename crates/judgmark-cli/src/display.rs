//! Two-column table rendering for extraction results.

use judgmark_ai::Extraction;
use judgmark_core::ExtractionResult;

const KEY_HEADER: &str = "Key";
const VALUE_HEADER: &str = "Value";

/// Render `result` as a `Key / Value` table, one row per field in order.
pub fn render_table(result: &ExtractionResult) -> String {
    if result.is_empty() {
        return "(no fields extracted)\n".to_string();
    }

    let key_width = result
        .iter()
        .map(|(k, _)| display_width(k))
        .chain(std::iter::once(display_width(KEY_HEADER)))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    push_row(&mut out, KEY_HEADER, VALUE_HEADER, key_width);
    push_row(&mut out, &"-".repeat(key_width), "-----", key_width);
    for (key, value) in result.iter() {
        push_row(&mut out, key, value, key_width);
    }
    out
}

/// One-line explanation of how an extraction ended.
pub fn describe(outcome: &Extraction) -> String {
    match outcome {
        Extraction::Skipped => "no judgment text; nothing to extract".to_string(),
        Extraction::Parsed { result, dropped } if dropped.is_empty() => {
            format!("extracted {} fields", result.len())
        }
        Extraction::Parsed { result, dropped } => format!(
            "extracted {} fields (ignored unknown: {})",
            result.len(),
            dropped.join(", ")
        ),
        Extraction::ParseFailed { error, .. } => {
            format!("model reply was not valid JSON ({error}); no fields extracted")
        }
        Extraction::TransportFailed(e) => format!("request failed ({e}); no fields extracted"),
    }
}

fn push_row(out: &mut String, key: &str, value: &str, key_width: usize) {
    out.push_str("  ");
    out.push_str(key);
    out.push_str(&" ".repeat(key_width - display_width(key) + 2));
    out.push_str(value);
    out.push('\n');
}

/// Terminal columns: CJK and other non-ASCII characters take two.
fn display_width(s: &str) -> usize {
    s.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
}
