//! JavaScript bindings over matrix document text.

use wasm_bindgen::prelude::*;

use crate::{format::format, ops::Operation, parser::parse, SpcalcError};

// --- WASM Setup ---
// Initialize logging and panic hook for WASM
#[wasm_bindgen(start)]
pub fn wasm_init() {
    // Only run this initialization once.
    static START: std::sync::Once = std::sync::Once::new();
    START.call_once(|| {
        // Use `wasm_logger` for Rust logs -> console.log
        wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
        // Redirect panics to console.error
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        log::info!("spcalc WASM module initialized.");
    });
}

fn apply_text(op: Operation, first: &str, second: &str) -> Result<String, SpcalcError> {
    let a = parse(first)?.matrix;
    let b = parse(second)?.matrix;
    Ok(format(&op.apply(&a, &b)))
}

#[wasm_bindgen]
pub fn add_text(first: &str, second: &str) -> Result<String, JsValue> {
    Ok(apply_text(Operation::Add, first, second)?)
}

#[wasm_bindgen]
pub fn subtract_text(first: &str, second: &str) -> Result<String, JsValue> {
    Ok(apply_text(Operation::Subtract, first, second)?)
}

#[wasm_bindgen]
pub fn multiply_text(first: &str, second: &str) -> Result<String, JsValue> {
    Ok(apply_text(Operation::Multiply, first, second)?)
}

fn normalize(text: &str) -> Result<String, SpcalcError> {
    Ok(format(&parse(text)?.matrix))
}

/// Parses a document and formats its entries, dropping skipped lines.
#[wasm_bindgen]
pub fn normalize_text(text: &str) -> Result<String, JsValue> {
    Ok(normalize(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_text_multiply() {
        let product = apply_text(
            Operation::Multiply,
            "rows=1\ncols=2\n0 1 2\n",
            "rows=2\ncols=1\n1 0 3\n",
        )
        .unwrap();
        assert_eq!(product, "0 0 6\n");
    }

    #[test]
    fn test_apply_text_add_and_subtract() {
        let a = "rows=2\ncols=2\n0 0 5\n1 1 3\n";
        let b = "rows=2\ncols=2\n0 0 5\n1 1 -3\n";
        assert_eq!(apply_text(Operation::Add, a, b).unwrap(), "0 0 10\n1 1 0\n");
        assert_eq!(apply_text(Operation::Subtract, a, b).unwrap(), "0 0 0\n1 1 6\n");
    }

    #[test]
    fn test_apply_text_bad_header() {
        let result = apply_text(Operation::Add, "rows=two\ncols=2\n", "rows=1\ncols=1\n");
        assert!(matches!(result, Err(SpcalcError::Content(_))));
    }

    #[test]
    fn test_normalize_drops_skipped_lines() {
        let text = "rows=2\ncols=2\n1 1 4\nabc\n(0, 0) = 7\n";
        assert_eq!(normalize(text).unwrap(), "0 0 7\n1 1 4\n");
        assert!(matches!(normalize("cols=2\n"), Err(SpcalcError::Content(_))));
    }
}
