// Browser smoke test; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn start_without_page_elements_names_the_missing_one() {
    let err = spin_stress::start_game().unwrap_err();
    let msg = err.as_string().unwrap_or_default();
    assert!(msg.contains("rotate-image"), "{msg}");
}
