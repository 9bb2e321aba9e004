#![cfg(target_arch = "wasm32")]

use js_sys::{Object, Reflect};
use simple_reversi::buffer::BUFFER_LEN;
use simple_reversi::wasm::WasmSession;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

fn get(value: &JsValue, key: &str) -> JsValue {
    Reflect::get(value, &JsValue::from_str(key)).unwrap()
}

#[wasm_bindgen_test]
fn session_starts_with_defaults() {
    let mut session = WasmSession::new(JsValue::UNDEFINED).unwrap();

    assert_eq!(session.state_buffer().len(), BUFFER_LEN);
    assert!(session.is_running());
    assert!(session.take_log().iter().any(|line| line == "white phase"));
    assert!(session.status_text().ends_with("white phase"));
}

#[wasm_bindgen_test]
fn config_object_is_validated() {
    let config = Object::new();
    Reflect::set(&config, &"gridFraction".into(), &JsValue::from_f64(2.0)).unwrap();

    assert!(WasmSession::new(config.into()).is_err());
}

#[wasm_bindgen_test]
fn click_reports_the_move() {
    let config = Object::new();
    Reflect::set(&config, &"framesPerWave".into(), &JsValue::from_f64(0.0)).unwrap();
    let mut session = WasmSession::new(config.into()).unwrap();

    // center of cell (3, 2) with the default 480px layout
    let (x, y) = (52.8 + 3.5 * 46.8, 52.8 + 2.5 * 46.8);
    let result = session.frame(true, x, y).unwrap();

    assert_eq!(get(&result, "changed"), JsValue::TRUE);
    let report = get(&result, "report");
    assert_eq!(get(&report, "color"), JsValue::from_str("white"));

    let snapshot = session.snapshot().unwrap();
    assert_eq!(get(&snapshot, "white_count").as_f64(), Some(4.0));
    assert_eq!(get(&snapshot, "black_count").as_f64(), Some(1.0));
}
