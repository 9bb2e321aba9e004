use wasm_bindgen::prelude::*;

use crate::config::LayoutConfig;
use crate::session::{FrameInput, Session};

/// JavaScript handle to a game session. The host calls [`WasmSession::frame`]
/// from its frame callback and uploads [`WasmSession::state_buffer`]
/// whenever the result reports a change.
#[wasm_bindgen]
pub struct WasmSession {
    inner: Session,
}

#[wasm_bindgen]
impl WasmSession {
    /// `config` is a `LayoutConfig`-shaped object, or `undefined` for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmSession, JsError> {
        let config: LayoutConfig = if config.is_undefined() || config.is_null() {
            LayoutConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(Self {
            inner: Session::new(&config)?,
        })
    }

    /// Steps one frame and returns a `FrameResult` object.
    pub fn frame(&mut self, pressed: bool, x: f32, y: f32) -> Result<JsValue, JsError> {
        let now = self.inner.elapsed();
        let result = self.inner.frame(
            FrameInput {
                pressed,
                cursor: (x, y),
            },
            now,
        );
        Ok(serde_wasm_bindgen::to_value(&result)?)
    }

    #[wasm_bindgen(js_name = stateBuffer)]
    pub fn state_buffer(&self) -> Vec<u8> {
        self.inner.state_buffer()
    }

    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.snapshot())?)
    }

    /// Status lines produced since the last call.
    #[wasm_bindgen(js_name = takeLog)]
    pub fn take_log(&mut self) -> Vec<String> {
        self.inner.take_log()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    #[wasm_bindgen(js_name = statusText)]
    pub fn status_text(&self) -> String {
        self.inner.controller().status_lines().join("\n")
    }
}
