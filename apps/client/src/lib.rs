//! Row controller for editable attachment tables.
//!
//! Build with `wasm-pack build apps/client --target web` and point
//! `ATTACHMENTS_CLIENT_DIR` at the generated `pkg` directory; the editor page
//! then loads the module and every `table.edit-table.file-attachments` on
//! the page gets add, delete and undelete behavior.

pub mod controller;
pub mod lifecycle;

use wasm_bindgen::prelude::*;

/// Module entry point.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document available"))?;

    let attached = controller::attach_all(&document)?;
    gloo_console::log!(format!("Attachment tables ready: {}", attached));
    Ok(())
}
