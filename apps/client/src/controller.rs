//! DOM wiring of the row lifecycle.
//!
//! Listeners are delegated to the table element so rows added later are
//! handled without rebinding. Every handler runs to completion inside one
//! browser event.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use attachment_forms_common::markup::{
    ADD_BUTTON, ARCHIVED, DELETE_BUTTON, EDIT_TABLE_SELECTOR, FILE_NAME, FILE_SIZE, FILE_STATUS,
    NEW_ROW, PRIOR_STATUS, ROW_INDEX, TEMPLATE_ROWS, VALIDATION_ROW, VALMSG_FOR,
};
use attachment_forms_common::naming::retarget;
use attachment_forms_common::{AttachmentStatus, format_size};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, FormData, HtmlFormElement, HtmlInputElement};

// web-sys has no `FormDataEvent` binding; declare the browser type here.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(extends = Event, js_name = FormDataEvent, typescript_type = "FormDataEvent")]
    type FormDataEvent;

    #[wasm_bindgen(method, getter, js_name = formData)]
    fn form_data(this: &FormDataEvent) -> FormData;
}

use crate::lifecycle::{
    DeleteAction, IndexMinter, RowState, is_placeholder_name, live_indices, on_delete,
    posted_indices,
};

/// Attach a controller to every editable attachment table in `document`.
pub fn attach_all(document: &Document) -> Result<u32, JsValue> {
    let tables = document.query_selector_all(EDIT_TABLE_SELECTOR)?;
    for i in 0..tables.length() {
        if let Some(node) = tables.get(i) {
            attach(node.dyn_into::<Element>()?)?;
        }
    }
    Ok(tables.length())
}

/// Wire the row lifecycle onto one table and its enclosing form.
pub fn attach(table: Element) -> Result<(), JsValue> {
    let minter = Rc::new(RefCell::new(IndexMinter::new()));

    let click_table = table.clone();
    let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if let Err(e) = handle_click(&click_table, &event) {
            gloo_console::error!("Attachment row action failed:", e);
        }
    });
    table.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    let change_table = table.clone();
    let on_change = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if let Err(e) = handle_change(&change_table, &event, &minter) {
            gloo_console::error!("Adding attachment row failed:", e);
        }
    });
    table.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
    on_change.forget();

    if let Some(form) = table.closest("form")? {
        let form = form.dyn_into::<HtmlFormElement>()?;
        form.set_enctype("multipart/form-data");

        // Runs while the browser builds the submission, after every submit
        // listener, and leaves the page untouched.
        let formdata_table = table.clone();
        let on_formdata = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Ok(event) = event.dyn_into::<FormDataEvent>() else {
                return;
            };
            if let Err(e) = strip_placeholders(&formdata_table, &event.form_data()) {
                gloo_console::error!("Preparing attachment postback failed:", e);
            }
        });
        form.add_event_listener_with_callback("formdata", on_formdata.as_ref().unchecked_ref())?;
        on_formdata.forget();
    }

    Ok(())
}

fn handle_click(table: &Element, event: &Event) -> Result<(), JsValue> {
    let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return Ok(());
    };

    if let Some(button) = target.closest(&format!(".{}", DELETE_BUTTON))? {
        return toggle_delete(&button);
    }

    if target.closest(&format!(".{}", ADD_BUTTON))?.is_some()
        && let Some(picker) = footer_picker(table)?
    {
        picker.click();
    }
    Ok(())
}

fn handle_change(
    table: &Element,
    event: &Event,
    minter: &RefCell<IndexMinter>,
) -> Result<(), JsValue> {
    let Some(input) = event
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
    else {
        return Ok(());
    };
    if input.type_() != "file" || !is_placeholder_name(&input.name()) {
        return Ok(());
    }
    if input.closest("tfoot")?.is_none() {
        return Ok(());
    }
    add_row(table, &input, &mut minter.borrow_mut())
}

/// Clone the template row pair for the file picked in `picker`.
fn add_row(table: &Element, picker: &HtmlInputElement, minter: &mut IndexMinter) -> Result<(), JsValue> {
    let Some(file) = picker.files().and_then(|files| files.get(0)) else {
        return Ok(());
    };
    let (Some(template), Some(body)) = (
        table.query_selector(&format!("tbody.{}", TEMPLATE_ROWS))?,
        table.query_selector(&format!("tbody:not(.{})", TEMPLATE_ROWS))?,
    ) else {
        return Err(JsValue::from_str("attachment table has no template rows"));
    };

    let indexers = table.query_selector_all(&format!("input.{}", ROW_INDEX))?;
    let mut values = Vec::new();
    for i in 0..indexers.length() {
        if let Some(node) = indexers.get(i) {
            values.push(node.dyn_into::<HtmlInputElement>()?.value());
        }
    }
    let index = minter.mint(js_sys::Date::now() as u64, &live_indices(values.iter().map(String::as_str)));

    let rows = template.query_selector_all(":scope > tr")?;
    let mut clones = Vec::new();
    for i in 0..rows.length() {
        if let Some(row) = rows.get(i) {
            let clone = row.clone_node_with_deep(true)?.dyn_into::<Element>()?;
            retarget_row(&clone, index)?;
            clones.push(clone);
        }
    }
    let Some(row) = clones.first() else {
        return Err(JsValue::from_str("attachment template has no rows"));
    };

    if let Some(cell) = row.query_selector(&format!(".{}", FILE_NAME))? {
        cell.set_text_content(Some(&file.name()));
    }
    if let Some(cell) = row.query_selector(&format!(".{}", FILE_SIZE))? {
        cell.set_text_content(Some(&format_size(file.size() as u64)));
    }

    // The picked file travels with the row; the footer gets an empty picker.
    if let Some(slot) = picker.parent_element() {
        let fresh = picker.clone_node()?.dyn_into::<HtmlInputElement>()?;
        fresh.set_value("");
        slot.append_child(&fresh)?;
    }
    picker.set_name(&retarget(&picker.name(), index));
    if let Some(indexer) = row.query_selector(&format!("input.{}", ROW_INDEX))? {
        if let Some(indexer) = indexer.dyn_ref::<HtmlInputElement>() {
            indexer.set_value(&index.to_string());
        }
        if let Some(cell) = indexer.parent_element() {
            cell.append_child(picker)?;
        }
    }

    for clone in &clones {
        body.append_child(clone)?;
    }
    gloo_console::debug!(format!("Added attachment row {} for {}", index, file.name()));
    Ok(())
}

/// Rewrite every placeholder name and validation hook inside a cloned row.
fn retarget_row(row: &Element, index: u64) -> Result<(), JsValue> {
    for attribute in ["name", VALMSG_FOR] {
        let elements = row.query_selector_all(&format!("[{}]", attribute))?;
        for i in 0..elements.length() {
            if let Some(node) = elements.get(i) {
                let element = node.dyn_into::<Element>()?;
                if let Some(value) = element.get_attribute(attribute) {
                    element.set_attribute(attribute, &retarget(&value, index))?;
                }
            }
        }
    }
    Ok(())
}

fn toggle_delete(button: &Element) -> Result<(), JsValue> {
    let Some(row) = button.closest("tr")? else {
        return Ok(());
    };
    let status_input = row
        .query_selector(&format!("input.{}", FILE_STATUS))?
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok());
    let current = status_input
        .as_ref()
        .and_then(|input| AttachmentStatus::parse(&input.value()));
    let prior = row
        .get_attribute(PRIOR_STATUS)
        .and_then(|code| AttachmentStatus::parse(&code));

    let state = RowState::classify(row.class_list().contains(NEW_ROW), current);
    match on_delete(state, current, prior) {
        DeleteAction::Remove => {
            if let Some(validation) = row.next_element_sibling()
                && validation.class_list().contains(VALIDATION_ROW)
            {
                validation.remove();
            }
            row.remove();
        }
        DeleteAction::Archive { prior } => {
            row.class_list().add_1(ARCHIVED)?;
            row.set_attribute(PRIOR_STATUS, &prior.to_string())?;
            if let Some(input) = &status_input {
                input.set_value(&AttachmentStatus::Deleted.to_string());
            }
        }
        DeleteAction::Restore { status } => {
            row.class_list().remove_1(ARCHIVED)?;
            row.remove_attribute(PRIOR_STATUS)?;
            if let Some(input) = &status_input {
                input.set_value(&status.to_string());
            }
        }
    }
    Ok(())
}

fn footer_picker(table: &Element) -> Result<Option<HtmlInputElement>, JsValue> {
    Ok(table
        .query_selector("tfoot input[type=file]")?
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok()))
}

/// Keep placeholder-indexed fields out of the postback.
///
/// Edits only the submitted entry list: template controls and the footer
/// picker stay in the page for later adds.
fn strip_placeholders(table: &Element, data: &FormData) -> Result<(), JsValue> {
    let named = table.query_selector_all("[name]")?;
    let mut placeholder_names = BTreeSet::new();
    let mut indexers = BTreeSet::new();
    for i in 0..named.length() {
        if let Some(node) = named.get(i) {
            let element = node.dyn_into::<Element>()?;
            let Some(name) = element.get_attribute("name") else {
                continue;
            };
            if is_placeholder_name(&name) {
                placeholder_names.insert(name);
            } else if element.class_list().contains(ROW_INDEX) {
                indexers.insert(name);
            }
        }
    }

    for name in &placeholder_names {
        data.delete(name);
    }
    for name in &indexers {
        let posted: Vec<String> = data
            .get_all(name)
            .iter()
            .filter_map(|value| value.as_string())
            .collect();
        data.delete(name);
        for value in posted_indices(posted.iter().map(String::as_str)) {
            data.append_with_str(name, value)?;
        }
    }
    Ok(())
}
