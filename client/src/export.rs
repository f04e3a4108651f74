use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlAnchorElement, HtmlCanvasElement, HtmlElement, Window};

pub const EXPORT_FILE_NAME: &str = "whiteboard.png";
const NOTIFICATION_MS: i32 = 3000;

/// Saves the current bitmap as a PNG. Read-only with respect to drawing state.
pub fn download_canvas(document: &Document, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let href = canvas.to_data_url()?;
    let link = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| JsValue::from_str("Invalid element type: a"))?;
    link.set_download(EXPORT_FILE_NAME);
    link.set_href(&href);
    link.click();
    Ok(())
}

pub fn show_notification(window: &Window, notification: &HtmlElement) {
    let _ = notification.class_list().remove_1("hidden");
    let notification = notification.clone();
    let hide = Closure::once_into_js(move || {
        let _ = notification.class_list().add_1("hidden");
    });
    if let Err(error) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        hide.unchecked_ref(),
        NOTIFICATION_MS,
    ) {
        log::warn!("Notification timer failed: {error:?}");
    }
}
