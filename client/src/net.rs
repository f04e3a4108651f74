use wasm_bindgen::JsValue;
use web_sys::Window;

pub fn websocket_url(window: &Window) -> Result<String, JsValue> {
    let location = window.location();
    let protocol = location.protocol()?;
    let host = location.host()?;
    let scheme = if protocol == "https:" { "wss" } else { "ws" };
    let board_id = board_id_from_location(&location);
    if let Some(board_id) = board_id {
        Ok(format!("{scheme}://{host}/ws/{board_id}"))
    } else {
        Ok(format!("{scheme}://{host}/ws"))
    }
}

fn board_id_from_location(location: &web_sys::Location) -> Option<String> {
    let path = location.pathname().ok()?;
    board_id_from_path(&path)
}

fn board_id_from_path(path: &str) -> Option<String> {
    let mut parts = path.trim_matches('/').split('/');
    if parts.next()? != "s" {
        return None;
    }
    let board_id = parts.next()?;
    if board_id.is_empty() {
        None
    } else {
        Some(board_id.to_string())
    }
}

pub fn debug_enabled(window: &Window) -> bool {
    let search = window.location().search().ok().unwrap_or_default();
    search.contains("debug=1") || search.contains("debug=true")
}
