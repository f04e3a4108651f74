use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Event, HtmlButtonElement, HtmlCanvasElement, HtmlElement, HtmlInputElement, HtmlSpanElement,
    MouseEvent, TouchEvent,
};

use relayboard_shared::{CaptureConfig, Point, Tool, Whiteboard};

use crate::dom::{
    client_to_canvas, get_element, parse_width, query_element, resize_canvas, set_tool_buttons,
    update_width_label, Cursor,
};
use crate::export::{download_canvas, show_notification};
use crate::net::debug_enabled;
use crate::render::CanvasSurface;
use crate::ws::{connect_ws, WsEvent};

type Board = Rc<RefCell<Whiteboard<CanvasSurface>>>;

fn mouse_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Point {
    client_to_canvas(canvas, event.client_x(), event.client_y())
}

fn first_touch_point(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<Point> {
    let touch = event.touches().get(0)?;
    Some(client_to_canvas(canvas, touch.client_x(), touch.client_y()))
}

fn sync_tool_ui(board: &Board, pencil: &HtmlElement, eraser: &HtmlElement, cursor: &Cursor) {
    let board = board.borrow();
    let tools = board.capture().tools();
    set_tool_buttons(pencil, eraser, tools.tool);
    cursor.style_for(tools.tool, tools.active_color());
    cursor.set_size(tools.width);
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let level = if debug_enabled(&window) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    let _ = console_log::init_with_level(level);

    let canvas: HtmlCanvasElement = query_element(&document, ".whiteboard")?;
    let toolbar: HtmlElement = query_element(&document, ".toolbar")?;
    let color_picker: HtmlInputElement = get_element(&document, "colorPicker")?;
    let line_width: HtmlInputElement = get_element(&document, "lineWidth")?;
    let line_width_value: HtmlSpanElement = get_element(&document, "lineWidthValue")?;
    let clear_button: HtmlButtonElement = get_element(&document, "clearCanvas")?;
    let download_button: HtmlButtonElement = get_element(&document, "downloadCanvas")?;
    let pencil_tool: HtmlElement = get_element(&document, "pencilTool")?;
    let eraser_tool: HtmlElement = get_element(&document, "eraserTool")?;
    let notification: HtmlElement = get_element(&document, "notification")?;
    let cursor = Rc::new(Cursor::new(get_element(&document, "cursor")?));

    let surface = CanvasSurface::new(canvas.clone())?;
    let board: Board = Rc::new(RefCell::new(Whiteboard::new(
        surface,
        &CaptureConfig::default(),
    )));
    {
        let mut board = board.borrow_mut();
        let picked = color_picker.value();
        if !picked.is_empty() {
            board.set_color(picked);
        }
        if let Some(width) = parse_width(&line_width.value()) {
            board.set_width(width);
        }
        resize_canvas(&window, &toolbar, &mut board);
    }
    sync_tool_ui(&board, &pencil_tool, &eraser_tool, &cursor);
    update_width_label(&line_width_value, board.borrow().capture().tools().width);

    let replay_board = board.clone();
    let sender = connect_ws(&window, move |event| match event {
        WsEvent::Open => log::info!("WS open"),
        WsEvent::Close => log::info!("WS closed"),
        WsEvent::Message(text) => {
            let _ = replay_board.borrow_mut().receive(&text);
        }
    })?;

    {
        let down_board = board.clone();
        let down_canvas = canvas.clone();
        let ondown = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let point = mouse_point(&down_canvas, &event);
            down_board.borrow_mut().pointer_down(point);
        });
        canvas.add_event_listener_with_callback("mousedown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let up_board = board.clone();
        let up_canvas = canvas.clone();
        let up_sender = sender.clone();
        let onup = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let point = mouse_point(&up_canvas, &event);
            up_board.borrow_mut().pointer_up(point, &*up_sender);
        });
        canvas.add_event_listener_with_callback("mouseup", onup.as_ref().unchecked_ref())?;
        canvas.add_event_listener_with_callback("mouseout", onup.as_ref().unchecked_ref())?;
        onup.forget();
    }

    {
        let move_board = board.clone();
        let move_canvas = canvas.clone();
        let move_sender = sender.clone();
        let move_cursor = cursor.clone();
        let onmove = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            move_cursor.move_to(event.client_x(), event.client_y());
            let point = mouse_point(&move_canvas, &event);
            move_board
                .borrow_mut()
                .pointer_move(point, js_sys::Date::now(), &*move_sender);
        });
        canvas.add_event_listener_with_callback("mousemove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let enter_cursor = cursor.clone();
        let onenter = Closure::<dyn FnMut(Event)>::new(move |_| enter_cursor.show());
        canvas.add_event_listener_with_callback("mouseenter", onenter.as_ref().unchecked_ref())?;
        onenter.forget();

        let leave_cursor = cursor.clone();
        let onleave = Closure::<dyn FnMut(Event)>::new(move |_| leave_cursor.hide());
        canvas.add_event_listener_with_callback("mouseleave", onleave.as_ref().unchecked_ref())?;
        onleave.forget();
    }

    {
        let start_board = board.clone();
        let start_canvas = canvas.clone();
        let ontouchstart = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
            event.prevent_default();
            if let Some(point) = first_touch_point(&start_canvas, &event) {
                start_board.borrow_mut().touch_start(point);
            }
        });
        canvas.add_event_listener_with_callback(
            "touchstart",
            ontouchstart.as_ref().unchecked_ref(),
        )?;
        ontouchstart.forget();
    }

    {
        let touch_board = board.clone();
        let touch_canvas = canvas.clone();
        let touch_sender = sender.clone();
        let ontouchmove = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
            event.prevent_default();
            if let Some(point) = first_touch_point(&touch_canvas, &event) {
                touch_board
                    .borrow_mut()
                    .touch_move(point, js_sys::Date::now(), &*touch_sender);
            }
        });
        canvas
            .add_event_listener_with_callback("touchmove", ontouchmove.as_ref().unchecked_ref())?;
        ontouchmove.forget();
    }

    {
        let end_board = board.clone();
        let end_sender = sender.clone();
        let ontouchend = Closure::<dyn FnMut(TouchEvent)>::new(move |event: TouchEvent| {
            event.prevent_default();
            end_board.borrow_mut().touch_end(&*end_sender);
        });
        canvas.add_event_listener_with_callback("touchend", ontouchend.as_ref().unchecked_ref())?;
        canvas
            .add_event_listener_with_callback("touchcancel", ontouchend.as_ref().unchecked_ref())?;
        ontouchend.forget();
    }

    {
        let color_board = board.clone();
        let color_input = color_picker.clone();
        let color_cursor = cursor.clone();
        let onchange = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut board = color_board.borrow_mut();
            board.set_color(color_input.value());
            let tools = board.capture().tools();
            color_cursor.style_for(tools.tool, tools.active_color());
        });
        color_picker.add_event_listener_with_callback("change", onchange.as_ref().unchecked_ref())?;
        onchange.forget();
    }

    {
        let width_board = board.clone();
        let width_input = line_width.clone();
        let width_cursor = cursor.clone();
        let oninput = Closure::<dyn FnMut(Event)>::new(move |_| {
            let Some(width) = parse_width(&width_input.value()) else {
                return;
            };
            width_board.borrow_mut().set_width(width);
            update_width_label(&line_width_value, width);
            width_cursor.set_size(width);
        });
        line_width.add_event_listener_with_callback("input", oninput.as_ref().unchecked_ref())?;
        oninput.forget();
    }

    for (button, tool) in [(&pencil_tool, Tool::Pencil), (&eraser_tool, Tool::Eraser)] {
        let tool_board = board.clone();
        let tool_cursor = cursor.clone();
        let pencil = pencil_tool.clone();
        let eraser = eraser_tool.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            tool_board.borrow_mut().set_tool(tool);
            sync_tool_ui(&tool_board, &pencil, &eraser, &tool_cursor);
        });
        button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let clear_board = board.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            clear_board.borrow_mut().clear();
        });
        clear_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let download_board = board.clone();
        let download_document = document.clone();
        let download_window = window.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let result = {
                let board = download_board.borrow();
                download_canvas(&download_document, board.surface().canvas())
            };
            match result {
                Ok(()) => show_notification(&download_window, &notification),
                Err(error) => log::error!("Export failed: {error:?}"),
            }
        });
        download_button
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let resize_board = board.clone();
        let resize_window = window.clone();
        let onresize = Closure::<dyn FnMut()>::new(move || {
            let mut board = resize_board.borrow_mut();
            resize_canvas(&resize_window, &toolbar, &mut board);
        });
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    Ok(())
}
