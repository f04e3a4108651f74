use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket, Window};

use relayboard_shared::{Relay, WireEvent};

use crate::net::websocket_url;

const RECONNECT_DELAY_MS: i32 = 1000;

#[derive(Debug)]
pub enum WsEvent {
    Open,
    Close,
    Message(String),
}

type EventHandler = Rc<RefCell<dyn FnMut(WsEvent)>>;

/// Outbound side of the relay. The socket is swapped out on every reconnect.
pub struct WsSender {
    socket: RefCell<Option<WebSocket>>,
    unloading: Cell<bool>,
}

impl WsSender {
    pub fn is_open(&self) -> bool {
        self.socket
            .borrow()
            .as_ref()
            .is_some_and(|socket| socket.ready_state() == WebSocket::OPEN)
    }
}

impl Relay for WsSender {
    /// Drops the event when the socket is not open. There is no resend.
    fn publish(&self, event: &WireEvent) {
        if !self.is_open() {
            return;
        }
        let payload = match event.to_json() {
            Ok(payload) => payload,
            Err(error) => {
                log::warn!("WS encode failed: {error}");
                return;
            }
        };
        if let Some(socket) = self.socket.borrow().as_ref() {
            if let Err(error) = socket.send_with_str(&payload) {
                log::warn!("WS send failed: {error:?}");
            }
        }
    }
}

pub fn connect_ws(
    window: &Window,
    on_event: impl 'static + FnMut(WsEvent),
) -> Result<Rc<WsSender>, JsValue> {
    let ws_url = websocket_url(window)?;
    let sender = Rc::new(WsSender {
        socket: RefCell::new(None),
        unloading: Cell::new(false),
    });
    let on_event: EventHandler = Rc::new(RefCell::new(on_event));
    open_socket(window, &ws_url, &sender, &on_event)?;

    {
        let sender = sender.clone();
        let onbeforeunload = Closure::<dyn FnMut(Event)>::new(move |_| {
            sender.unloading.set(true);
            if let Some(socket) = sender.socket.borrow().as_ref() {
                let _ = socket.close();
            }
        });
        window.add_event_listener_with_callback(
            "beforeunload",
            onbeforeunload.as_ref().unchecked_ref(),
        )?;
        onbeforeunload.forget();
    }

    Ok(sender)
}

fn open_socket(
    window: &Window,
    ws_url: &str,
    sender: &Rc<WsSender>,
    on_event: &EventHandler,
) -> Result<(), JsValue> {
    log::info!("WS connecting url={ws_url}");
    let socket = WebSocket::new(ws_url)?;

    {
        let on_event = on_event.clone();
        let onopen = Closure::<dyn FnMut(Event)>::new(move |_| {
            on_event.borrow_mut()(WsEvent::Open);
        });
        socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        onopen.forget();
    }

    {
        let on_event = on_event.clone();
        let onmessage = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            match event.data().as_string() {
                Some(text) => on_event.borrow_mut()(WsEvent::Message(text)),
                None => log::debug!("WS ignoring non-text frame"),
            }
        });
        socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        onmessage.forget();
    }

    {
        let socket_cb = socket.clone();
        let onerror = Closure::<dyn FnMut(Event)>::new(move |_| {
            log::warn!("WS error ready_state={}", socket_cb.ready_state());
        });
        socket.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();
    }

    {
        let window_cb = window.clone();
        let ws_url = ws_url.to_string();
        let sender_cb = sender.clone();
        let on_event = on_event.clone();
        let onclose = Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
            log::warn!(
                "WS close code={} was_clean={} reason={:?}",
                event.code(),
                event.was_clean(),
                event.reason()
            );
            on_event.borrow_mut()(WsEvent::Close);
            if sender_cb.unloading.get() {
                return;
            }
            schedule_reconnect(&window_cb, &ws_url, &sender_cb, &on_event);
        });
        socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));
        onclose.forget();
    }

    sender.socket.replace(Some(socket));
    Ok(())
}

fn schedule_reconnect(window: &Window, ws_url: &str, sender: &Rc<WsSender>, on_event: &EventHandler) {
    let window_cb = window.clone();
    let ws_url = ws_url.to_string();
    let sender = sender.clone();
    let on_event = on_event.clone();
    let reconnect = Closure::once_into_js(move || {
        if let Err(error) = open_socket(&window_cb, &ws_url, &sender, &on_event) {
            log::error!("WS reconnect failed: {error:?}");
            schedule_reconnect(&window_cb, &ws_url, &sender, &on_event);
        }
    });
    if let Err(error) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        reconnect.unchecked_ref(),
        RECONNECT_DELAY_MS,
    ) {
        log::error!("WS reconnect timer failed: {error:?}");
    }
}
