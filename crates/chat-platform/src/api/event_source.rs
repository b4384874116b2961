//! Server-push completion channel over the browser `EventSource`.
//!
//! Every `message` event's `data` is forwarded verbatim into an unbounded
//! channel; the core decides what a payload means. Browser `EventSource`
//! cannot send headers, so the bearer token travels as a query parameter.

use futures::channel::mpsc;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventSource, MessageEvent, Url};

use chat_core::ports::{CompletionRequest, CompletionStream, StreamEvent};
use chat_types::{ChatError, Result, config::ClientConfig};

const COMPLETIONS_PATH: &str = "chat/completions";

/// Full URL of the completion channel for `req`, query string encoded.
pub fn completion_url(config: &ClientConfig, req: &CompletionRequest) -> Result<String> {
    let url = Url::new(&config.endpoint(COMPLETIONS_PATH))
        .map_err(|e| ChatError::Config(format!("bad completions URL: {:?}", e)))?;
    let params = url.search_params();
    for (key, value) in req.query_pairs() {
        params.append(key, &value);
    }
    if !config.access_token.is_empty() {
        params.append("access_token", &config.access_token);
    }
    Ok(url.href())
}

/// Open an `EventSource` on `url` and hand it over as a completion stream.
///
/// Closing the stream detaches both handlers and closes the connection;
/// the browser's automatic reconnect never gets a chance to run.
pub fn open(url: &str) -> Result<CompletionStream> {
    let source = EventSource::new(url)
        .map_err(|e| ChatError::Stream(format!("EventSource failed to open: {:?}", e)))?;

    let (tx, rx) = mpsc::unbounded();

    let data_tx = tx.clone();
    let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
        match event.data().as_string() {
            Some(payload) => {
                let _ = data_tx.unbounded_send(StreamEvent::Data(payload));
            }
            None => log::warn!("Dropping non-text server-push event"),
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let onerror = Closure::wrap(Box::new(move |_event: Event| {
        let _ = tx.unbounded_send(StreamEvent::Error(
            "server-push connection error".to_string(),
        ));
    }) as Box<dyn FnMut(Event)>);

    source.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    source.set_onerror(Some(onerror.as_ref().unchecked_ref()));

    let on_close = move || {
        source.set_onmessage(None);
        source.set_onerror(None);
        source.close();
        // handlers are detached, the closures can go
        drop(onmessage);
        drop(onerror);
    };

    Ok(CompletionStream::new(rx, on_close))
}
