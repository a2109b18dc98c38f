use futures_channel::oneshot;
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use gloo::utils::document;
use magicpals_core::GenerationError;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement, HtmlImageElement};

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes(std::array::from_fn(|_| (256. * random()) as u8))
}

/// Resolves after `duration` on the browser timer queue.
pub(crate) async fn sleep(duration: Duration) {
    let (tx, rx) = oneshot::channel();
    let _timeout = Timeout::new(millis(duration), move || {
        let _ = tx.send(());
    });
    let _ = rx.await;
}

pub(crate) fn millis(duration: Duration) -> u32 {
    duration.as_millis().try_into().unwrap_or(u32::MAX)
}

/// Wraps a DOM exception so it can travel with collaborator errors.
pub(crate) fn js_error(err: JsValue) -> GenerationError {
    GenerationError::Request(format!("{:?}", err))
}

pub(crate) fn create_canvas(width: u32, height: u32) -> Result<HtmlCanvasElement, JsValue> {
    let canvas: HtmlCanvasElement = document()
        .create_element("canvas")?
        .dyn_into()
        .map_err(JsValue::from)?;
    canvas.set_width(width);
    canvas.set_height(height);
    Ok(canvas)
}

pub(crate) fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into()
        .map_err(JsValue::from)
}

/// Loads `src` into a detached image element, resolving once it has decoded.
pub(crate) async fn load_image(src: &str) -> Result<HtmlImageElement, JsValue> {
    let image = HtmlImageElement::new()?;
    let (tx, rx) = oneshot::channel::<bool>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let _load = {
        let tx = tx.clone();
        EventListener::once(&image, "load", move |_| {
            if let Some(tx) = tx.take() {
                let _ = tx.send(true);
            }
        })
    };
    let _error = EventListener::once(&image, "error", move |_| {
        if let Some(tx) = tx.take() {
            let _ = tx.send(false);
        }
    });

    image.set_src(src);
    match rx.await {
        Ok(true) => Ok(image),
        _ => Err(JsValue::from_str("image failed to load")),
    }
}

/// Saves `href` through a temporary download link.
pub(crate) fn download(href: &str, file_name: &str) -> Result<(), JsValue> {
    let anchor: HtmlAnchorElement = document()
        .create_element("a")?
        .dyn_into()
        .map_err(JsValue::from)?;
    anchor.set_href(href);
    anchor.set_download(file_name);
    anchor.click();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_saturates() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::from_secs(u64::MAX)), u32::MAX);
    }
}
