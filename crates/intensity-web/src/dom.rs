use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn html_element(document: &web::Document, id: &str) -> Option<web::HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
}

pub fn set_text(document: &web::Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

/// Attach `handler` to every element matching `selector`; the handler gets
/// the clicked element.
pub fn add_click_listeners(
    document: &web::Document,
    selector: &str,
    handler: impl Fn(&web::Element) + Clone + 'static,
) {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return;
    };
    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<web::Element>().ok()) else {
            continue;
        };
        let target = el.clone();
        let handler = handler.clone();
        let closure = Closure::wrap(Box::new(move || handler(&target)) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
