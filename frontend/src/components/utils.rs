use gloo_file::File as GlooFile;
use gloo_storage::{ LocalStorage, Storage };
use gloo_timers::callback::Timeout;
use shared::i18n::STORAGE_KEY;
use shared::{ ContainerSize, Language };
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{ FileList, HtmlElement };
use yew::prelude::*;

// Debounce function to limit button events
pub fn debounce<F>(duration: i32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));
    let timeout_clone = Rc::clone(&timeout);

    Callback::from(move |_| {
        let mut timeout_ref = timeout_clone.borrow_mut();

        if let Some(old_timeout) = timeout_ref.take() {
            old_timeout.cancel();
        }

        let inner_callback = callback.clone();
        let new_timeout = Timeout::new(duration as u32, move || {
            inner_callback();
        });

        *timeout_ref = Some(new_timeout);
    })
}

pub fn extract_image_files(file_list: &FileList) -> Vec<GlooFile> {
    (0..file_list.length())
        .filter_map(|i| file_list.item(i))
        .filter(|file| file.type_().starts_with("image/"))
        .map(GlooFile::from)
        .collect()
}

pub fn trigger_file_input() {
    if
        let Some(input) = web_sys
            ::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("file-input"))
    {
        if let Ok(html_input) = input.dyn_into::<HtmlElement>() {
            html_input.click();
        }
    }
}

/// Displayed size of the element behind `node`, if it is mounted and laid out.
pub fn measure(node: &NodeRef) -> Option<ContainerSize> {
    let element = node.cast::<HtmlElement>()?;
    let size = ContainerSize::new(
        f64::from(element.client_width()),
        f64::from(element.client_height())
    );
    size.is_measured().then_some(size)
}

pub fn load_language() -> Language {
    let stored = LocalStorage::raw().get_item(STORAGE_KEY).ok().flatten();
    Language::from_code(stored.as_deref())
}

pub fn store_language(language: Language) {
    if LocalStorage::raw().set_item(STORAGE_KEY, language.code()).is_err() {
        log::warn!("Could not persist language preference");
    }
}

/// Mirrors the language on the root element so text direction flips for Arabic.
pub fn apply_language(language: Language) {
    if
        let Some(root) = web_sys
            ::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
    {
        let _ = root.set_attribute("lang", language.code());
        let _ = root.set_attribute("dir", language.dir());
    }
}
