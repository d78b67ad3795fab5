//! Web-specific container implementation.
//!
//! Mounts fragments into the shadow root of a real DOM element and lets
//! JavaScript functions act as offset calculators.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, ShadowRoot, ShadowRootInit, ShadowRootMode};

use crate::animation::Offset;
use crate::error::{FunTextError, Result};
use crate::fun_text::Container;
use crate::nodes::{TextFragment, FRAGMENT_CLASS};

fn dom_error(context: &str, err: JsValue) -> FunTextError {
    FunTextError::Dom(format!("{context}: {err:?}"))
}

/// A DOM element used as a FunText shadow host.
#[derive(Clone, Debug)]
pub struct ElementContainer {
    element: HtmlElement,
    shadow: Option<ShadowRoot>,
}

impl ElementContainer {
    pub fn new(element: HtmlElement) -> Self {
        Self {
            element,
            shadow: None,
        }
    }

    /// Look up an element of the current document by id.
    pub fn by_id(id: &str) -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| FunTextError::Dom("No window available".into()))?;
        let document = window
            .document()
            .ok_or_else(|| FunTextError::Dom("No document available".into()))?;
        let element = document
            .get_element_by_id(id)
            .ok_or_else(|| FunTextError::Dom(format!("No element with id `{id}`")))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| FunTextError::Dom(format!("Element `{id}` is not an HtmlElement")))?;
        Ok(Self::new(element))
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    fn document(&self) -> Result<Document> {
        self.element
            .owner_document()
            .ok_or_else(|| FunTextError::Dom("Element has no owner document".into()))
    }

    fn shadow(&self) -> Result<&ShadowRoot> {
        self.shadow
            .as_ref()
            .ok_or_else(|| FunTextError::Dom("Shadow root not attached".into()))
    }

    fn append_slot(&self, shadow: &ShadowRoot) -> Result<()> {
        let slot = self
            .document()?
            .create_element("slot")
            .map_err(|e| dom_error("Failed to create slot", e))?;
        shadow
            .append_child(&slot)
            .map_err(|e| dom_error("Failed to append slot", e))?;
        Ok(())
    }
}

impl Container for ElementContainer {
    fn text(&self) -> String {
        self.element.inner_text()
    }

    fn attach_shadow(&mut self) -> Result<()> {
        let shadow = match self.element.shadow_root() {
            Some(shadow) => {
                let in_use = shadow
                    .query_selector("style")
                    .map_err(|e| dom_error("Failed to query shadow root", e))?
                    .is_some();
                if in_use {
                    return Err(FunTextError::ContainerInUse);
                }
                shadow
            }
            None => self
                .element
                .attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))
                .map_err(|e| FunTextError::AttachShadow(format!("{e:?}")))?,
        };

        shadow.set_inner_html("");
        self.append_slot(&shadow)?;
        self.shadow = Some(shadow);
        Ok(())
    }

    fn show_fragments(&mut self, fragments: &[TextFragment], stylesheet: &str) -> Result<()> {
        let document = self.document()?;
        let shadow = self.shadow()?;
        shadow.set_inner_html("");

        for fragment in fragments {
            let node = document
                .create_element(fragment.kind.tag())
                .map_err(|e| dom_error("Failed to create fragment", e))?
                .dyn_into::<HtmlElement>()
                .map_err(|_| FunTextError::Dom("Failed to cast fragment to HtmlElement".into()))?;
            node.set_inner_text(&fragment.text);
            node.set_class_name(FRAGMENT_CLASS);
            for (name, value) in &fragment.variables {
                node.style()
                    .set_property(name, value)
                    .map_err(|e| dom_error("Failed to set offset variable", e))?;
            }
            shadow
                .append_child(&node)
                .map_err(|e| dom_error("Failed to append fragment", e))?;
        }

        let style = document
            .create_element("style")
            .map_err(|e| dom_error("Failed to create style", e))?;
        style.set_text_content(Some(stylesheet));
        shadow
            .append_child(&style)
            .map_err(|e| dom_error("Failed to append style", e))?;
        Ok(())
    }

    fn show_slot(&mut self) -> Result<()> {
        let shadow = self.shadow()?;
        shadow.set_inner_html("");
        self.append_slot(shadow)
    }
}

/// Use a JavaScript function `(index, count, consumed, textLen) => seconds`
/// as an offset calculator.
///
/// A throwing or non-numeric call yields an offset of 0.
pub fn js_offset(function: js_sys::Function) -> Offset {
    Offset::computed(move |input| {
        let args = js_sys::Array::new();
        args.push(&JsValue::from_f64(input.index as f64));
        args.push(&JsValue::from_f64(input.count as f64));
        args.push(&JsValue::from_f64(input.consumed as f64));
        args.push(&JsValue::from_f64(input.text_len as f64));

        match function.apply(&JsValue::NULL, &args) {
            Ok(value) => value.as_f64().unwrap_or(0.0),
            Err(err) => {
                tracing::error!("FunText: offset calculator threw: {:?}", err);
                0.0
            }
        }
    })
}
