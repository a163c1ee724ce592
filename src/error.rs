use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures while binding the game to the host page.
#[derive(Error, Debug)]
pub enum DomError {
    #[error("no global window")]
    NoWindow,
    #[error("no document on window")]
    NoDocument,
    #[error("missing element #{0}")]
    MissingElement(&'static str),
    #[error("element #{id} is not a {expected}")]
    WrongElementType {
        id: &'static str,
        expected: &'static str,
    },
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        DomError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<DomError> for JsValue {
    fn from(err: DomError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_element() {
        assert_eq!(
            DomError::MissingElement("rotate-image").to_string(),
            "missing element #rotate-image"
        );
        assert_eq!(
            DomError::WrongElementType { id: "upgrade-button", expected: "button" }.to_string(),
            "element #upgrade-button is not a button"
        );
    }
}
