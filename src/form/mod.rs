//! Form capture.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Document`] / [`FormElement`] | In-memory document with forms, controls and listeners |
//! | [`FormCapture`] | Listener that snapshots a form on submit (or any configured event) |
//! | [`FormSnapshot`] | Plain name → value(s) mapping produced by a capture |
//!
//! ```rust
//! use formfetch::form::{CaptureOptions, Control, Document, FormCapture, FormElement};
//!
//! let doc = Document::new();
//! doc.insert(FormElement::new("login").with_control(Control::input("user", "ada")));
//!
//! let capture = FormCapture::attach(&doc, "login", CaptureOptions::new()).unwrap();
//! doc.get_element_by_id("login").unwrap().submit();
//! assert_eq!(capture.get_data().unwrap().to_json(), serde_json::json!({"user": "ada"}));
//! ```

pub mod capture;
pub mod dom;
pub mod snapshot;

pub use capture::{CaptureCallback, CaptureOptions, FormCapture, CAPTURED_EVENT, DEFAULT_EVENT};
pub use dom::{Control, Document, DomEvent, FormElement, SelectOption};
pub use snapshot::{FieldValue, FormSnapshot};
