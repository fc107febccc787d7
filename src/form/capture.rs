use super::dom::{Document, DomEvent, FormElement};
use super::snapshot::FormSnapshot;
use crate::{Error, Result};
use std::future::Future;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

pub const DEFAULT_EVENT: &str = "submit";
/// Custom event dispatched on the form after every capture; its detail is the snapshot.
pub const CAPTURED_EVENT: &str = "form:captured";

pub type CaptureCallback = Arc<dyn Fn(&FormSnapshot) + Send + Sync>;

/// Options for [`FormCapture::attach`].
#[derive(Clone)]
pub struct CaptureOptions {
    event_type: String,
    debug: bool,
    on_captured: Option<CaptureCallback>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            event_type: DEFAULT_EVENT.to_string(),
            debug: false,
            on_captured: None,
        }
    }
}

impl CaptureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture on this event instead of `submit`.
    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    /// Log each snapshot before notifying anyone.
    pub fn debug(mut self, enable: bool) -> Self {
        self.debug = enable;
        self
    }

    /// Synchronous callback, run before the `form:captured` event.
    pub fn on_captured<F>(mut self, callback: F) -> Self
    where
        F: Fn(&FormSnapshot) + Send + Sync + 'static,
    {
        self.on_captured = Some(Arc::new(callback));
        self
    }

    /// Async callback. Inside a tokio runtime each capture spawns it and moves
    /// on without waiting; errors inside it are the callback's business.
    ///
    /// Outside a runtime the capture blocks on a fresh current-thread runtime
    /// until the callback finishes. The callback is only skipped, with a
    /// warning, if that runtime cannot be started.
    pub fn on_captured_async<F, Fut>(self, callback: F) -> Self
    where
        F: Fn(FormSnapshot) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_captured(move |snapshot| match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(callback(snapshot.clone()));
            }
            Err(_) => match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime.block_on(callback(snapshot.clone())),
                Err(e) => warn!(error = %e, "async capture callback skipped"),
            },
        })
    }
}

/// Captures a form's fields every time its configured event fires.
///
/// The listener suppresses the event's default action, builds a fresh
/// [`FormSnapshot`], stores it as the current snapshot (replacing the
/// previous one), calls the `on_captured` callback, and finally dispatches
/// [`CAPTURED_EVENT`] on the form.
pub struct FormCapture {
    form_id: String,
    event_type: String,
    element: Arc<FormElement>,
    current: Arc<RwLock<Option<FormSnapshot>>>,
}

impl FormCapture {
    /// Look up `form_id` and start listening.
    ///
    /// Fails with [`Error::ElementNotFound`] if the document has no such
    /// element; nothing is attached in that case.
    pub fn attach(document: &Document, form_id: &str, options: CaptureOptions) -> Result<Self> {
        let element = document
            .get_element_by_id(form_id)
            .ok_or_else(|| Error::ElementNotFound {
                id: form_id.to_string(),
            })?;

        let current = Arc::new(RwLock::new(None));
        let slot = current.clone();
        let id = form_id.to_string();
        let CaptureOptions {
            event_type,
            debug,
            on_captured,
        } = options;

        element.add_event_listener(event_type.clone(), move |form, event| {
            event.prevent_default();
            let snapshot = FormSnapshot::build(form.form_data(), form.multi_selects());
            *slot.write().unwrap() = Some(snapshot.clone());

            if debug {
                info!(form_id = %id, snapshot = %snapshot.to_json(), "form captured");
            }
            if let Some(callback) = &on_captured {
                callback(&snapshot);
            }
            form.dispatch_event(DomEvent::custom(CAPTURED_EVENT, snapshot.to_json()));
        });

        Ok(Self {
            form_id: form_id.to_string(),
            event_type,
            element,
            current,
        })
    }

    /// Attach with default options (capture on `submit`).
    pub fn attach_default(document: &Document, form_id: &str) -> Result<Self> {
        Self::attach(document, form_id, CaptureOptions::default())
    }

    /// The most recent snapshot, or `None` before the first capture.
    pub fn get_data(&self) -> Option<FormSnapshot> {
        self.current.read().unwrap().clone()
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn element(&self) -> &Arc<FormElement> {
        &self.element
    }
}
