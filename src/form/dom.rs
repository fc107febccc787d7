//! Minimal in-memory document model: forms, their controls, and event dispatch.
//!
//! This stands in for the browser DOM. It implements just what form capture
//! needs: lookup by id, the form-encoding of successful controls, multi-select
//! enumeration, listeners, and default-action suppression.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// An option inside a `<select>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
    pub disabled: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            selected: false,
            disabled: false,
        }
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// A form control. An empty `name` means the control is never encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Text-like `<input>` (text, hidden, email, number, ...).
    Input {
        name: String,
        value: String,
        disabled: bool,
    },
    TextArea {
        name: String,
        value: String,
        disabled: bool,
    },
    /// Checkbox or radio button.
    Checkable {
        name: String,
        value: String,
        checked: bool,
        disabled: bool,
    },
    Select {
        name: String,
        multiple: bool,
        options: Vec<SelectOption>,
        disabled: bool,
    },
    /// `<input type="file">`; only the chosen file names are modelled.
    File {
        name: String,
        file_names: Vec<String>,
        disabled: bool,
    },
    /// Buttons are never part of the encoding (no submitter is modelled).
    Button { name: String, value: String },
}

impl Control {
    pub fn input(name: impl Into<String>, value: impl Into<String>) -> Self {
        Control::Input {
            name: name.into(),
            value: value.into(),
            disabled: false,
        }
    }

    pub fn textarea(name: impl Into<String>, value: impl Into<String>) -> Self {
        Control::TextArea {
            name: name.into(),
            value: value.into(),
            disabled: false,
        }
    }

    /// A checkbox; `value` defaults to `"on"` like the HTML attribute.
    pub fn checkbox(name: impl Into<String>, value: Option<&str>, checked: bool) -> Self {
        Control::Checkable {
            name: name.into(),
            value: value.unwrap_or("on").to_string(),
            checked,
            disabled: false,
        }
    }

    pub fn radio(name: impl Into<String>, value: impl Into<String>, checked: bool) -> Self {
        Control::Checkable {
            name: name.into(),
            value: value.into(),
            checked,
            disabled: false,
        }
    }

    pub fn select(name: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Control::Select {
            name: name.into(),
            multiple: false,
            options,
            disabled: false,
        }
    }

    pub fn multi_select(name: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Control::Select {
            name: name.into(),
            multiple: true,
            options,
            disabled: false,
        }
    }

    pub fn file(name: impl Into<String>, file_names: Vec<String>) -> Self {
        Control::File {
            name: name.into(),
            file_names,
            disabled: false,
        }
    }

    pub fn button(name: impl Into<String>, value: impl Into<String>) -> Self {
        Control::Button {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn disabled(mut self) -> Self {
        match &mut self {
            Control::Input { disabled, .. }
            | Control::TextArea { disabled, .. }
            | Control::Checkable { disabled, .. }
            | Control::Select { disabled, .. }
            | Control::File { disabled, .. } => *disabled = true,
            Control::Button { .. } => {}
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            Control::Input { name, .. }
            | Control::TextArea { name, .. }
            | Control::Checkable { name, .. }
            | Control::Select { name, .. }
            | Control::File { name, .. }
            | Control::Button { name, .. } => name,
        }
    }

    fn is_disabled(&self) -> bool {
        match self {
            Control::Input { disabled, .. }
            | Control::TextArea { disabled, .. }
            | Control::Checkable { disabled, .. }
            | Control::Select { disabled, .. }
            | Control::File { disabled, .. } => *disabled,
            Control::Button { .. } => false,
        }
    }

    /// Name/value pairs this control contributes to the form encoding.
    fn encode(&self, out: &mut Vec<(String, String)>) {
        if self.name().is_empty() || self.is_disabled() {
            return;
        }
        match self {
            Control::Input { name, value, .. } | Control::TextArea { name, value, .. } => {
                out.push((name.clone(), value.clone()));
            }
            Control::Checkable {
                name,
                value,
                checked,
                ..
            } => {
                if *checked {
                    out.push((name.clone(), value.clone()));
                }
            }
            Control::Select {
                name,
                multiple,
                options,
                ..
            } => {
                let explicit: Vec<&SelectOption> = options
                    .iter()
                    .filter(|o| o.selected && !o.disabled)
                    .collect();
                if !explicit.is_empty() {
                    for o in explicit {
                        out.push((name.clone(), o.value.clone()));
                    }
                } else if !multiple {
                    // A single select always shows something: the first enabled option.
                    if let Some(o) = options.iter().find(|o| !o.disabled) {
                        out.push((name.clone(), o.value.clone()));
                    }
                }
            }
            Control::File {
                name, file_names, ..
            } => {
                if file_names.is_empty() {
                    out.push((name.clone(), String::new()));
                }
                for f in file_names {
                    out.push((name.clone(), f.clone()));
                }
            }
            Control::Button { .. } => {}
        }
    }
}

/// An event travelling through [`FormElement::dispatch_event`].
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    event_type: String,
    detail: Option<Value>,
    default_prevented: bool,
}

impl DomEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            detail: None,
            default_prevented: false,
        }
    }

    /// A custom event carrying a payload.
    pub fn custom(event_type: impl Into<String>, detail: Value) -> Self {
        Self {
            event_type: event_type.into(),
            detail: Some(detail),
            default_prevented: false,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn detail(&self) -> Option<&Value> {
        self.detail.as_ref()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

pub type Listener = Arc<dyn Fn(&FormElement, &mut DomEvent) + Send + Sync>;

/// A `<form>` element.
pub struct FormElement {
    id: String,
    controls: RwLock<Vec<Control>>,
    listeners: RwLock<Vec<(String, Listener)>>,
}

impl FormElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            controls: RwLock::new(Vec::new()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn with_control(self, control: Control) -> Self {
        self.push_control(control);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn push_control(&self, control: Control) {
        self.controls.write().unwrap().push(control);
    }

    /// Mutate the controls in place (e.g. simulate user input).
    pub fn update_controls<F: FnOnce(&mut Vec<Control>)>(&self, f: F) {
        f(&mut self.controls.write().unwrap());
    }

    /// Set the value of every text-like control called `name`.
    pub fn set_value(&self, name: &str, new_value: &str) {
        self.update_controls(|controls| {
            for c in controls.iter_mut() {
                if let Control::Input { name: n, value, .. } | Control::TextArea { name: n, value, .. } = c {
                    if n == name {
                        *value = new_value.to_string();
                    }
                }
            }
        });
    }

    /// Replace the selection of every select called `name` with `values`.
    pub fn select_values(&self, name: &str, values: &[&str]) {
        self.update_controls(|controls| {
            for c in controls.iter_mut() {
                if let Control::Select { name: n, options, .. } = c {
                    if n == name {
                        for o in options.iter_mut() {
                            o.selected = values.contains(&o.value.as_str());
                        }
                    }
                }
            }
        });
    }

    /// Name/value pairs in control order, as a browser would encode them.
    pub fn form_data(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for c in self.controls.read().unwrap().iter() {
            c.encode(&mut out);
        }
        out
    }

    /// Every named `<select multiple>` with its selected values in option order.
    pub fn multi_selects(&self) -> Vec<(String, Vec<String>)> {
        self.controls
            .read()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                Control::Select {
                    name,
                    multiple: true,
                    options,
                    ..
                } if !name.is_empty() => Some((
                    name.clone(),
                    options
                        .iter()
                        .filter(|o| o.selected)
                        .map(|o| o.value.clone())
                        .collect(),
                )),
                _ => None,
            })
            .collect()
    }

    pub fn add_event_listener<F>(&self, event_type: impl Into<String>, listener: F)
    where
        F: Fn(&FormElement, &mut DomEvent) + Send + Sync + 'static,
    {
        self.listeners
            .write()
            .unwrap()
            .push((event_type.into(), Arc::new(listener)));
    }

    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listeners
            .read()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == event_type)
            .count()
    }

    /// Run every listener for the event's type, in registration order, and
    /// hand the event back so the caller can inspect `default_prevented`.
    pub fn dispatch_event(&self, mut event: DomEvent) -> DomEvent {
        let matching: Vec<Listener> = self
            .listeners
            .read()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == event.event_type())
            .map(|(_, l)| l.clone())
            .collect();
        for listener in matching {
            listener(self, &mut event);
        }
        event
    }

    /// Dispatch a `submit` event.
    pub fn submit(&self) -> DomEvent {
        self.dispatch_event(DomEvent::new("submit"))
    }
}

/// Element registry keyed by id.
#[derive(Default)]
pub struct Document {
    elements: RwLock<HashMap<String, Arc<FormElement>>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a form, replacing any element with the same id.
    pub fn insert(&self, form: FormElement) -> Arc<FormElement> {
        let form = Arc::new(form);
        self.elements
            .write()
            .unwrap()
            .insert(form.id().to_string(), form.clone());
        form
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<Arc<FormElement>> {
        self.elements.read().unwrap().get(id).cloned()
    }

    pub fn remove(&self, id: &str) -> Option<Arc<FormElement>> {
        self.elements.write().unwrap().remove(id)
    }
}
