use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use log::{debug, info};
use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

use crate::components::notification::{NotificationCenter, Severity};
use crate::dom;
use crate::error::{ValidationError, WiringError};

pub const SENDING_LABEL: &str = "Отправка...";
pub const SUCCESS_MESSAGE: &str =
    "Спасибо! Ваша заявка отправлена. Мы свяжемся с вами в ближайшее время!";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub destination: String,
    pub message: String,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields: Vec<&'static str> = [("name", &self.name), ("phone", &self.phone)]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| field)
            .collect();
        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingRequired { fields })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack;

/// Whatever actually delivers a request.
pub trait Submitter {
    async fn submit(&self, request: &ContactRequest) -> Result<Ack, ValidationError>;
}

/// Stand-in for a backend: waits, then accepts everything.
pub struct DelayedSubmitter {
    pub delay_ms: u32,
}

impl Submitter for DelayedSubmitter {
    async fn submit(&self, request: &ContactRequest) -> Result<Ack, ValidationError> {
        request.validate()?;
        TimeoutFuture::new(self.delay_ms).await;
        Ok(Ack)
    }
}

/// The parts of the page the submit flow touches.
pub trait ContactView {
    fn read(&self) -> ContactRequest;
    /// Disables the submit control and shows `label`, returning the label it replaced.
    fn begin_sending(&self, label: &str) -> String;
    fn finish_sending(&self, original_label: &str);
    fn reset(&self);
    fn notify(&self, message: &str, severity: Severity);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected(ValidationError),
    Sent(Ack),
    Failed(ValidationError),
}

pub async fn submit_contact<V: ContactView, S: Submitter>(view: &V, submitter: &S) -> SubmitOutcome {
    let request = view.read();
    if let Err(err) = request.validate() {
        view.notify(&err.to_string(), Severity::Error);
        return SubmitOutcome::Rejected(err);
    }

    if let Ok(json) = serde_json::to_string(&request) {
        debug!("Submitting contact request {}", json);
    }
    let original = view.begin_sending(SENDING_LABEL);
    let outcome = match submitter.submit(&request).await {
        Ok(ack) => {
            view.notify(SUCCESS_MESSAGE, Severity::Success);
            view.reset();
            SubmitOutcome::Sent(ack)
        }
        Err(err) => {
            view.notify(&err.to_string(), Severity::Error);
            SubmitOutcome::Failed(err)
        }
    };
    view.finish_sending(&original);
    outcome
}

pub struct DomContactForm {
    form: HtmlFormElement,
    button: HtmlButtonElement,
    name: HtmlInputElement,
    phone: HtmlInputElement,
    email: HtmlInputElement,
    destination: Element,
    message: Element,
    notifications: Rc<NotificationCenter>,
}

impl DomContactForm {
    pub fn resolve(document: &Document, notifications: Rc<NotificationCenter>) -> Result<Self, WiringError> {
        let form: HtmlFormElement = dom::by_id(document, "contactForm")?;
        Ok(Self {
            button: dom::query(&form, "button[type=\"submit\"]")?,
            name: dom::by_id(document, "name")?,
            phone: dom::by_id(document, "phone")?,
            email: dom::by_id(document, "email")?,
            destination: dom::by_id(document, "destination")?,
            message: dom::by_id(document, "message")?,
            form,
            notifications,
        })
    }

    pub fn wire(self, delay_ms: u32) -> Result<(), WiringError> {
        let form = self.form.clone();
        let view = Rc::new(self);
        let submitter = Rc::new(DelayedSubmitter { delay_ms });
        let on_submit = Closure::wrap(Box::new(move |e: Event| {
            e.prevent_default();
            let view = view.clone();
            let submitter = submitter.clone();
            spawn_local(async move {
                let outcome = submit_contact(view.as_ref(), submitter.as_ref()).await;
                info!("Contact form outcome: {:?}", outcome);
            });
        }) as Box<dyn FnMut(Event)>);
        form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
        on_submit.forget();
        Ok(())
    }
}

/// Value of an input, select or textarea.
fn field_value(element: &Element) -> String {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}

impl ContactView for DomContactForm {
    fn read(&self) -> ContactRequest {
        ContactRequest {
            name: self.name.value(),
            phone: self.phone.value(),
            email: self.email.value(),
            destination: field_value(&self.destination),
            message: field_value(&self.message),
        }
    }

    fn begin_sending(&self, label: &str) -> String {
        let original = self.button.text_content().unwrap_or_default();
        self.button.set_text_content(Some(label));
        self.button.set_disabled(true);
        original
    }

    fn finish_sending(&self, original_label: &str) {
        self.button.set_text_content(Some(original_label));
        self.button.set_disabled(false);
    }

    fn reset(&self) {
        self.form.reset();
    }

    fn notify(&self, message: &str, severity: Severity) {
        self.notifications.show(message, severity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Step {
        Busy(String),
        Idle(String),
        Reset,
        Notified(String, Severity),
    }

    struct FakeView {
        request: ContactRequest,
        label: RefCell<String>,
        disabled: RefCell<bool>,
        steps: RefCell<Vec<Step>>,
    }

    impl FakeView {
        fn with(name: &str, phone: &str) -> Self {
            Self {
                request: ContactRequest {
                    name: name.into(),
                    phone: phone.into(),
                    ..ContactRequest::default()
                },
                label: RefCell::new("Отправить заявку".into()),
                disabled: RefCell::new(false),
                steps: RefCell::new(Vec::new()),
            }
        }

        fn notifications(&self) -> Vec<(String, Severity)> {
            self.steps
                .borrow()
                .iter()
                .filter_map(|step| match step {
                    Step::Notified(message, severity) => Some((message.clone(), *severity)),
                    _ => None,
                })
                .collect()
        }
    }

    impl ContactView for FakeView {
        fn read(&self) -> ContactRequest {
            self.request.clone()
        }

        fn begin_sending(&self, label: &str) -> String {
            let original = self.label.replace(label.to_string());
            *self.disabled.borrow_mut() = true;
            self.steps.borrow_mut().push(Step::Busy(label.to_string()));
            original
        }

        fn finish_sending(&self, original_label: &str) {
            *self.label.borrow_mut() = original_label.to_string();
            *self.disabled.borrow_mut() = false;
            self.steps.borrow_mut().push(Step::Idle(original_label.to_string()));
        }

        fn reset(&self) {
            self.steps.borrow_mut().push(Step::Reset);
        }

        fn notify(&self, message: &str, severity: Severity) {
            self.steps.borrow_mut().push(Step::Notified(message.to_string(), severity));
        }
    }

    struct Instant {
        calls: RefCell<usize>,
        reply: Result<Ack, ValidationError>,
    }

    impl Instant {
        fn accepting() -> Self {
            Self { calls: RefCell::new(0), reply: Ok(Ack) }
        }
    }

    impl Submitter for Instant {
        async fn submit(&self, _request: &ContactRequest) -> Result<Ack, ValidationError> {
            *self.calls.borrow_mut() += 1;
            self.reply.clone()
        }
    }

    #[test]
    fn missing_fields_are_listed() {
        let request = ContactRequest::default();
        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingRequired { fields: vec!["name", "phone"] })
        );
        let request = ContactRequest { name: "Анна".into(), ..ContactRequest::default() };
        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingRequired { fields: vec!["phone"] })
        );
    }

    #[test]
    fn optional_fields_may_be_empty() {
        let request = ContactRequest {
            name: "Анна".into(),
            phone: "+7 900 000-00-00".into(),
            ..ContactRequest::default()
        };
        assert_eq!(request.validate(), Ok(()));
    }

    #[test]
    fn empty_required_field_never_reaches_submitter() {
        for (name, phone) in [("", ""), ("Анна", ""), ("", "+7 900")] {
            let view = FakeView::with(name, phone);
            let submitter = Instant::accepting();
            let outcome = block_on(submit_contact(&view, &submitter));
            assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
            assert_eq!(*submitter.calls.borrow(), 0);
            assert_eq!(
                view.notifications(),
                vec![("Пожалуйста, заполните обязательные поля".to_string(), Severity::Error)]
            );
            assert!(!*view.disabled.borrow());
        }
    }

    #[test]
    fn successful_submit_runs_full_sequence() {
        let view = FakeView::with("Анна", "+7 900");
        let submitter = Instant::accepting();
        let outcome = block_on(submit_contact(&view, &submitter));
        assert_eq!(outcome, SubmitOutcome::Sent(Ack));
        assert_eq!(
            *view.steps.borrow(),
            vec![
                Step::Busy("Отправка...".into()),
                Step::Notified(
                    "Спасибо! Ваша заявка отправлена. Мы свяжемся с вами в ближайшее время!".into(),
                    Severity::Success
                ),
                Step::Reset,
                Step::Idle("Отправить заявку".into()),
            ]
        );
        assert_eq!(*view.label.borrow(), "Отправить заявку");
        assert!(!*view.disabled.borrow());
    }

    #[test]
    fn failed_submit_restores_button_without_reset() {
        let view = FakeView::with("Анна", "+7 900");
        let submitter = Instant {
            calls: RefCell::new(0),
            reply: Err(ValidationError::MissingRequired { fields: vec!["phone"] }),
        };
        let outcome = block_on(submit_contact(&view, &submitter));
        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert!(!view.steps.borrow().contains(&Step::Reset));
        assert_eq!(view.notifications().len(), 1);
        assert!(!*view.disabled.borrow());
    }
}
