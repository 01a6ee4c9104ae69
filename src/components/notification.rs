use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, warn};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element};
use yew::prelude::*;
use yew::AppHandle;

use crate::config::SiteConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

impl Severity {
    pub fn class(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Severity::Success => "fa-check-circle",
            Severity::Error => "fa-exclamation-circle",
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            Severity::Success => "#10B981",
            Severity::Error => "#EF4444",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToastPhase {
    #[default]
    Shown,
    Leaving,
    Removed,
}

impl ToastPhase {
    /// Starts the exit transition. Only the first call from `Shown` counts,
    /// so a close click racing the auto-dismiss timer schedules one removal.
    pub fn dismiss(&mut self) -> bool {
        if *self == ToastPhase::Shown {
            *self = ToastPhase::Leaving;
            true
        } else {
            false
        }
    }

    pub fn finish(&mut self) -> bool {
        if *self == ToastPhase::Leaving {
            *self = ToastPhase::Removed;
            true
        } else {
            false
        }
    }
}

/// Holds at most one live toast, tagged with an id so a stale removal
/// callback cannot evict its successor.
#[derive(Debug)]
pub struct ToastSlot<T> {
    next_id: u64,
    live: Option<(u64, T)>,
}

impl<T> Default for ToastSlot<T> {
    fn default() -> Self {
        Self { next_id: 0, live: None }
    }
}

impl<T> ToastSlot<T> {
    pub fn take(&mut self) -> Option<T> {
        self.live.take().map(|(_, item)| item)
    }

    pub fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Stores `item`, handing back whatever it displaced.
    pub fn put(&mut self, id: u64, item: T) -> Option<T> {
        self.live.replace((id, item)).map(|(_, old)| old)
    }

    pub fn release(&mut self, id: u64) -> Option<T> {
        match &self.live {
            Some((live_id, _)) if *live_id == id => self.take(),
            _ => None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.live.is_some()
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct ToastProps {
    pub message: String,
    pub severity: Severity,
    pub lifetime_ms: u32,
    pub transition_ms: u32,
    pub on_removed: Callback<()>,
}

#[function_component(Toast)]
pub fn toast(props: &ToastProps) -> Html {
    let phase = use_mut_ref(ToastPhase::default);
    let leaving = use_state(|| false);

    let dismiss = {
        let phase = phase.clone();
        let leaving = leaving.clone();
        Callback::from(move |_: ()| {
            if phase.borrow_mut().dismiss() {
                leaving.set(true);
            }
        })
    };

    {
        let dismiss = dismiss.clone();
        let lifetime = props.lifetime_ms;
        use_effect_with_deps(
            move |_| {
                let timeout = Timeout::new(lifetime, move || dismiss.emit(()));
                move || drop(timeout)
            },
            (),
        );
    }

    {
        let phase = phase.clone();
        let on_removed = props.on_removed.clone();
        let transition = props.transition_ms;
        use_effect_with_deps(
            move |leaving| {
                let timeout = leaving.then(|| {
                    Timeout::new(transition, move || {
                        if phase.borrow_mut().finish() {
                            on_removed.emit(());
                        }
                    })
                });
                move || drop(timeout)
            },
            *leaving,
        );
    }

    let on_close = {
        let dismiss = dismiss.clone();
        Callback::from(move |_: MouseEvent| dismiss.emit(()))
    };

    let animation = if *leaving {
        format!("slideOut {}ms ease forwards", props.transition_ms)
    } else {
        format!("slideIn {}ms ease", props.transition_ms)
    };
    let style = format!(
        "position: fixed; top: 100px; right: 20px; max-width: 400px; padding: 20px 25px; \
         background: {}; color: white; border-radius: 12px; box-shadow: 0 10px 40px rgba(0,0,0,0.2); \
         display: flex; align-items: center; justify-content: space-between; gap: 15px; \
         z-index: 10000; animation: {};",
        props.severity.background(),
        animation
    );

    html! {
        <div class={classes!("notification", props.severity.class())} style={style}>
            <style>
                {r#"
                    @keyframes slideIn {
                        from { transform: translateX(100%); opacity: 0; }
                        to { transform: translateX(0); opacity: 1; }
                    }
                    @keyframes slideOut {
                        from { transform: translateX(0); opacity: 1; }
                        to { transform: translateX(100%); opacity: 0; }
                    }
                "#}
            </style>
            <div class="notification-content" style="display: flex; align-items: center; gap: 12px;">
                <i class={classes!("fas", props.severity.icon())}></i>
                <span>{ props.message.clone() }</span>
            </div>
            <button
                class="notification-close"
                style="background: none; border: none; color: white; cursor: pointer; padding: 5px; opacity: 0.8;"
                onclick={on_close}
            >
                <i class="fas fa-times"></i>
            </button>
        </div>
    }
}

struct LiveToast {
    host: Element,
    handle: AppHandle<Toast>,
}

impl LiveToast {
    fn remove(self) {
        self.handle.destroy();
        self.host.remove();
    }
}

/// Owns the single toast on the page.
pub struct NotificationCenter {
    document: Document,
    lifetime_ms: u32,
    transition_ms: u32,
    slot: Rc<RefCell<ToastSlot<LiveToast>>>,
}

impl NotificationCenter {
    pub fn new(document: &Document, config: &SiteConfig) -> Self {
        Self {
            document: document.clone(),
            lifetime_ms: config.toast_lifetime_ms,
            transition_ms: config.toast_transition_ms,
            slot: Rc::new(RefCell::new(ToastSlot::default())),
        }
    }

    pub fn show(&self, message: &str, severity: Severity) {
        let previous = self.slot.borrow_mut().take();
        if let Some(previous) = previous {
            previous.remove();
        }

        let Some(body) = self.document.body() else {
            warn!("No <body>, dropping notification: {}", message);
            return;
        };
        let host = match self.document.create_element("div") {
            Ok(host) => host,
            Err(err) => {
                warn!("Could not create notification host: {:?}", err);
                return;
            }
        };
        host.set_class_name("notification-host");
        if let Err(err) = body.append_child(&host) {
            warn!("Could not attach notification host: {:?}", err);
            return;
        }

        let id = self.slot.borrow_mut().next_id();
        let slot = self.slot.clone();
        // Deferred so the toast's own timer callback has returned before the app is torn down.
        let on_removed = Callback::from(move |_: ()| {
            let slot = slot.clone();
            spawn_local(async move {
                let released = slot.borrow_mut().release(id);
                if let Some(toast) = released {
                    debug!("Notification {} removed", id);
                    toast.remove();
                }
            });
        });

        let props = ToastProps {
            message: message.to_string(),
            severity,
            lifetime_ms: self.lifetime_ms,
            transition_ms: self.transition_ms,
            on_removed,
        };
        let handle = yew::Renderer::<Toast>::with_root_and_props(host.clone(), props).render();
        debug!("Notification {} shown ({})", id, severity.class());
        let displaced = self.slot.borrow_mut().put(id, LiveToast { host, handle });
        if let Some(displaced) = displaced {
            displaced.remove();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismissal_is_idempotent() {
        let mut phase = ToastPhase::default();
        assert!(phase.dismiss());
        assert!(!phase.dismiss());
        assert_eq!(phase, ToastPhase::Leaving);
        assert!(phase.finish());
        assert!(!phase.finish());
        assert!(!phase.dismiss());
        assert_eq!(phase, ToastPhase::Removed);
    }

    #[test]
    fn finish_requires_leaving() {
        let mut phase = ToastPhase::Shown;
        assert!(!phase.finish());
        assert_eq!(phase, ToastPhase::Shown);
    }

    #[test]
    fn slot_holds_one_toast() {
        let mut slot = ToastSlot::default();
        let first = slot.next_id();
        assert_eq!(slot.put(first, "first"), None);
        assert_eq!(slot.take(), Some("first"));
        let second = slot.next_id();
        slot.put(second, "second");
        assert!(slot.is_occupied());
        let third = slot.next_id();
        assert_eq!(slot.put(third, "third"), Some("second"));
    }

    #[test]
    fn stale_release_keeps_successor() {
        let mut slot = ToastSlot::default();
        let old = slot.next_id();
        slot.put(old, "old");
        slot.take();
        let new = slot.next_id();
        slot.put(new, "new");
        assert_eq!(slot.release(old), None);
        assert!(slot.is_occupied());
        assert_eq!(slot.release(new), Some("new"));
        assert!(!slot.is_occupied());
    }

    #[test]
    fn severity_picks_icon_and_colour() {
        assert_eq!(Severity::Success.icon(), "fa-check-circle");
        assert_eq!(Severity::Error.icon(), "fa-exclamation-circle");
        assert_eq!(Severity::Success.background(), "#10B981");
        assert_eq!(Severity::Error.class(), "error");
    }
}
