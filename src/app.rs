use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::api::{self, ApiError};
use crate::model::{record_removal, record_signup, validate_signup, Notice, Roster, Severity};
use crate::view::{activity_card, notice_banner, roster_option};

const NOTICE_DISMISS_MS: u32 = 4_000;
const SIGNUP_NETWORK_MSG: &str = "An unexpected error occurred.";
const REMOVE_NETWORK_MSG: &str = "An error occurred while removing participant.";

/// What the list area is currently showing.
#[derive(Debug, Clone, PartialEq)]
enum ListState {
    Loading,
    Failed,
    Loaded(Roster),
}

/// Mirror transitions. Mutations are dispatched as actions so they apply to
/// the state current at completion time, not to the snapshot a handler
/// captured when its request was spawned — two overlapping mutations must
/// both survive in the mirror.
enum ListAction {
    Loading,
    Loaded(Roster),
    Failed,
    Signup { activity: String, email: String },
    Removal { activity: String, email: String },
}

impl Reducible for ListState {
    type Action = ListAction;

    fn reduce(self: Rc<Self>, action: ListAction) -> Rc<Self> {
        match action {
            ListAction::Loading => Rc::new(ListState::Loading),
            ListAction::Loaded(roster) => Rc::new(ListState::Loaded(roster)),
            ListAction::Failed => Rc::new(ListState::Failed),
            ListAction::Signup { activity, email } => {
                self.patched(|roster| record_signup(roster, &activity, &email))
            }
            ListAction::Removal { activity, email } => {
                self.patched(|roster| record_removal(roster, &activity, &email))
            }
        }
    }
}

impl ListState {
    /// Applies a single-entry mutation to a loaded mirror; anything else
    /// (not loaded, unknown activity/email) leaves the state untouched.
    fn patched(self: Rc<Self>, apply: impl FnOnce(&mut Roster) -> bool) -> Rc<Self> {
        match &*self {
            ListState::Loaded(roster) => {
                let mut roster = roster.clone();
                if apply(&mut roster) {
                    Rc::new(ListState::Loaded(roster))
                } else {
                    self
                }
            }
            _ => self,
        }
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let list = use_reducer(|| ListState::Loading);
    let notice = use_state(|| None::<Notice>);

    // Monotonic ticket for full-list loads. A reload that finishes after a
    // newer load, or after a successful mutation, is stale and discarded.
    let load_ticket = use_mut_ref(|| 0u64);

    // Pending banner dismissal; replaced (and thereby cancelled) whenever a
    // newer notice arrives.
    let notice_timer = use_mut_ref(|| None::<Timeout>);

    let email_ref = use_node_ref();
    let select_ref = use_node_ref();

    // Show a banner and schedule its dismissal.
    let set_notice = {
        let notice = notice.clone();
        let notice_timer = notice_timer.clone();
        Callback::from(move |n: Notice| {
            notice.set(Some(n));
            let notice = notice.clone();
            let timer = Timeout::new(NOTICE_DISMISS_MS, move || notice.set(None));
            *notice_timer.borrow_mut() = Some(timer);
        })
    };

    // Full fetch: replaces the mirror wholesale.
    let load = {
        let list = list.clone();
        let load_ticket = load_ticket.clone();
        Callback::from(move |_: ()| {
            let ticket = {
                let mut t = load_ticket.borrow_mut();
                *t += 1;
                *t
            };
            let list = list.clone();
            let load_ticket = load_ticket.clone();
            spawn_local(async move {
                let result = api::fetch_activities().await;
                if *load_ticket.borrow() != ticket {
                    return; // superseded while in flight
                }
                match result {
                    Ok(roster) => list.dispatch(ListAction::Loaded(roster)),
                    Err(e) => {
                        web_sys::console::error_1(
                            &format!("Error fetching activities: {e}").into(),
                        );
                        list.dispatch(ListAction::Failed);
                    }
                }
            });
        })
    };

    // Initial load.
    {
        let load = load.clone();
        use_effect_with((), move |_| {
            load.emit(());
            || ()
        });
    }

    let on_submit = {
        let list = list.clone();
        let load = load.clone();
        let load_ticket = load_ticket.clone();
        let set_notice = set_notice.clone();
        let email_ref = email_ref.clone();
        let select_ref = select_ref.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let Some(email_input) = email_ref.cast::<HtmlInputElement>() else {
                return;
            };
            let Some(select) = select_ref.cast::<HtmlSelectElement>() else {
                return;
            };
            let email = email_input.value().trim().to_string();
            let activity = select.value();

            if let Err(msg) = validate_signup(&activity, &email) {
                set_notice.emit(Notice::new(msg, Severity::Error));
                return;
            }

            let list = list.clone();
            let load = load.clone();
            let load_ticket = load_ticket.clone();
            let set_notice = set_notice.clone();
            spawn_local(async move {
                match api::sign_up(&activity, &email).await {
                    Ok(message) => {
                        *load_ticket.borrow_mut() += 1;
                        let known = matches!(
                            &*list,
                            ListState::Loaded(roster) if roster.contains_key(&activity)
                        );
                        list.dispatch(ListAction::Signup {
                            activity: activity.clone(),
                            email: email.clone(),
                        });
                        if !known {
                            // Mirror had no such activity at submit time;
                            // fall back to a full reload.
                            load.emit(());
                        }
                        set_notice.emit(Notice::new(message, Severity::Success));
                        email_input.set_value("");
                        select.set_value("");
                    }
                    Err(e) => {
                        web_sys::console::error_1(&format!("Error signing up: {e}").into());
                        let text = match e {
                            ApiError::Request { detail, .. } => detail,
                            ApiError::Network(_) => SIGNUP_NETWORK_MSG.to_string(),
                        };
                        set_notice.emit(Notice::new(text, Severity::Error));
                    }
                }
            });
        })
    };

    let on_remove = {
        let list = list.clone();
        let load_ticket = load_ticket.clone();
        let set_notice = set_notice.clone();
        Callback::from(move |(activity, email): (String, String)| {
            let confirmed = web_sys::window()
                .and_then(|w| {
                    w.confirm_with_message(&format!("Remove {email} from {activity}?"))
                        .ok()
                })
                .unwrap_or(false);
            if !confirmed {
                return;
            }

            let list = list.clone();
            let load_ticket = load_ticket.clone();
            let set_notice = set_notice.clone();
            spawn_local(async move {
                match api::remove_participant(&activity, &email).await {
                    Ok(message) => {
                        *load_ticket.borrow_mut() += 1;
                        list.dispatch(ListAction::Removal { activity, email });
                        set_notice.emit(Notice::new(message, Severity::Success));
                    }
                    Err(e) => {
                        web_sys::console::error_1(
                            &format!("Error removing participant: {e}").into(),
                        );
                        let text = match e {
                            ApiError::Request { detail, .. } => detail,
                            ApiError::Network(_) => REMOVE_NETWORK_MSG.to_string(),
                        };
                        set_notice.emit(Notice::new(text, Severity::Error));
                    }
                }
            });
        })
    };

    let on_retry = {
        let list = list.clone();
        let load = load.clone();
        Callback::from(move |_: MouseEvent| {
            list.dispatch(ListAction::Loading);
            load.emit(());
        })
    };

    let list_view = match &*list {
        ListState::Loading => html! { <p>{ "Loading activities..." }</p> },
        ListState::Failed => html! {
            <>
                <p class="error">{ "Could not load activities." }</p>
                <button type="button" onclick={on_retry}>{ "Try again" }</button>
            </>
        },
        ListState::Loaded(roster) => html! {
            <>
                { for roster
                    .iter()
                    .map(|(name, activity)| activity_card(name, activity, &on_remove)) }
            </>
        },
    };

    html! {
        <main>
            <section id="activities-container">
                <h3>{ "Activities" }</h3>
                <div id="activities-list">{ list_view }</div>
            </section>

            <section id="signup-container">
                <h3>{ "Sign Up" }</h3>
                <form id="signup-form" onsubmit={on_submit}>
                    <label>{ "Email:" }</label>
                    <input
                        id="email"
                        type="email"
                        ref={email_ref.clone()}
                        placeholder="your-email@example.com"
                    />
                    <label>{ "Activity:" }</label>
                    <select id="activity" ref={select_ref.clone()}>
                        <option value="" selected=true>{ "-- Select an activity --" }</option>
                        {
                            match &*list {
                                ListState::Loaded(roster) => html! {
                                    <>
                                        { for roster
                                            .iter()
                                            .map(|(name, activity)| roster_option(name, activity)) }
                                    </>
                                },
                                _ => Html::default(),
                            }
                        }
                    </select>
                    <button type="submit">{ "Sign Up" }</button>
                </form>
            </section>

            {
                match &*notice {
                    Some(n) => notice_banner(n),
                    None => Html::default(),
                }
            }
        </main>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> Rc<ListState> {
        let roster: Roster = serde_json::from_str(
            r#"{
                "Art Club": {"description":"d","schedule":"Tue","max_participants":5,"participants":["b@x.com"]},
                "Chess Club": {"description":"d","schedule":"Mon","max_participants":10,"participants":["a@x.com"]}
            }"#,
        )
        .expect("valid json");
        Rc::new(ListState::Loaded(roster))
    }

    fn roster_of(state: &ListState) -> &Roster {
        match state {
            ListState::Loaded(roster) => roster,
            other => panic!("expected loaded state, got {other:?}"),
        }
    }

    #[test]
    fn overlapping_removals_both_reach_the_mirror() {
        // Two deletes confirmed back to back: the second completion applies
        // to the state left by the first instead of resurrecting its entry.
        let state = loaded();
        let state = state.reduce(ListAction::Removal {
            activity: "Chess Club".into(),
            email: "a@x.com".into(),
        });
        let state = state.reduce(ListAction::Removal {
            activity: "Art Club".into(),
            email: "b@x.com".into(),
        });
        let roster = roster_of(&state);
        assert!(roster["Chess Club"].participants.is_empty());
        assert!(roster["Art Club"].participants.is_empty());
    }

    #[test]
    fn signup_and_removal_compose() {
        let state = loaded();
        let state = state.reduce(ListAction::Signup {
            activity: "Chess Club".into(),
            email: "c@x.com".into(),
        });
        let state = state.reduce(ListAction::Removal {
            activity: "Chess Club".into(),
            email: "a@x.com".into(),
        });
        assert_eq!(
            roster_of(&state)["Chess Club"].participants,
            vec!["c@x.com".to_string()]
        );
    }

    #[test]
    fn mutations_on_unknown_entries_leave_state_untouched() {
        let state = loaded();
        let next = state.clone().reduce(ListAction::Signup {
            activity: "Drama Club".into(),
            email: "c@x.com".into(),
        });
        assert_eq!(*next, *state);
        let next = state.clone().reduce(ListAction::Removal {
            activity: "Chess Club".into(),
            email: "nobody@x.com".into(),
        });
        assert_eq!(*next, *state);
    }

    #[test]
    fn mutations_before_load_are_ignored() {
        let state = Rc::new(ListState::Loading);
        let next = state.reduce(ListAction::Signup {
            activity: "Chess Club".into(),
            email: "c@x.com".into(),
        });
        assert_eq!(*next, ListState::Loading);
    }
}
