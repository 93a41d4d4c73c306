//! Pure render functions over the local mirror. Cards and options are keyed
//! by activity name so a single-entry mutation only re-patches that subtree.

use yew::prelude::*;

use crate::model::{option_label, Activity, Notice, Severity};

/// One card per activity: title + count badge, description, schedule,
/// availability, and the removable participant list.
pub fn activity_card(
    name: &str,
    activity: &Activity,
    on_remove: &Callback<(String, String)>,
) -> Html {
    html! {
        <div class="activity-card" key={name.to_string()}>
            <h4>
                { name }
                <span class="participant-count">{ activity.count_label() }</span>
            </h4>
            <p>{ activity.description.clone() }</p>
            <p><strong>{ "Schedule: " }</strong>{ activity.schedule.clone() }</p>
            <p><strong>{ "Availability: " }</strong>{ activity.spots_label() }</p>
            { participants_section(name, activity, on_remove) }
        </div>
    }
}

fn participants_section(
    name: &str,
    activity: &Activity,
    on_remove: &Callback<(String, String)>,
) -> Html {
    html! {
        <div class="participants">
            <h5>{ "Participants" }</h5>
            {
                if activity.participants.is_empty() {
                    html! {
                        <p class={Severity::Info.css_class()}>{ "No participants yet." }</p>
                    }
                } else {
                    html! {
                        <ul class="participants-list">
                            { for activity
                                .participants
                                .iter()
                                .map(|email| participant_item(name, email, on_remove)) }
                        </ul>
                    }
                }
            }
        </div>
    }
}

fn participant_item(name: &str, email: &str, on_remove: &Callback<(String, String)>) -> Html {
    let onclick = {
        let on_remove = on_remove.clone();
        let name = name.to_string();
        let email = email.to_string();
        Callback::from(move |_: MouseEvent| on_remove.emit((name.clone(), email.clone())))
    };
    html! {
        <li class="participant-item" key={email.to_string()}>
            <span>{ email }</span>
            <button
                type="button"
                class="remove-participant"
                aria-label={format!("Remove {email}")}
                {onclick}
            >
                { "🗑️" }
            </button>
        </li>
    }
}

/// `<option>` for the signup select, labelled with the live count.
pub fn roster_option(name: &str, activity: &Activity) -> Html {
    html! {
        <option value={name.to_string()} key={name.to_string()}>
            { option_label(name, activity) }
        </option>
    }
}

pub fn notice_banner(notice: &Notice) -> Html {
    html! {
        <div id="message" class={classes!("message", notice.severity.css_class())}>
            { notice.text.clone() }
        </div>
    }
}
