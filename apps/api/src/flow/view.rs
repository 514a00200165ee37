//! Plain-text screens for each wizard step.

use crate::flow::step::{Action, FlowExit, FlowState, FlowStep};
use crate::models::user::MockUser;

/// Flat discount offered by the retention step, in cents.
pub const DOWNSELL_DISCOUNT_CENTS: i64 = 1000;

const LOST_BENEFITS: [&str; 4] = [
    "Premium migration tools",
    "Priority customer support",
    "Advanced analytics",
    "Unlimited transfers",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub title: String,
    pub body: Vec<String>,
    pub buttons: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub action: Action,
    pub label: String,
    pub disabled: bool,
}

/// `2500` → `"$25.00"`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

pub fn discounted_price(monthly_price: i64) -> i64 {
    (monthly_price - DOWNSELL_DISCOUNT_CENTS).max(0)
}

/// Shown while the variant is still being resolved.
pub fn loading_screen() -> Screen {
    Screen {
        title: "Loading...".to_string(),
        body: Vec::new(),
        buttons: Vec::new(),
    }
}

pub fn render(state: &FlowState, user: &MockUser) -> Screen {
    if let Some(exit) = state.exit {
        return exit_screen(exit);
    }

    let (title, body) = match state.step {
        FlowStep::Initial => (
            "We're sorry to see you go!".to_string(),
            vec![
                "Before you cancel, help us understand why you're leaving so we can improve."
                    .to_string(),
            ],
        ),
        FlowStep::Reasons => (
            "What's your main reason for canceling?".to_string(),
            Vec::new(),
        ),
        FlowStep::Downsell => {
            let price = user.subscription.monthly_price;
            (
                "Wait! We have a special offer for you".to_string(),
                vec![
                    format!("{} OFF", format_cents(DOWNSELL_DISCOUNT_CENTS).trim_end_matches(".00")),
                    format!("Was {}/month", format_cents(price)),
                    format!("Now {}/month", format_cents(discounted_price(price))),
                    "This special pricing is available for the next 6 months".to_string(),
                ],
            )
        }
        FlowStep::Confirm => {
            let mut body = vec![
                "Your subscription will be canceled and you'll lose access to:".to_string(),
            ];
            body.extend(LOST_BENEFITS.iter().map(|b| format!("  • {b}")));
            body.push(format!("Reason: {}", state.reason_label()));
            (format!("Are you sure, {}?", user.name), body)
        }
        FlowStep::Complete => (
            "Subscription Canceled".to_string(),
            vec![
                "Your subscription has been marked for cancellation. You'll continue to have \
                 access until the end of your current billing period."
                    .to_string(),
            ],
        ),
    };

    let buttons = state
        .available_actions()
        .into_iter()
        .map(|action| Button {
            action,
            label: button_label(action, state.is_loading),
            disabled: state.is_loading,
        })
        .collect();

    Screen {
        title,
        body,
        buttons,
    }
}

fn button_label(action: Action, is_loading: bool) -> String {
    let label = match action {
        Action::ContinueCancellation => "Continue with Cancellation",
        Action::NeverMind => "Never mind, go back",
        Action::SelectReason(reason) => reason.label(),
        Action::AcceptOffer if is_loading => "Processing...",
        Action::AcceptOffer => "Accept this offer",
        Action::DeclineOffer => "No thanks, continue canceling",
        Action::ConfirmCancellation if is_loading => "Canceling...",
        Action::ConfirmCancellation => "Yes, cancel my subscription",
        Action::KeepSubscription => "Keep my subscription",
        Action::ReturnToDashboard => "Return to Dashboard",
    };
    label.to_string()
}

fn exit_screen(exit: FlowExit) -> Screen {
    let title = match exit {
        FlowExit::KeptSubscription => "Your subscription is still active.",
        FlowExit::AcceptedOffer => "Offer accepted! Taking you back to your profile...",
        FlowExit::ReturnedToDashboard => "Returning to your dashboard...",
    };
    Screen {
        title: title.to_string(),
        body: Vec::new(),
        buttons: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::step::Reason;
    use crate::models::cancellation::Variant;
    use crate::models::user::MOCK_USER;

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(2500), "$25.00");
        assert_eq!(format_cents(1505), "$15.05");
        assert_eq!(format_cents(7), "$0.07");
        assert_eq!(format_cents(-150), "-$1.50");
    }

    #[test]
    fn test_discount_never_goes_negative() {
        assert_eq!(discounted_price(2500), 1500);
        assert_eq!(discounted_price(800), 0);
    }

    #[test]
    fn test_downsell_screen_shows_both_prices() {
        let mut state = FlowState::new(Variant::B);
        state.step = FlowStep::Downsell;
        let screen = render(&state, &MOCK_USER);
        assert_eq!(screen.body[0], "$10 OFF");
        assert!(screen.body.contains(&"Was $25.00/month".to_string()));
        assert!(screen.body.contains(&"Now $15.00/month".to_string()));
        assert_eq!(screen.buttons[0].label, "Accept this offer");
    }

    #[test]
    fn test_confirm_screen_names_user_and_reason() {
        let mut state = FlowState::new(Variant::A);
        state.step = FlowStep::Confirm;
        state.selected_reason = Some(Reason::PoorCustomerService);
        let screen = render(&state, &MOCK_USER);
        assert_eq!(screen.title, "Are you sure, Mihailo?");
        assert_eq!(
            screen.body.last().map(String::as_str),
            Some("Reason: Poor customer service")
        );
    }

    #[test]
    fn test_loading_disables_buttons_and_swaps_label() {
        let mut state = FlowState::new(Variant::A);
        state.step = FlowStep::Confirm;
        state.is_loading = true;
        let screen = render(&state, &MOCK_USER);
        assert!(screen.buttons.iter().all(|b| b.disabled));
        assert_eq!(screen.buttons[0].label, "Canceling...");
    }

    #[test]
    fn test_reasons_screen_lists_six_reasons() {
        let mut state = FlowState::new(Variant::A);
        state.step = FlowStep::Reasons;
        let labels: Vec<_> = render(&state, &MOCK_USER)
            .buttons
            .into_iter()
            .map(|b| b.label)
            .collect();
        assert_eq!(labels.len(), 6);
        assert_eq!(labels[0], "Too expensive");
        assert_eq!(labels[5], "Other");
    }
}
