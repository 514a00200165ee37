use serde::Serialize;
use thiserror::Error;

use crate::models::cancellation::Variant;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    Initial,
    Reasons,
    /// Retention offer, variant B only.
    Downsell,
    Confirm,
    Complete,
}

/// How the user left the wizard.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlowExit {
    /// "Never mind" or "Keep my subscription".
    KeptSubscription,
    /// Took the discount; the user is sent back to their profile.
    AcceptedOffer,
    /// Left from the completion screen.
    ReturnedToDashboard,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Reason {
    TooExpensive,
    NotUsingEnough,
    FoundBetterAlternative,
    TechnicalIssues,
    PoorCustomerService,
    Other,
}

impl Reason {
    pub const ALL: [Reason; 6] = [
        Reason::TooExpensive,
        Reason::NotUsingEnough,
        Reason::FoundBetterAlternative,
        Reason::TechnicalIssues,
        Reason::PoorCustomerService,
        Reason::Other,
    ];

    /// Text shown on the button and stored as the cancellation reason.
    pub fn label(&self) -> &'static str {
        match self {
            Reason::TooExpensive => "Too expensive",
            Reason::NotUsingEnough => "Not using it enough",
            Reason::FoundBetterAlternative => "Found a better alternative",
            Reason::TechnicalIssues => "Technical issues",
            Reason::PoorCustomerService => "Poor customer service",
            Reason::Other => "Other",
        }
    }
}

/// A button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ContinueCancellation,
    NeverMind,
    SelectReason(Reason),
    AcceptOffer,
    DeclineOffer,
    ConfirmCancellation,
    KeepSubscription,
    ReturnToDashboard,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::ContinueCancellation => "continue_cancellation",
            Action::NeverMind => "never_mind",
            Action::SelectReason(_) => "select_reason",
            Action::AcceptOffer => "accept_offer",
            Action::DeclineOffer => "decline_offer",
            Action::ConfirmCancellation => "confirm_cancellation",
            Action::KeepSubscription => "keep_subscription",
            Action::ReturnToDashboard => "return_to_dashboard",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("'{action}' is not available on the {step:?} step")]
    NotAvailable { step: FlowStep, action: &'static str },

    #[error("a request is already in flight")]
    Busy,

    #[error("the flow has already ended ({0:?})")]
    Finished(FlowExit),
}

/// Everything the wizard tracks between button presses. Transitions here are
/// synchronous; network calls are made by `CancelFlow` around them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowState {
    pub step: FlowStep,
    pub variant: Variant,
    pub selected_reason: Option<Reason>,
    pub accepted_downsell: bool,
    pub is_loading: bool,
    pub exit: Option<FlowExit>,
}

impl FlowState {
    pub fn new(variant: Variant) -> Self {
        Self {
            step: FlowStep::Initial,
            variant,
            selected_reason: None,
            accepted_downsell: false,
            is_loading: false,
            exit: None,
        }
    }

    /// Buttons shown on the current step, in display order.
    pub fn available_actions(&self) -> Vec<Action> {
        if self.exit.is_some() {
            return Vec::new();
        }
        match self.step {
            FlowStep::Initial => vec![Action::ContinueCancellation, Action::NeverMind],
            FlowStep::Reasons => Reason::ALL.into_iter().map(Action::SelectReason).collect(),
            FlowStep::Downsell => vec![Action::AcceptOffer, Action::DeclineOffer],
            FlowStep::Confirm => vec![Action::ConfirmCancellation, Action::KeepSubscription],
            FlowStep::Complete => vec![Action::ReturnToDashboard],
        }
    }

    /// Rejects presses that the current screen does not offer.
    pub fn ensure_available(&self, action: Action) -> Result<(), FlowError> {
        if let Some(exit) = self.exit {
            return Err(FlowError::Finished(exit));
        }
        if self.is_loading {
            return Err(FlowError::Busy);
        }
        let offered = self
            .available_actions()
            .iter()
            .any(|a| a.name() == action.name());
        if !offered {
            return Err(FlowError::NotAvailable {
                step: self.step,
                action: action.name(),
            });
        }
        Ok(())
    }

    /// Applies a transition that needs no backend call.
    pub fn apply_local(&mut self, action: Action) -> Result<(), FlowError> {
        self.ensure_available(action)?;
        match action {
            Action::ContinueCancellation => self.step = FlowStep::Reasons,
            Action::SelectReason(reason) => {
                self.selected_reason = Some(reason);
                self.step = if self.variant.shows_downsell() {
                    FlowStep::Downsell
                } else {
                    FlowStep::Confirm
                };
            }
            Action::DeclineOffer => {
                self.accepted_downsell = false;
                self.step = FlowStep::Confirm;
            }
            Action::NeverMind | Action::KeepSubscription => {
                self.exit = Some(FlowExit::KeptSubscription)
            }
            Action::ReturnToDashboard => self.exit = Some(FlowExit::ReturnedToDashboard),
            Action::AcceptOffer | Action::ConfirmCancellation => {
                return Err(FlowError::NotAvailable {
                    step: self.step,
                    action: action.name(),
                })
            }
        }
        Ok(())
    }

    pub fn reason_label(&self) -> &'static str {
        self.selected_reason.map(|r| r.label()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_a_skips_downsell() {
        let mut state = FlowState::new(Variant::A);
        state.apply_local(Action::ContinueCancellation).unwrap();
        state
            .apply_local(Action::SelectReason(Reason::TooExpensive))
            .unwrap();
        assert_eq!(state.step, FlowStep::Confirm);
        assert_eq!(state.reason_label(), "Too expensive");
    }

    #[test]
    fn test_variant_b_shows_downsell_then_decline_goes_to_confirm() {
        let mut state = FlowState::new(Variant::B);
        state.apply_local(Action::ContinueCancellation).unwrap();
        state
            .apply_local(Action::SelectReason(Reason::TechnicalIssues))
            .unwrap();
        assert_eq!(state.step, FlowStep::Downsell);

        state.apply_local(Action::DeclineOffer).unwrap();
        assert_eq!(state.step, FlowStep::Confirm);
        assert!(!state.accepted_downsell);
    }

    #[test]
    fn test_every_reason_leads_to_expected_step() {
        for variant in [Variant::A, Variant::B] {
            for reason in Reason::ALL {
                let mut state = FlowState::new(variant);
                state.apply_local(Action::ContinueCancellation).unwrap();
                state.apply_local(Action::SelectReason(reason)).unwrap();
                let expected = if variant == Variant::B {
                    FlowStep::Downsell
                } else {
                    FlowStep::Confirm
                };
                assert_eq!(state.step, expected, "{variant} / {reason:?}");
            }
        }
    }

    #[test]
    fn test_actions_from_other_steps_are_rejected() {
        let mut state = FlowState::new(Variant::A);
        let err = state.apply_local(Action::DeclineOffer).unwrap_err();
        assert_eq!(
            err,
            FlowError::NotAvailable {
                step: FlowStep::Initial,
                action: "decline_offer"
            }
        );
        assert_eq!(state.step, FlowStep::Initial);
    }

    #[test]
    fn test_never_mind_ends_flow() {
        let mut state = FlowState::new(Variant::B);
        state.apply_local(Action::NeverMind).unwrap();
        assert_eq!(state.exit, Some(FlowExit::KeptSubscription));
        assert!(state.available_actions().is_empty());
        assert_eq!(
            state.apply_local(Action::ContinueCancellation),
            Err(FlowError::Finished(FlowExit::KeptSubscription))
        );
    }

    #[test]
    fn test_loading_blocks_presses() {
        let mut state = FlowState::new(Variant::B);
        state.is_loading = true;
        assert_eq!(
            state.apply_local(Action::ContinueCancellation),
            Err(FlowError::Busy)
        );
    }

    #[test]
    fn test_network_actions_are_not_local() {
        let mut state = FlowState::new(Variant::A);
        state.step = FlowStep::Confirm;
        assert!(state.apply_local(Action::ConfirmCancellation).is_err());
        assert_eq!(state.step, FlowStep::Confirm);
    }
}
