use tracing::{error, info, warn};

use crate::cancel::payload::{AcceptDownsellRequest, CancelSubscriptionRequest};
use crate::flow::client::CancelApi;
use crate::flow::step::{Action, FlowError, FlowExit, FlowState, FlowStep};
use crate::flow::view::{self, Screen};
use crate::models::cancellation::Variant;
use crate::models::user::MockUser;

/// The cancellation wizard: local step transitions plus the backend writes
/// triggered by "Accept this offer" and "Yes, cancel my subscription".
///
/// A failed backend call is logged, the loading flag is cleared and the user
/// stays on the same step. Nothing is surfaced on screen.
pub struct CancelFlow<C> {
    client: C,
    user: MockUser,
    state: FlowState,
}

impl<C: CancelApi> CancelFlow<C> {
    /// Resolves the variant and opens the wizard on the initial step.
    /// If the backend lookup fails a variant is drawn locally.
    pub async fn start(client: C, user: MockUser) -> Self {
        let variant = match client.get_variant(user.id).await {
            Ok(variant) => variant,
            Err(e) => {
                warn!("Error initializing variant, falling back to local draw: {e}");
                if rand::random::<bool>() {
                    Variant::A
                } else {
                    Variant::B
                }
            }
        };
        info!("Cancellation flow started for user {} (variant {variant})", user.id);

        Self {
            client,
            user,
            state: FlowState::new(variant),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn step(&self) -> FlowStep {
        self.state.step
    }

    pub fn variant(&self) -> Variant {
        self.state.variant
    }

    pub fn exit(&self) -> Option<FlowExit> {
        self.state.exit
    }

    pub fn screen(&self) -> Screen {
        view::render(&self.state, &self.user)
    }

    /// What the screen shows while `action` waits on the backend: buttons disabled,
    /// "Processing..." / "Canceling..." labels. `None` for presses that need no call
    /// or that the current screen does not offer.
    pub fn pending_screen(&self, action: Action) -> Option<Screen> {
        if !matches!(action, Action::AcceptOffer | Action::ConfirmCancellation) {
            return None;
        }
        self.state.ensure_available(action).ok()?;
        let mut pending = self.state.clone();
        pending.is_loading = true;
        Some(view::render(&pending, &self.user))
    }

    /// Handles one button press.
    pub async fn dispatch(&mut self, action: Action) -> Result<(), FlowError> {
        match action {
            Action::AcceptOffer => self.accept_offer().await,
            Action::ConfirmCancellation => self.confirm_cancellation().await,
            other => self.state.apply_local(other),
        }
    }

    async fn accept_offer(&mut self) -> Result<(), FlowError> {
        self.state.ensure_available(Action::AcceptOffer)?;
        self.state.accepted_downsell = true;
        self.state.is_loading = true;

        let req = AcceptDownsellRequest {
            user_id: self.user.id,
            subscription_id: self.user.subscription.id.to_string(),
            variant: self.state.variant,
            reason: self.state.reason_label().to_string(),
        };
        match self.client.accept_downsell(req).await {
            Ok(row) => {
                info!("Downsell accepted (cancellation {}), redirecting to profile", row.id);
                self.state.exit = Some(FlowExit::AcceptedOffer);
            }
            Err(e) => error!("Error processing downsell acceptance: {e}"),
        }

        self.state.is_loading = false;
        Ok(())
    }

    async fn confirm_cancellation(&mut self) -> Result<(), FlowError> {
        self.state.ensure_available(Action::ConfirmCancellation)?;
        self.state.is_loading = true;

        let req = CancelSubscriptionRequest {
            user_id: self.user.id,
            subscription_id: self.user.subscription.id.to_string(),
            variant: self.state.variant,
            reason: self.state.reason_label().to_string(),
            accepted_downsell: self.state.accepted_downsell,
        };
        match self.client.cancel_subscription(req).await {
            Ok(_) => self.state.step = FlowStep::Complete,
            Err(e) => error!("Error processing cancellation: {e}"),
        }

        self.state.is_loading = false;
        Ok(())
    }
}
