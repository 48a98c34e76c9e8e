use crate::draft::BookingDraft;
use std::time::Duration;
use tokio::sync::watch;

/// The four steps of the booking flow. Each page guards itself on mount by
/// checking the draft fields it depends on; there is no central router-level
/// state machine because the flow is linear with no branching beyond
/// "restart".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingPage {
    TripDetails,
    PassengerDetails,
    Payment,
    Confirmation,
}

impl BookingPage {
    /// Whether the draft carries everything this page needs to render.
    pub fn is_ready(&self, draft: &BookingDraft) -> bool {
        match self {
            BookingPage::TripDetails | BookingPage::PassengerDetails => {
                draft.schedule.is_some()
            }
            BookingPage::Payment => {
                draft.schedule.is_some()
                    && draft.passenger.is_some()
                    && draft.total_amount.is_positive()
            }
            BookingPage::Confirmation => {
                draft.schedule.is_some()
                    && draft.passenger.is_some()
                    && draft.total_amount.is_positive()
                    && draft.reservation_id.is_some()
            }
        }
    }
}

/// How a mounted page's guard resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The draft holds (or came to hold) the required state; render the page.
    Ready,
    /// Required state never arrived; send the user back to the entry point.
    RedirectHome,
    /// The page unmounted before the timer fired; nothing to do.
    Dismissed,
}

/// Time-boxed abandonment policy for pages mounted without their required
/// draft state: wait a grace period for late-arriving state, then redirect
/// home. The timer must die with the page, never outlive it.
#[derive(Debug, Clone)]
pub struct AbandonGuard {
    grace: Duration,
}

impl Default for AbandonGuard {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl AbandonGuard {
    pub fn new(grace: Duration) -> Self {
        Self { grace }
    }

    /// Run the guard for one page mount.
    ///
    /// `drafts` is the shared store's snapshot stream; `unmounted` flips to
    /// true when the page goes away. Resolves as soon as the draft becomes
    /// ready, the page unmounts, or the grace period lapses, whichever is
    /// first.
    pub async fn run(
        &self,
        page: BookingPage,
        mut drafts: watch::Receiver<BookingDraft>,
        mut unmounted: watch::Receiver<bool>,
    ) -> GuardOutcome {
        if page.is_ready(&drafts.borrow()) {
            return GuardOutcome::Ready;
        }
        if *unmounted.borrow() {
            return GuardOutcome::Dismissed;
        }

        tracing::warn!(
            "Booking draft missing required state for {:?}, redirecting home in {:?}",
            page,
            self.grace
        );

        let timer = tokio::time::sleep(self.grace);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                _ = &mut timer => return GuardOutcome::RedirectHome,
                changed = drafts.changed() => {
                    if changed.is_err() {
                        // Store dropped; the page cannot render either way.
                        return GuardOutcome::Dismissed;
                    }
                    if page.is_ready(&drafts.borrow()) {
                        return GuardOutcome::Ready;
                    }
                }
                changed = unmounted.changed() => {
                    if changed.is_err() || *unmounted.borrow() {
                        return GuardOutcome::Dismissed;
                    }
                }
            }
        }
    }
}
