//! Status Transition Table
//!
//! Fulfillment moves strictly forward:
//!
//! ```text
//! pending    -> processing | shipped | cancelled
//! processing -> shipped | cancelled
//! shipped    -> delivered
//! delivered  -> (terminal)
//! cancelled  -> (terminal)
//! ```

use crate::db::models::OrderStatus;

impl OrderStatus {
    /// Whether `next` is a legal transition from this status.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Pending, Shipped)
                | (Pending, Cancelled)
                | (Processing, Shipped)
                | (Processing, Cancelled)
                | (Shipped, Delivered)
        )
    }

    /// Cancellation is only permitted before fulfillment starts.
    pub fn can_cancel(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    const ALL: [OrderStatus; 5] = [Pending, Processing, Shipped, Delivered, Cancelled];

    #[test]
    fn forward_transitions_are_legal() {
        assert!(Pending.can_transition_to(Processing));
        assert!(Pending.can_transition_to(Shipped));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Processing.can_transition_to(Shipped));
        assert!(Processing.can_transition_to(Cancelled));
        assert!(Shipped.can_transition_to(Delivered));
    }

    #[test]
    fn terminal_states_allow_nothing() {
        for next in ALL {
            assert!(!Delivered.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn no_backward_transitions() {
        assert!(!Processing.can_transition_to(Pending));
        assert!(!Shipped.can_transition_to(Processing));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Shipped));
    }

    #[test]
    fn self_transitions_are_illegal() {
        for status in ALL {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn cancel_window() {
        assert!(Pending.can_cancel());
        assert!(Processing.can_cancel());
        assert!(!Shipped.can_cancel());
        assert!(!Delivered.can_cancel());
        assert!(!Cancelled.can_cancel());
    }
}
