mod entry;
mod manager;

pub use entry::{Dismissal, FollowUp, ToastAction, ToastEntry, ToastId, ToastMessage};
pub use manager::{DEFAULT_DISMISS, ToastControls, ToastManager};
