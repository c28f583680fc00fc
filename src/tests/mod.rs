mod mocks;

use crate::relay::{ChangeRecord, NewChange};

// Public re-exports for use in tests
pub use io::load_test_file;
pub use logging::LogCapture;
pub use mocks::coordinator::{CoordinatorEvent, MockCoordinator, MockCoordinatorBehavior};
pub use mocks::webhook::{create_webhook_request, pull_request_payload};

/// Change with the field values of [`pull_request_payload`] and the given revision and branch.
pub fn change(revision: &str, branch: &str) -> ChangeRecord {
    NewChange {
        revision: revision.to_string().into(),
        revlink: "http://x/pr/1".to_string(),
        comments: "PR opened".to_string(),
        who: "alice".to_string(),
        repository: "git://x/r.git".to_string(),
        branch: branch.to_string(),
        project: None,
    }
    .into()
}
