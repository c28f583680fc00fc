use serde::{Deserialize, Serialize};

use crate::github::CommitSha;

/// Version-control kind attached to every change sent by this integration.
pub const DEFAULT_CHANGE_SOURCE: &str = "git";

/// A normalized description of one revision that the coordinator should consider for a build.
///
/// Records are built by the webhook listener and handed over (by value) to the relay, which
/// consumes them during delivery.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    revision: CommitSha,
    revlink: String,
    comments: String,
    who: String,
    repository: String,
    branch: String,
    src: String,
    /// Value of the `project` query parameter of the webhook request, if there was one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    project: Option<String>,
}

/// Everything needed to build a [`ChangeRecord`] except its source tag.
#[derive(Debug)]
pub struct NewChange {
    pub revision: CommitSha,
    pub revlink: String,
    pub comments: String,
    pub who: String,
    pub repository: String,
    pub branch: String,
    pub project: Option<String>,
}

impl From<NewChange> for ChangeRecord {
    fn from(change: NewChange) -> Self {
        let NewChange {
            revision,
            revlink,
            comments,
            who,
            repository,
            branch,
            project,
        } = change;
        Self {
            revision,
            revlink,
            comments,
            who,
            repository,
            branch,
            src: DEFAULT_CHANGE_SOURCE.to_string(),
            project,
        }
    }
}

impl ChangeRecord {
    pub fn revision(&self) -> &CommitSha {
        &self.revision
    }

    pub fn revlink(&self) -> &str {
        &self.revlink
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn who(&self) -> &str {
        &self.who
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Name/value pairs of the fields that are sent to the coordinator.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            ("revision", self.revision.as_ref()),
            ("revlink", self.revlink.as_str()),
            ("comments", self.comments.as_str()),
            ("who", self.who.as_str()),
            ("repository", self.repository.as_str()),
            ("branch", self.branch.as_str()),
            ("src", self.src.as_str()),
        ];
        if let Some(project) = &self.project {
            fields.push(("project", project.as_str()));
        }
        fields
    }
}
