//! The VCS collaborator contract. A concrete implementation (GitHub,
//! Forgejo/Gitea, GitLab) lives outside this core crate; here we only fix
//! the trait shape and the rating-to-status mapping the dispatcher relies
//! on, lifted from the method shapes in `legacy_src/github.rs` without its
//! concrete OAuth/device-flow implementation.

use crate::diff::model::{Diff, Rating, StatusState};

/// No concrete implementation lives in this crate (out of scope); the
/// dispatcher collaborator supplies one per host. Plain `async fn` in trait
/// is enough since nothing here needs to hold a `dyn VcsProvider`.
pub trait VcsProvider: Send + Sync {
    async fn get_diff(&self, pr_ref: &str) -> anyhow::Result<Diff>;
    async fn post_comment(&self, pr_ref: &str, body_markdown: &str) -> anyhow::Result<()>;
    async fn set_status(&self, sha: &str, state: StatusState, description: &str) -> anyhow::Result<()>;
}

pub fn status_for_rating(rating: Rating) -> StatusState {
    match rating {
        Rating::Green => StatusState::Success,
        Rating::Yellow => StatusState::Success,
        Rating::Red => StatusState::Failure,
    }
}

pub fn status_description(score: u8, rating: Rating) -> String {
    format!("ShipSafe: {score}/100 {rating}")
}

/// In-memory `VcsProvider` for exercising dispatcher-shaped test code
/// against this crate without a real GitHub/Forgejo/GitLab client. Always
/// returns the diff it was built with and records posted comments/statuses
/// for assertions; not used by `main.rs`.
#[cfg(any(test, feature = "test-support"))]
pub struct NullVcsProvider {
    diff: Diff,
    pub comments: std::sync::Mutex<Vec<String>>,
    pub statuses: std::sync::Mutex<Vec<(String, StatusState, String)>>,
}

#[cfg(any(test, feature = "test-support"))]
impl NullVcsProvider {
    pub fn new(diff: Diff) -> Self {
        Self {
            diff,
            comments: std::sync::Mutex::new(Vec::new()),
            statuses: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl VcsProvider for NullVcsProvider {
    async fn get_diff(&self, _pr_ref: &str) -> anyhow::Result<Diff> {
        Ok(self.diff.clone())
    }

    async fn post_comment(&self, _pr_ref: &str, body_markdown: &str) -> anyhow::Result<()> {
        self.comments.lock().unwrap().push(body_markdown.to_string());
        Ok(())
    }

    async fn set_status(&self, sha: &str, state: StatusState, description: &str) -> anyhow::Result<()> {
        self.statuses.lock().unwrap().push((sha.to_string(), state, description.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_diff() -> Diff {
        Diff {
            base_sha: "a".into(),
            head_sha: "b".into(),
            files: Vec::new(),
            pr_title: String::new(),
            pr_body: String::new(),
            author: String::new(),
        }
    }

    #[tokio::test]
    async fn null_provider_echoes_diff_and_records_calls() {
        let provider = NullVcsProvider::new(blank_diff());
        let diff = provider.get_diff("pr-1").await.unwrap();
        assert_eq!(diff.base_sha, "a");

        provider.post_comment("pr-1", "report body").await.unwrap();
        provider.set_status("sha123", StatusState::Success, "ShipSafe: 90/100 GREEN").await.unwrap();

        assert_eq!(provider.comments.lock().unwrap().as_slice(), ["report body"]);
        assert_eq!(
            provider.statuses.lock().unwrap().as_slice(),
            [("sha123".to_string(), StatusState::Success, "ShipSafe: 90/100 GREEN".to_string())]
        );
    }

    #[test]
    fn green_and_yellow_map_to_success_only_red_fails() {
        assert_eq!(status_for_rating(Rating::Green), StatusState::Success);
        assert_eq!(status_for_rating(Rating::Yellow), StatusState::Success);
        assert_eq!(status_for_rating(Rating::Red), StatusState::Failure);
    }

    #[test]
    fn description_follows_the_fixed_format() {
        assert_eq!(status_description(90, Rating::Green), "ShipSafe: 90/100 GREEN");
    }
}
