//! Named scenario procedures

use futures::future::BoxFuture;

use crate::error::E2eResult;
use crate::session::Session;

/// Body of a scenario: drive the session and assert. The session is owned by
/// the runner; a procedure must not close it.
pub type ScenarioFn = for<'a> fn(&'a mut Session) -> BoxFuture<'a, E2eResult<()>>;

#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub run: ScenarioFn,
}

impl Scenario {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag)
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .finish()
    }
}
