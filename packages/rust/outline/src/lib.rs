//! Rule-based project outline generator behind the AI demo widget.
//!
//! A free-text idea is lower-cased, matched against the keyword [`rules`],
//! and folded into a [`ProjectOutline`]. [`OutlineGenerator`] adds the
//! configurable "thinking" delay the widget shows before answering.

pub mod problem;
pub mod rules;

use rand::Rng;
use tracing::{debug, info, instrument};

use studio_shared::{Latency, ProjectIdeaInput, ProjectOutline, Result, StudioError};

pub use rules::{Category, RULES, matched_categories};

/// Accepted idea length, in characters.
pub const MIN_IDEA_CHARS: usize = 10;
pub const MAX_IDEA_CHARS: usize = 1000;

/// Check the idea length bounds. Returns the first violated rule.
pub fn validate_idea(input: &ProjectIdeaInput) -> Result<()> {
    let len = input.idea.chars().count();
    if len < MIN_IDEA_CHARS {
        return Err(StudioError::validation(
            "Please describe your idea in more detail",
        ));
    }
    if len > MAX_IDEA_CHARS {
        return Err(StudioError::validation(
            "Description must be less than 1000 characters",
        ));
    }
    Ok(())
}

/// Classify an idea into an outline. Only the problem phrasing uses `rng`.
pub fn classify<R: Rng + ?Sized>(input: &ProjectIdeaInput, rng: &mut R) -> Result<ProjectOutline> {
    validate_idea(input)?;

    let idea = input.idea.to_lowercase();
    let draft = rules::fold_rules(&idea, &RULES);
    let problem = problem::random_problem_statement(&idea, rng);

    Ok(draft.finish(problem))
}

/// Async front end for [`classify`] with an artificial processing delay.
#[derive(Debug, Clone, Default)]
pub struct OutlineGenerator {
    latency: Latency,
}

impl OutlineGenerator {
    pub fn new(latency: Latency) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    /// Validate, wait out the configured delay, then classify.
    #[instrument(skip_all, fields(idea_len = input.idea.chars().count()))]
    pub async fn generate(&self, input: &ProjectIdeaInput) -> Result<ProjectOutline> {
        validate_idea(input)?;

        let delay = self.latency.sample(&mut rand::rng());
        if !delay.is_zero() {
            debug!(delay_ms = delay.as_millis() as u64, "simulating outline generation");
            tokio::time::sleep(delay).await;
        }

        let outline = classify(input, &mut rand::rng())?;

        info!(
            complexity = %outline.estimated_complexity,
            features = outline.features.len(),
            timeline = %outline.estimated_timeline,
            "project outline generated"
        );

        Ok(outline)
    }
}
