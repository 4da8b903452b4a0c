//! Problem statement phrasing.

use rand::Rng;

/// `(prefix, leading words of the idea, suffix)`.
const TEMPLATES: [(&str, usize, &str); 4] = [
    ("Building a solution that addresses the core challenge of ", 5, "..."),
    ("Creating a platform to streamline and enhance ", 4, " processes."),
    ("Developing a system that solves key pain points in ", 6, "."),
    ("Implementing a digital solution for ", 5, " optimization."),
];

pub const TEMPLATE_COUNT: usize = TEMPLATES.len();

/// Render template `index` (wrapped into range) around the idea's first words.
pub fn problem_statement(idea: &str, index: usize) -> String {
    let (prefix, words, suffix) = TEMPLATES[index % TEMPLATE_COUNT];
    let lead = idea.split(' ').take(words).collect::<Vec<_>>().join(" ");
    format!("{prefix}{lead}{suffix}")
}

/// Render a randomly chosen template.
pub fn random_problem_statement<R: Rng + ?Sized>(idea: &str, rng: &mut R) -> String {
    problem_statement(idea, rng.random_range(0..TEMPLATE_COUNT))
}
