//! Keyword rule table and the fold that turns matched rules into an outline.
//!
//! Each [`Rule`] pairs a keyword pattern with the features, stack entries
//! and considerations it contributes. Rules are applied in table order to a
//! baseline [`Draft`]; later tier-setting rules override earlier ones.

use std::sync::LazyLock;

use regex::Regex;
use studio_shared::{Complexity, ProjectOutline};

/// Display caps applied to the final outline.
pub const MAX_FEATURES: usize = 6;
pub const MAX_STACK: usize = 8;
pub const MAX_CONSIDERATIONS: usize = 4;

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// Keyword category a rule detects. Categories are not mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Commerce,
    Ai,
    Dashboard,
    Social,
    Auth,
}

/// Complexity tier and timeline a rule imposes when it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub complexity: Complexity,
    pub timeline: &'static str,
}

/// One (predicate, effect) entry of the classifier.
#[derive(Debug)]
pub struct Rule {
    pub category: Category,
    pattern: Regex,
    pub features: &'static [&'static str],
    pub stack: &'static [&'static str],
    pub considerations: &'static [&'static str],
    pub tier: Option<Tier>,
}

impl Rule {
    /// Whether the lower-cased idea text triggers this rule.
    pub fn matches(&self, idea: &str) -> bool {
        self.pattern.is_match(idea)
    }

    /// Produce the draft that results from applying this rule to `draft`.
    pub fn apply(&self, draft: Draft) -> Draft {
        let Draft {
            mut features,
            mut stack,
            mut considerations,
            complexity,
            timeline,
        } = draft;

        features.extend_from_slice(self.features);
        stack.extend_from_slice(self.stack);
        considerations.extend_from_slice(self.considerations);

        let (complexity, timeline) = match self.tier {
            Some(tier) => (tier.complexity, tier.timeline),
            None => (complexity, timeline),
        };

        Draft {
            features,
            stack,
            considerations,
            complexity,
            timeline,
        }
    }
}

fn keywords(pattern: &str) -> Regex {
    Regex::new(pattern).expect("keyword regex")
}

/// Built-in rules, in application order.
pub static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule {
            category: Category::Commerce,
            pattern: keywords(r"shop|store|cart|product|payment|checkout"),
            features: &[
                "Product Catalog",
                "Shopping Cart",
                "Payment Integration",
                "Order Management",
            ],
            stack: &["Stripe/PayPal", "Database (PostgreSQL)", "Redis Cache"],
            considerations: &["PCI Compliance", "Inventory management", "Payment security"],
            tier: Some(Tier {
                complexity: Complexity::Complex,
                timeline: "8-12 weeks",
            }),
        },
        Rule {
            category: Category::Ai,
            pattern: keywords(r"ai|artificial intelligence|machine learning|llm|gpt|chatbot"),
            features: &[
                "AI Integration",
                "Natural Language Processing",
                "Model Training Interface",
            ],
            stack: &["OpenAI API", "Vector Database", "Python/FastAPI"],
            considerations: &["API rate limiting", "Cost optimization", "Model accuracy"],
            tier: Some(Tier {
                complexity: Complexity::Complex,
                timeline: "6-10 weeks",
            }),
        },
        Rule {
            category: Category::Dashboard,
            pattern: keywords(r"dashboard|analytics|data|chart|report|metric"),
            features: &[
                "Data Visualization",
                "Real-time Updates",
                "Export Functionality",
            ],
            stack: &["Chart.js/D3.js", "WebSocket", "Database Analytics"],
            considerations: &["Data security", "Real-time performance", "Scalable queries"],
            tier: Some(Tier {
                complexity: Complexity::Moderate,
                timeline: "4-8 weeks",
            }),
        },
        Rule {
            category: Category::Social,
            pattern: keywords(r"social|community|user|profile|feed|post"),
            features: &[
                "User Profiles",
                "Social Features",
                "Content Management",
                "Notification System",
            ],
            stack: &["Authentication", "File Upload", "Real-time Chat"],
            considerations: &["Content moderation", "Privacy controls", "Scalability"],
            tier: Some(Tier {
                complexity: Complexity::Complex,
                timeline: "8-14 weeks",
            }),
        },
        Rule {
            category: Category::Auth,
            pattern: keywords(r"auth|login|user|account|signup"),
            features: &[
                "Authentication System",
                "User Management",
                "Role-based Access",
            ],
            stack: &["NextAuth.js", "Database", "Session Management"],
            considerations: &["Security best practices", "GDPR compliance"],
            tier: None,
        },
    ]
});

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// Untruncated outline under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub features: Vec<&'static str>,
    pub stack: Vec<&'static str>,
    pub considerations: Vec<&'static str>,
    pub complexity: Complexity,
    pub timeline: &'static str,
}

impl Draft {
    /// Outline for an idea no rule matches.
    pub fn baseline() -> Self {
        Self {
            features: vec!["User Interface", "Responsive Design"],
            stack: vec!["Next.js", "TypeScript", "Tailwind CSS"],
            considerations: vec!["Performance optimization", "SEO considerations"],
            complexity: Complexity::Simple,
            timeline: "2-4 weeks",
        }
    }

    /// Settle the final tier and cap the lists for display.
    ///
    /// The feature-count tier is computed on the full accumulated list, before
    /// truncation, and takes precedence over the category tier.
    pub fn finish(self, problem: String) -> ProjectOutline {
        let complexity =
            Complexity::from_feature_count(self.features.len()).unwrap_or(self.complexity);

        ProjectOutline {
            problem,
            features: truncated(&self.features, MAX_FEATURES),
            suggested_stack: truncated(&self.stack, MAX_STACK),
            estimated_complexity: complexity,
            estimated_timeline: self.timeline.to_string(),
            key_considerations: truncated(&self.considerations, MAX_CONSIDERATIONS),
        }
    }
}

fn truncated(items: &[&str], cap: usize) -> Vec<String> {
    items.iter().take(cap).map(|s| s.to_string()).collect()
}

/// Fold every matching rule, in order, over the baseline draft.
///
/// `idea` must already be lower-cased.
pub fn fold_rules(idea: &str, rules: &[Rule]) -> Draft {
    rules
        .iter()
        .filter(|rule| rule.matches(idea))
        .fold(Draft::baseline(), |draft, rule| rule.apply(draft))
}

/// Categories of the built-in rules that match `idea` (lower-cased).
pub fn matched_categories(idea: &str) -> Vec<Category> {
    RULES
        .iter()
        .filter(|rule| rule.matches(idea))
        .map(|rule| rule.category)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(category: Category) -> &'static Rule {
        RULES
            .iter()
            .find(|r| r.category == category)
            .expect("rule present")
    }

    #[test]
    fn table_order_is_stable() {
        let order: Vec<Category> = RULES.iter().map(|r| r.category).collect();
        assert_eq!(
            order,
            vec![
                Category::Commerce,
                Category::Ai,
                Category::Dashboard,
                Category::Social,
                Category::Auth,
            ]
        );
    }

    #[test]
    fn each_rule_matches_its_keywords() {
        assert!(rule(Category::Commerce).matches("an online store"));
        assert!(rule(Category::Ai).matches("a gpt powered assistant"));
        assert!(rule(Category::Dashboard).matches("weekly report builder"));
        assert!(rule(Category::Social).matches("a community forum"));
        assert!(rule(Category::Auth).matches("signup flow"));
        assert!(!rule(Category::Commerce).matches("a simple website"));
    }

    #[test]
    fn user_keyword_triggers_social_and_auth() {
        let categories = matched_categories("portal for every user");
        assert_eq!(categories, vec![Category::Social, Category::Auth]);
    }

    #[test]
    fn ai_pattern_matches_inside_words() {
        // "ai" is a plain substring pattern, so "email" counts.
        assert!(matched_categories("an email newsletter tool").contains(&Category::Ai));
    }

    #[test]
    fn apply_appends_and_sets_tier() {
        let draft = rule(Category::Dashboard).apply(Draft::baseline());
        assert_eq!(draft.features.len(), 5);
        assert_eq!(draft.features[2], "Data Visualization");
        assert_eq!(draft.stack[3], "Chart.js/D3.js");
        assert_eq!(draft.complexity, Complexity::Moderate);
        assert_eq!(draft.timeline, "4-8 weeks");
    }

    #[test]
    fn auth_rule_keeps_previous_tier() {
        let draft = rule(Category::Commerce).apply(Draft::baseline());
        let draft = rule(Category::Auth).apply(draft);
        assert_eq!(draft.complexity, Complexity::Complex);
        assert_eq!(draft.timeline, "8-12 weeks");
        assert_eq!(draft.features.len(), 9);
    }

    #[test]
    fn later_rules_override_timeline() {
        let draft = fold_rules("store with a sales dashboard", &RULES);
        assert_eq!(draft.timeline, "4-8 weeks");
        assert_eq!(draft.complexity, Complexity::Moderate);
        // 2 + 4 + 3 features accumulated before truncation.
        assert_eq!(draft.features.len(), 9);
    }

    #[test]
    fn no_match_keeps_baseline() {
        assert_eq!(fold_rules("a simple website", &RULES), Draft::baseline());
    }

    #[test]
    fn finish_recomputes_tier_from_full_feature_count() {
        // Dashboard alone sets Moderate with 5 features; count also says Moderate.
        let outline = fold_rules("analytics", &RULES).finish(String::new());
        assert_eq!(outline.estimated_complexity, Complexity::Moderate);

        // Commerce + dashboard: 9 features before truncation → Enterprise,
        // even though only 6 survive the cap.
        let outline = fold_rules("store with a sales dashboard", &RULES).finish(String::new());
        assert_eq!(outline.estimated_complexity, Complexity::Enterprise);
        assert_eq!(outline.features.len(), MAX_FEATURES);
    }

    #[test]
    fn finish_can_lower_category_tier() {
        // AI sets Complex, but 5 features only justify Moderate.
        let outline = fold_rules("a chatbot", &RULES).finish(String::new());
        assert_eq!(outline.estimated_complexity, Complexity::Moderate);
        assert_eq!(outline.estimated_timeline, "6-10 weeks");
    }

    #[test]
    fn finish_caps_every_list() {
        let outline = fold_rules(
            "social shop with ai chatbot, analytics dashboard and user login",
            &RULES,
        )
        .finish(String::new());
        assert_eq!(outline.features.len(), MAX_FEATURES);
        assert_eq!(outline.suggested_stack.len(), MAX_STACK);
        assert_eq!(outline.key_considerations.len(), MAX_CONSIDERATIONS);
        assert_eq!(outline.features[0], "User Interface");
        assert_eq!(outline.key_considerations[2], "PCI Compliance");
    }
}
