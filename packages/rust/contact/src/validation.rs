//! Contact form schema validation.
//!
//! Works on the raw JSON body so that missing fields and wrong types become
//! field-level errors instead of a deserialization failure. Every violated
//! rule is reported, in schema field order.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use studio_shared::{Budget, ContactSubmission, FieldError, Result, StudioError, Timeline};

/// Letters and whitespace only.
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("name regex"));

/// Local part, `@`, dotted domain ending in a 2+ letter TLD.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("email regex")
});

const REQUIRED: &str = "Required";

/// Whether `email` has the shape of a deliverable address.
pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_RE.is_match(email)
}

/// Validate a raw contact form body and build the typed submission.
pub fn validate_submission(body: &Value) -> Result<ContactSubmission> {
    let Some(object) = body.as_object() else {
        return Err(StudioError::invalid_fields(vec![FieldError::new(
            "",
            format!("Expected object, received {}", type_name(body)),
        )]));
    };

    let mut form = FormReader::new(object);

    let name = form.required_string("name");
    if let Some(name) = name {
        form.min_chars("name", name, 2, "Name must be at least 2 characters");
        form.max_chars("name", name, 50, "Name must be less than 50 characters");
        if !NAME_RE.is_match(name) {
            form.fail("name", "Name can only contain letters and spaces");
        }
    }

    let email = form.required_string("email");
    if let Some(email) = email {
        if !is_valid_email(email) {
            form.fail("email", "Please enter a valid email address");
        }
        form.min_chars("email", email, 5, "Email must be at least 5 characters");
        form.max_chars("email", email, 100, "Email must be less than 100 characters");
    }

    let company = form.optional_string("company");
    if let Some(company) = company {
        form.max_chars(
            "company",
            company,
            100,
            "Company name must be less than 100 characters",
        );
    }

    let budget: Option<Budget> = form.choice("budget", "Please select a budget range");
    let timeline: Option<Timeline> = form.choice("timeline", "Please select a timeline");

    let project_goals = form.required_string("projectGoals");
    if let Some(goals) = project_goals {
        form.min_chars(
            "projectGoals",
            goals,
            20,
            "Please provide more details about your project goals (at least 20 characters)",
        );
        form.max_chars(
            "projectGoals",
            goals,
            2000,
            "Project description must be less than 2000 characters",
        );
    }

    let needs_ai = form.flag("needsAI");

    let referral_source = form.optional_string("referralSource");
    if let Some(source) = referral_source {
        form.max_chars(
            "referralSource",
            source,
            100,
            "Referral source must be less than 100 characters",
        );
    }

    match (name, email, budget, timeline, project_goals) {
        (Some(name), Some(email), Some(budget), Some(timeline), Some(project_goals))
            if form.errors.is_empty() =>
        {
            Ok(ContactSubmission {
                name: name.to_string(),
                email: email.to_string(),
                company: company.map(str::to_string),
                budget,
                timeline,
                project_goals: project_goals.to_string(),
                needs_ai,
                referral_source: referral_source.map(str::to_string),
            })
        }
        _ => Err(StudioError::invalid_fields(form.errors)),
    }
}

// ---------------------------------------------------------------------------
// Field reader
// ---------------------------------------------------------------------------

/// Pulls typed fields out of a JSON object, collecting violations.
struct FormReader<'a> {
    object: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> FormReader<'a> {
    fn new(object: &'a Map<String, Value>) -> Self {
        Self {
            object,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    fn required_string(&mut self, field: &str) -> Option<&'a str> {
        match self.object.get(field) {
            None => {
                self.fail(field, REQUIRED);
                None
            }
            Some(Value::String(s)) => Some(s.as_str()),
            Some(other) => {
                self.fail(field, expected("string", other));
                None
            }
        }
    }

    /// Absent and `null` both mean "not provided".
    fn optional_string(&mut self, field: &str) -> Option<&'a str> {
        match self.object.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.as_str()),
            Some(other) => {
                self.fail(field, expected("string", other));
                None
            }
        }
    }

    /// One of a fixed set of wire values; any other input gets `message`.
    fn choice<T: std::str::FromStr>(&mut self, field: &str, message: &str) -> Option<T> {
        let parsed = self
            .object
            .get(field)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok());
        if parsed.is_none() {
            self.fail(field, message);
        }
        parsed
    }

    /// Boolean defaulting to `false` when absent.
    fn flag(&mut self, field: &str) -> bool {
        match self.object.get(field) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                self.fail(field, expected("boolean", other));
                false
            }
        }
    }

    fn min_chars(&mut self, field: &str, value: &str, min: usize, message: &str) {
        if value.chars().count() < min {
            self.fail(field, message);
        }
    }

    fn max_chars(&mut self, field: &str, value: &str, max: usize, message: &str) {
        if value.chars().count() > max {
            self.fail(field, message);
        }
    }
}

fn expected(kind: &str, got: &Value) -> String {
    format!("Expected {kind}, received {}", type_name(got))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "name": "Al",
            "email": "al@example.com",
            "budget": "10k-25k",
            "timeline": "2-3-months",
            "projectGoals": "x".repeat(20),
        })
    }

    fn fields(err: &StudioError) -> Vec<(&str, &str)> {
        err.field_errors()
            .iter()
            .map(|e| (e.field.as_str(), e.message.as_str()))
            .collect()
    }

    #[test]
    fn minimum_lengths_pass() {
        let form = validate_submission(&valid_body()).expect("valid");
        assert_eq!(form.name, "Al");
        assert_eq!(form.project_goals.len(), 20);
        assert!(!form.needs_ai);
        assert_eq!(form.budget, Budget::From10kTo25k);
        assert_eq!(form.timeline, Timeline::TwoToThreeMonths);
        assert_eq!(form.company, None);
    }

    #[test]
    fn project_goals_one_short() {
        let mut body = valid_body();
        body["projectGoals"] = json!("x".repeat(19));
        let err = validate_submission(&body).unwrap_err();
        assert_eq!(
            fields(&err),
            vec![(
                "projectGoals",
                "Please provide more details about your project goals (at least 20 characters)"
            )]
        );
    }

    #[test]
    fn project_goals_upper_bound() {
        let mut body = valid_body();
        body["projectGoals"] = json!("x".repeat(2000));
        assert!(validate_submission(&body).is_ok());

        body["projectGoals"] = json!("x".repeat(2001));
        let err = validate_submission(&body).unwrap_err();
        assert_eq!(err.field_errors()[0].field, "projectGoals");
    }

    #[test]
    fn name_rules_accumulate() {
        let mut body = valid_body();
        body["name"] = json!("A1");
        let err = validate_submission(&body).unwrap_err();
        assert_eq!(
            fields(&err),
            vec![("name", "Name can only contain letters and spaces")]
        );

        body["name"] = json!("");
        let err = validate_submission(&body).unwrap_err();
        assert_eq!(
            fields(&err),
            vec![
                ("name", "Name must be at least 2 characters"),
                ("name", "Name can only contain letters and spaces"),
            ]
        );

        body["name"] = json!("A".repeat(51));
        let err = validate_submission(&body).unwrap_err();
        assert_eq!(fields(&err), vec![("name", "Name must be less than 50 characters")]);
    }

    #[test]
    fn email_rules() {
        for bad in ["not-an-email", ".al@example.com", "al..b@example.com", "al@example"] {
            let mut body = valid_body();
            body["email"] = json!(bad);
            let err = validate_submission(&body).unwrap_err();
            assert_eq!(err.field_errors()[0].field, "email", "{bad}");
            assert_eq!(
                err.field_errors()[0].message,
                "Please enter a valid email address"
            );
        }

        assert!(is_valid_email("first.last+tag@sub.example.co"));

        let mut body = valid_body();
        body["email"] = json!(format!("{}@example.com", "a".repeat(95)));
        let err = validate_submission(&body).unwrap_err();
        assert_eq!(
            fields(&err),
            vec![("email", "Email must be less than 100 characters")]
        );
    }

    #[test]
    fn enum_fields_reject_unknown_and_missing() {
        let mut body = valid_body();
        body["budget"] = json!("a-million");
        body.as_object_mut().expect("object").remove("timeline");
        let err = validate_submission(&body).unwrap_err();
        assert_eq!(
            fields(&err),
            vec![
                ("budget", "Please select a budget range"),
                ("timeline", "Please select a timeline"),
            ]
        );
    }

    #[test]
    fn missing_and_mistyped_fields() {
        let body = json!({
            "email": 42,
            "budget": "not-sure",
            "timeline": "flexible",
            "needsAI": "yes",
        });
        let err = validate_submission(&body).unwrap_err();
        assert_eq!(
            fields(&err),
            vec![
                ("name", "Required"),
                ("email", "Expected string, received number"),
                ("projectGoals", "Required"),
                ("needsAI", "Expected boolean, received string"),
            ]
        );
    }

    #[test]
    fn optional_fields() {
        let mut body = valid_body();
        body["company"] = json!("Acme Corp");
        body["referralSource"] = Value::Null;
        body["needsAI"] = json!(true);
        let form = validate_submission(&body).expect("valid");
        assert_eq!(form.company.as_deref(), Some("Acme Corp"));
        assert_eq!(form.referral_source, None);
        assert!(form.needs_ai);

        body["company"] = json!("c".repeat(101));
        body["referralSource"] = json!("r".repeat(101));
        let err = validate_submission(&body).unwrap_err();
        assert_eq!(
            fields(&err),
            vec![
                ("company", "Company name must be less than 100 characters"),
                ("referralSource", "Referral source must be less than 100 characters"),
            ]
        );
    }

    #[test]
    fn non_object_body() {
        let err = validate_submission(&json!(["name"])).unwrap_err();
        assert_eq!(fields(&err), vec![("", "Expected object, received array")]);
    }
}
