//! Placeholder substitution — pure text transforms from a render context
//! onto a template's subject and body.
//!
//! Rendering is an ordered list of named passes (base, offer, cv-link),
//! each mapping the context to a replacement table that is applied
//! globally.  Unknown or unpopulated `{snake_case}` tokens are left
//! verbatim in the output; this leniency is a documented contract, not an
//! oversight — template authors rely on unmatched tokens surviving.

use chrono::{DateTime, NaiveDate};

use crate::models::{EmailTemplate, Offer};

/// Everything the substitution passes may draw on, assembled by
/// [`crate::context::assemble`].
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub candidate_name: String,
    pub job_title: String,
    pub company_name: String,
    /// Value for the `{your_name}` token (the acting user's display name).
    pub your_name: String,
    /// Present only for Offer-stage workflows with a qualifying offer.
    pub offer: Option<Offer>,
    /// Present only for New-stage workflows rendering for a candidate
    /// still in the New stage with a linked job.
    pub cv_upload_link: Option<String>,
}

/// A rendered email ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub subject: String,
    pub body: String,
}

/// The literal token an author may place to control CV-link position.
pub const CV_LINK_TOKEN: &str = "{cv_upload_link}";

/// Render the template against the context.
pub fn render(template: &EmailTemplate, ctx: &RenderContext) -> Rendered {
    let mut table = base_pass(ctx);
    if let Some(offer) = &ctx.offer {
        table.extend(offer_pass(offer, &ctx.job_title));
    }

    let subject = apply(&template.subject, &table);
    let mut body = apply(&template.body, &table);

    if let Some(link) = &ctx.cv_upload_link {
        body = apply_cv_link(&body, link);
    }

    Rendered { subject, body }
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

fn base_pass(ctx: &RenderContext) -> Vec<(&'static str, String)> {
    vec![
        ("candidate_name", ctx.candidate_name.clone()),
        ("job_title", ctx.job_title.clone()),
        ("company_name", ctx.company_name.clone()),
        ("your_name", ctx.your_name.clone()),
    ]
}

fn offer_pass(offer: &Offer, job_title: &str) -> Vec<(&'static str, String)> {
    let position = offer
        .position_title
        .clone()
        .unwrap_or_else(|| job_title.to_string());

    vec![
        ("position_title", position),
        ("salary", format_salary(offer)),
        ("salary_amount", format_salary_amount(offer)),
        (
            "salary_currency",
            offer.salary_currency.clone().unwrap_or_else(|| "USD".into()),
        ),
        (
            "salary_period",
            period_phrase(offer.salary_period.as_deref()).to_string(),
        ),
        ("start_date", format_long_date(offer.start_date.as_deref())),
        ("expires_at", format_long_date(offer.expires_at.as_deref())),
        ("benefits", format_benefits(&offer.benefits)),
        ("benefits_list", format_benefits_list(&offer.benefits)),
        ("notes", offer.notes.clone().unwrap_or_default()),
    ]
}

/// Replace every `{key}` occurrence for every table entry, in order.
fn apply(input: &str, table: &[(&'static str, String)]) -> String {
    let mut out = input.to_string();
    for (key, value) in table {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

/// Substitute the CV-link token in place when the author wrote one;
/// otherwise append the upload section to the end of the body.  The
/// append is unconditional so every New-stage email carries the link
/// regardless of template authoring.
fn apply_cv_link(body: &str, link: &str) -> String {
    let anchor = format!("<a href=\"{link}\">{link}</a>");
    if body.contains(CV_LINK_TOKEN) {
        body.replace(CV_LINK_TOKEN, &anchor)
    } else {
        format!(
            "{body}\n\nPlease upload your CV using this secure link: {anchor}\n\
             The link expires in 30 days."
        )
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Full salary phrase, e.g. `$120,000 per year`, or `To be discussed`
/// when no amount is recorded.
fn format_salary(offer: &Offer) -> String {
    let Some(amount) = offer.salary_amount else {
        return "To be discussed".into();
    };
    format!(
        "{}{} {}",
        currency_prefix(offer.salary_currency.as_deref()),
        group_thousands(amount),
        period_phrase(offer.salary_period.as_deref()),
    )
}

fn format_salary_amount(offer: &Offer) -> String {
    match offer.salary_amount {
        Some(amount) => group_thousands(amount),
        None => "To be discussed".into(),
    }
}

fn currency_prefix(code: Option<&str>) -> String {
    match code {
        Some("USD") | None => "$".into(),
        Some("EUR") => "€".into(),
        Some("GBP") => "£".into(),
        Some("INR") => "₹".into(),
        Some(other) => format!("{other} "),
    }
}

fn period_phrase(period: Option<&str>) -> &'static str {
    match period {
        Some("monthly") => "per month",
        Some("hourly") => "per hour",
        // "yearly" is the stored default; unknown keys fall back to it.
        _ => "per year",
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        format!("-{out}")
    } else {
        out
    }
}

/// Human-readable long date, e.g. `January 15, 2024`.  Accepts `YYYY-MM-DD`
/// or RFC 3339 input; anything unparsable passes through raw, and a missing
/// value renders as `Not specified`.
fn format_long_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "Not specified".into();
    };
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%B %-d, %Y").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%B %-d, %Y").to_string();
    }
    raw.to_string()
}

fn format_benefits(benefits: &[String]) -> String {
    if benefits.is_empty() {
        "Standard benefits package".into()
    } else {
        benefits.join(", ")
    }
}

/// List variant with an "and" conjunction on the final item.
fn format_benefits_list(benefits: &[String]) -> String {
    match benefits {
        [] => "Standard benefits package".into(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [head @ .., last] => format!("{}, and {last}", head.join(", ")),
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OfferStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_template(subject: &str, body: &str) -> EmailTemplate {
        EmailTemplate {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "test".into(),
            subject: subject.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }

    fn make_ctx() -> RenderContext {
        RenderContext {
            candidate_name: "Ada Lovelace".into(),
            job_title: "Backend Engineer".into(),
            company_name: "Initech".into(),
            your_name: "Recruiter".into(),
            offer: None,
            cv_upload_link: None,
        }
    }

    fn make_offer() -> Offer {
        Offer {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            candidate_id: Uuid::new_v4(),
            status: OfferStatus::Draft,
            position_title: Some("Senior Backend Engineer".into()),
            salary_amount: Some(120_000),
            salary_currency: Some("USD".into()),
            salary_period: Some("yearly".into()),
            start_date: Some("2024-01-15".into()),
            expires_at: None,
            benefits: vec!["health insurance".into(), "401k".into(), "remote work".into()],
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn base_placeholders_replace_all_occurrences() {
        let template = make_template(
            "Hi {candidate_name}, re: {job_title}",
            "Dear {candidate_name},\n{company_name} would like to talk about {job_title}.\n— {your_name}",
        );
        let rendered = render(&template, &make_ctx());

        assert_eq!(rendered.subject, "Hi Ada Lovelace, re: Backend Engineer");
        assert_eq!(
            rendered.body,
            "Dear Ada Lovelace,\nInitech would like to talk about Backend Engineer.\n— Recruiter"
        );
    }

    #[test]
    fn unknown_tokens_are_left_verbatim() {
        let template = make_template("{mystery}", "keep {not_a_field} as-is for {candidate_name}");
        let rendered = render(&template, &make_ctx());

        assert_eq!(rendered.subject, "{mystery}");
        assert_eq!(rendered.body, "keep {not_a_field} as-is for Ada Lovelace");
    }

    #[test]
    fn offer_tokens_without_offer_context_pass_through() {
        let template = make_template("Offer: {salary}", "Starting {start_date}");
        let rendered = render(&template, &make_ctx());

        assert_eq!(rendered.subject, "Offer: {salary}");
        assert_eq!(rendered.body, "Starting {start_date}");
    }

    #[test]
    fn salary_renders_with_symbol_separators_and_period() {
        let mut ctx = make_ctx();
        ctx.offer = Some(make_offer());
        let rendered = render(&make_template("{salary}", ""), &ctx);
        assert_eq!(rendered.subject, "$120,000 per year");
    }

    #[test]
    fn missing_salary_amount_renders_to_be_discussed() {
        let mut offer = make_offer();
        offer.salary_amount = None;
        let mut ctx = make_ctx();
        ctx.offer = Some(offer);

        let rendered = render(&make_template("{salary}", "{salary_amount}"), &ctx);
        assert_eq!(rendered.subject, "To be discussed");
        assert_eq!(rendered.body, "To be discussed");
    }

    #[test]
    fn monthly_eur_salary() {
        let mut offer = make_offer();
        offer.salary_amount = Some(8_500);
        offer.salary_currency = Some("EUR".into());
        offer.salary_period = Some("monthly".into());
        let mut ctx = make_ctx();
        ctx.offer = Some(offer);

        let rendered = render(&make_template("{salary}", ""), &ctx);
        assert_eq!(rendered.subject, "€8,500 per month");
    }

    #[test]
    fn unknown_currency_falls_back_to_code_prefix() {
        let mut offer = make_offer();
        offer.salary_currency = Some("CHF".into());
        let mut ctx = make_ctx();
        ctx.offer = Some(offer);

        let rendered = render(&make_template("{salary}", ""), &ctx);
        assert_eq!(rendered.subject, "CHF 120,000 per year");
    }

    #[test]
    fn start_date_renders_long_form() {
        let mut ctx = make_ctx();
        ctx.offer = Some(make_offer());
        let rendered = render(&make_template("{start_date}", "{expires_at}"), &ctx);

        assert_eq!(rendered.subject, "January 15, 2024");
        assert_eq!(rendered.body, "Not specified");
    }

    #[test]
    fn unparsable_date_passes_through_raw() {
        let mut offer = make_offer();
        offer.start_date = Some("early spring".into());
        let mut ctx = make_ctx();
        ctx.offer = Some(offer);

        let rendered = render(&make_template("{start_date}", ""), &ctx);
        assert_eq!(rendered.subject, "early spring");
    }

    #[test]
    fn benefits_variants() {
        let mut ctx = make_ctx();
        ctx.offer = Some(make_offer());
        let rendered = render(&make_template("{benefits}", "{benefits_list}"), &ctx);

        assert_eq!(rendered.subject, "health insurance, 401k, remote work");
        assert_eq!(rendered.body, "health insurance, 401k, and remote work");
    }

    #[test]
    fn two_benefits_use_plain_conjunction() {
        let mut offer = make_offer();
        offer.benefits = vec!["health insurance".into(), "401k".into()];
        let mut ctx = make_ctx();
        ctx.offer = Some(offer);

        let rendered = render(&make_template("", "{benefits_list}"), &ctx);
        assert_eq!(rendered.body, "health insurance and 401k");
    }

    #[test]
    fn empty_benefits_render_standard_package() {
        let mut offer = make_offer();
        offer.benefits = vec![];
        let mut ctx = make_ctx();
        ctx.offer = Some(offer);

        let rendered = render(&make_template("{benefits}", "{benefits_list}"), &ctx);
        assert_eq!(rendered.subject, "Standard benefits package");
        assert_eq!(rendered.body, "Standard benefits package");
    }

    #[test]
    fn position_title_falls_back_to_job_title() {
        let mut offer = make_offer();
        offer.position_title = None;
        let mut ctx = make_ctx();
        ctx.offer = Some(offer);

        let rendered = render(&make_template("{position_title}", ""), &ctx);
        assert_eq!(rendered.subject, "Backend Engineer");
    }

    #[test]
    fn cv_link_token_is_replaced_in_place() {
        let mut ctx = make_ctx();
        ctx.cv_upload_link = Some("https://app.test/jobs/apply/abc?token=t0k".into());
        let template = make_template("Welcome", "Apply here: {cv_upload_link}\nThanks");
        let rendered = render(&template, &ctx);

        assert_eq!(
            rendered.body,
            "Apply here: <a href=\"https://app.test/jobs/apply/abc?token=t0k\">https://app.test/jobs/apply/abc?token=t0k</a>\nThanks"
        );
    }

    #[test]
    fn cv_link_is_appended_when_token_absent() {
        let link = "https://app.test/jobs/apply/abc?token=t0k";
        let mut ctx = make_ctx();
        ctx.cv_upload_link = Some(link.into());
        let template = make_template("Welcome", "Hello {candidate_name}, great to meet you.");
        let rendered = render(&template, &ctx);

        // Original content is untouched and comes first.
        assert!(rendered
            .body
            .starts_with("Hello Ada Lovelace, great to meet you."));
        // The appended section carries the link.
        assert!(rendered.body.contains("Please upload your CV"));
        assert!(rendered.body.contains(link));
    }

    #[test]
    fn cv_link_does_not_touch_subject() {
        let mut ctx = make_ctx();
        ctx.cv_upload_link = Some("https://app.test/x".into());
        let rendered = render(&make_template("{cv_upload_link}", "body"), &ctx);
        assert_eq!(rendered.subject, "{cv_upload_link}");
    }
}
