// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message composition for the Fairgate dispatcher.
//!
//! Fills one of the closed set of templates ([`MessageTemplate`]) with
//! attendee and event fields. Rendering is plain HTML string interpolation;
//! attendee-supplied fields are escaped first and no executable content is
//! ever evaluated from them.

pub mod escape;
pub mod link;

use tracing::trace;

use escape::escape_html;
use fairgate_core::{Attendee, EventContext, FairgateError, MessageTemplate, OutboundEmail};
use fairgate_credential::Credential;

/// Composes the per-attendee templates (`CheckInCredential`, `QuizOnly`).
///
/// `credential` is required for `CheckInCredential` and ignored otherwise.
/// Fails with [`FairgateError::MissingField`] when a required field is empty.
pub fn compose_for_attendee(
    template: MessageTemplate,
    attendee: &Attendee,
    context: &EventContext,
    credential: Option<&Credential>,
) -> Result<OutboundEmail, FairgateError> {
    match template {
        MessageTemplate::CheckInCredential => {
            let credential = credential.ok_or_else(|| missing(template, "credential"))?;
            compose_check_in(attendee, context, credential)
        }
        MessageTemplate::QuizOnly => compose_quiz_only(attendee, context),
        MessageTemplate::VendorRollup => Err(FairgateError::Internal(
            "vendor-rollup is composed per batch, not per attendee".into(),
        )),
    }
}

/// Credential image plus a deep link into the check-in/quiz flow.
pub fn compose_check_in(
    attendee: &Attendee,
    context: &EventContext,
    credential: &Credential,
) -> Result<OutboundEmail, FairgateError> {
    let template = MessageTemplate::CheckInCredential;
    require_attendee_fields(template, attendee)?;
    require_context_fields(template, context)?;

    let deep_link = link::check_in_link(
        &context.check_in_base_url,
        &attendee.id,
        &attendee.booth_id,
    );
    let html_body = format!(
        "<html><body>\
         <p>Hi {name},</p>\
         <p>Here is your check-in pass for <b>{booth}</b> at {bazaar}. \
         Show this code at the booth:</p>\
         <p><img src=\"{qr}\" alt=\"check-in code\" width=\"240\" height=\"240\"></p>\
         <p>Or check in directly: <a href=\"{link}\">{link}</a></p>\
         </body></html>",
        name = escape_html(&attendee.name),
        booth = escape_html(&context.booth_name),
        bazaar = escape_html(&context.bazaar_name),
        qr = credential.qr_data_uri,
        link = escape_html(&deep_link),
    );

    trace!(recipient = %attendee.email, template = %template, "message composed");
    Ok(OutboundEmail {
        recipient: attendee.email.clone(),
        subject: format!("Your check-in pass for {}", context.bazaar_name),
        html_body,
    })
}

/// Deep link only, no credential.
pub fn compose_quiz_only(
    attendee: &Attendee,
    context: &EventContext,
) -> Result<OutboundEmail, FairgateError> {
    let template = MessageTemplate::QuizOnly;
    require_attendee_fields(template, attendee)?;
    require_context_fields(template, context)?;

    let deep_link = link::check_in_link(
        &context.check_in_base_url,
        &attendee.id,
        &attendee.booth_id,
    );
    let html_body = format!(
        "<html><body>\
         <p>Hi {name},</p>\
         <p>Take the <b>{booth}</b> quiz at {bazaar}:</p>\
         <p><a href=\"{link}\">{link}</a></p>\
         </body></html>",
        name = escape_html(&attendee.name),
        booth = escape_html(&context.booth_name),
        bazaar = escape_html(&context.bazaar_name),
        link = escape_html(&deep_link),
    );

    trace!(recipient = %attendee.email, template = %template, "message composed");
    Ok(OutboundEmail {
        recipient: attendee.email.clone(),
        subject: format!("{} quiz at {}", context.booth_name, context.bazaar_name),
        html_body,
    })
}

/// One message to the vendor carrying every attendee's credential.
///
/// Zero attendees is a hard error, not a silent skip: an empty roll-up mail
/// would tell the vendor nothing and hide a caller bug.
pub fn compose_vendor_rollup(
    entries: &[(Attendee, Credential)],
    context: &EventContext,
) -> Result<OutboundEmail, FairgateError> {
    let template = MessageTemplate::VendorRollup;
    require_context_fields(template, context)?;
    let vendor_email = context
        .vendor_email
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| missing(template, "vendor_email"))?;
    if entries.is_empty() {
        return Err(missing(template, "attendees"));
    }

    let mut items = String::new();
    for (attendee, credential) in entries {
        items.push_str(&format!(
            "<li><p>{name} &lt;{email}&gt;</p>\
             <p><img src=\"{qr}\" alt=\"check-in code\" width=\"240\" height=\"240\"></p></li>",
            name = escape_html(&attendee.name),
            email = escape_html(&attendee.email),
            qr = credential.qr_data_uri,
        ));
    }

    let html_body = format!(
        "<html><body>\
         <p>Check-in passes for <b>{booth}</b> at {bazaar} ({count} attendees):</p>\
         <ol>{items}</ol>\
         </body></html>",
        booth = escape_html(&context.booth_name),
        bazaar = escape_html(&context.bazaar_name),
        count = entries.len(),
    );

    trace!(recipient = %vendor_email, count = entries.len(), "roll-up composed");
    Ok(OutboundEmail {
        recipient: vendor_email.to_string(),
        subject: format!(
            "{} check-in passes for {}",
            entries.len(),
            context.booth_name
        ),
        html_body,
    })
}

fn require_attendee_fields(
    template: MessageTemplate,
    attendee: &Attendee,
) -> Result<(), FairgateError> {
    require(template, "email", &attendee.email)?;
    require(template, "id", &attendee.id)?;
    require(template, "booth_id", &attendee.booth_id)
}

fn require_context_fields(
    template: MessageTemplate,
    context: &EventContext,
) -> Result<(), FairgateError> {
    require(template, "booth_name", &context.booth_name)?;
    require(template, "bazaar_name", &context.bazaar_name)?;
    require(template, "check_in_base_url", &context.check_in_base_url)
}

fn require(template: MessageTemplate, field: &str, value: &str) -> Result<(), FairgateError> {
    if value.trim().is_empty() {
        Err(missing(template, field))
    } else {
        Ok(())
    }
}

fn missing(template: MessageTemplate, field: &str) -> FairgateError {
    FairgateError::MissingField {
        template: template.to_string(),
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairgate_credential::CredentialEncoder;

    fn attendee() -> Attendee {
        Attendee {
            id: "v-42".into(),
            name: "Ada Lovelace".into(),
            email: "ada@x.com".into(),
            booth_id: "b-7".into(),
        }
    }

    fn context() -> EventContext {
        EventContext {
            booth_name: "B1".into(),
            bazaar_name: "Spring Fair".into(),
            check_in_base_url: "https://fair.example/checkin".into(),
            vendor_email: Some("vendor@x.com".into()),
        }
    }

    fn credential() -> Credential {
        CredentialEncoder::new()
            .encode("ada@x.com", "B1", "Spring Fair")
            .unwrap()
    }

    #[test]
    fn check_in_embeds_credential_and_deep_link() {
        let email = compose_check_in(&attendee(), &context(), &credential()).unwrap();
        assert_eq!(email.recipient, "ada@x.com");
        assert!(email.subject.contains("Spring Fair"));
        assert!(email.html_body.contains("data:image/svg+xml;base64,"));
        assert!(email
            .html_body
            .contains("https://fair.example/checkin?visitorId=v-42&amp;boothId=b-7"));
    }

    #[test]
    fn quiz_only_has_link_but_no_credential() {
        let email = compose_quiz_only(&attendee(), &context()).unwrap();
        assert!(email.html_body.contains("visitorId=v-42"));
        assert!(!email.html_body.contains("data:image/svg+xml"));
    }

    #[test]
    fn attendee_fields_are_html_escaped() {
        let mut hostile = attendee();
        hostile.name = "<script>alert('x')</script>".into();
        let email = compose_check_in(&hostile, &context(), &credential()).unwrap();
        assert!(!email.html_body.contains("<script>"));
        assert!(email.html_body.contains("&lt;script&gt;"));
    }

    #[test]
    fn empty_email_is_missing_field() {
        let mut bad = attendee();
        bad.email = "  ".into();
        let err = compose_quiz_only(&bad, &context()).unwrap_err();
        assert!(
            matches!(err, FairgateError::MissingField { ref field, .. } if field == "email")
        );
    }

    #[test]
    fn empty_context_field_is_missing_field() {
        let mut bad = context();
        bad.check_in_base_url = String::new();
        let err = compose_check_in(&attendee(), &bad, &credential()).unwrap_err();
        assert!(matches!(
            err,
            FairgateError::MissingField { ref field, .. } if field == "check_in_base_url"
        ));
    }

    #[test]
    fn rollup_requires_vendor_email() {
        let mut ctx = context();
        ctx.vendor_email = None;
        let entries = vec![(attendee(), credential())];
        let err = compose_vendor_rollup(&entries, &ctx).unwrap_err();
        assert!(matches!(
            err,
            FairgateError::MissingField { ref field, .. } if field == "vendor_email"
        ));
    }

    #[test]
    fn rollup_rejects_empty_batch() {
        let err = compose_vendor_rollup(&[], &context()).unwrap_err();
        assert!(matches!(
            err,
            FairgateError::MissingField { ref field, .. } if field == "attendees"
        ));
    }

    #[test]
    fn rollup_lists_every_attendee() {
        let mut second = attendee();
        second.name = "Grace Hopper".into();
        second.email = "grace@x.com".into();
        let entries = vec![(attendee(), credential()), (second, credential())];

        let email = compose_vendor_rollup(&entries, &context()).unwrap();
        assert_eq!(email.recipient, "vendor@x.com");
        assert!(email.subject.starts_with("2 check-in passes"));
        assert!(email.html_body.contains("Ada Lovelace"));
        assert!(email.html_body.contains("Grace Hopper"));
    }

    #[test]
    fn compose_for_attendee_dispatches_by_template() {
        let cred = credential();
        let with_cred = compose_for_attendee(
            MessageTemplate::CheckInCredential,
            &attendee(),
            &context(),
            Some(&cred),
        )
        .unwrap();
        assert!(with_cred.html_body.contains("data:image/svg+xml"));

        let quiz =
            compose_for_attendee(MessageTemplate::QuizOnly, &attendee(), &context(), None)
                .unwrap();
        assert!(!quiz.html_body.contains("data:image/svg+xml"));

        let missing = compose_for_attendee(
            MessageTemplate::CheckInCredential,
            &attendee(),
            &context(),
            None,
        )
        .unwrap_err();
        assert!(matches!(missing, FairgateError::MissingField { .. }));
    }
}
