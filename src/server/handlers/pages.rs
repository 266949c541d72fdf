//! Marketing page handlers.

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use super::super::content::{find_service, IRS_REFUND_URL, SERVICES, STATE_REVENUE_SITES};
use super::super::session::MaybeUser;
use super::super::template_structs::{
    AboutTemplate, ContactTemplate, HomeTemplate, PageChrome, RefundStatusTemplate, ServiceTemplate,
    StateLink, StateRefundTemplate,
};
use super::helpers::{error_page, render, NoticeParams};

pub async fn home(MaybeUser(user): MaybeUser, Query(params): Query<NoticeParams>) -> Response {
    render(&HomeTemplate {
        page: PageChrome::new("Leo Tax Filing", user.as_ref(), params.notice),
        services: SERVICES,
    })
}

pub async fn about(MaybeUser(user): MaybeUser) -> Response {
    render(&AboutTemplate {
        page: PageChrome::new("About Us", user.as_ref(), None),
    })
}

pub async fn service(MaybeUser(user): MaybeUser, Path(slug): Path<String>) -> Response {
    match find_service(&slug) {
        Some(service) => render(&ServiceTemplate {
            page: PageChrome::new(service.title, user.as_ref(), None),
            service,
            services: SERVICES,
        }),
        None => error_page(StatusCode::NOT_FOUND, user.as_ref(), "Page not found"),
    }
}

pub async fn refund_status(MaybeUser(user): MaybeUser) -> Response {
    render(&RefundStatusTemplate {
        page: PageChrome::new("Refund Status", user.as_ref(), None),
        irs_url: IRS_REFUND_URL,
    })
}

pub async fn state_refund_status(MaybeUser(user): MaybeUser) -> Response {
    render(&StateRefundTemplate {
        page: PageChrome::new("State Refund Status", user.as_ref(), None),
        states: STATE_REVENUE_SITES
            .iter()
            .map(|&(name, url)| StateLink { name, url })
            .collect(),
    })
}

pub async fn contact(MaybeUser(user): MaybeUser, Query(params): Query<NoticeParams>) -> Response {
    render(&ContactTemplate {
        page: PageChrome::new("Contact Us", user.as_ref(), params.notice),
        name: String::new(),
        email: String::new(),
        phone: String::new(),
        message: String::new(),
    })
}

/// Contact form submission.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
    /// Checkbox; present only when ticked.
    pub agree: Option<String>,
}

/// Accept a contact message. Messages are logged, not stored.
pub async fn contact_submit(MaybeUser(user): MaybeUser, Form(form): Form<ContactForm>) -> Response {
    if form.agree.is_none() {
        return render(&ContactTemplate {
            page: PageChrome::new(
                "Contact Us",
                user.as_ref(),
                Some("Please agree to the data collection policy".to_string()),
            ),
            name: form.name,
            email: form.email,
            phone: form.phone,
            message: form.message,
        });
    }

    tracing::info!(
        "Contact message from {} <{}> ({}): {}",
        form.name.trim(),
        form.email.trim(),
        form.phone.trim(),
        form.message.trim()
    );
    render(&ContactTemplate {
        page: PageChrome::new(
            "Contact Us",
            user.as_ref(),
            Some("Message sent successfully! We'll get back to you as soon as possible.".to_string()),
        ),
        name: String::new(),
        email: String::new(),
        phone: String::new(),
        message: String::new(),
    })
}

pub async fn not_found(MaybeUser(user): MaybeUser) -> impl IntoResponse {
    error_page(StatusCode::NOT_FOUND, user.as_ref(), "Page not found")
}
