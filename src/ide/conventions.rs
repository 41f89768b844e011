//! Naming and placement conventions for generated requests.
//!
//! Everything here is static data: one [`RequestConventions`] row per
//! [`RequestKind`], one template per [`ArtifactKind`], and the pattern that
//! captures the service name from a namespace. Templates take the service as
//! `{0}`.

use once_cell::sync::Lazy;
use regex::Regex;
use smol_str::SmolStr;

use crate::base::naming::{TemplateError, format_positional, replace_suffix};

/// Captures the service segment of `Aurora.<service>...`.
static SERVICE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)Aurora\.(?P<service>\w+)").expect("valid regex"));

/// Command (state-changing) or query (read-only) request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Command,
    Query,
}

/// Table row selected by a [`RequestKind`].
#[derive(Debug)]
pub struct RequestConventions {
    pub kind: RequestKind,
    /// Suffix every request name ends with.
    pub suffix: &'static str,
    /// Replacement for `suffix` in the handler name.
    pub handler_suffix: &'static str,
    /// Generic dispatch method, `SendCommand<TRequest>`.
    pub verb: &'static str,
    /// Marker interface of the request type.
    pub interface: &'static str,
    /// Abstract base class of the handler.
    pub handler_base: &'static str,
    /// Name of the request parameter of `HandleAsync`.
    pub parameter: &'static str,
    pub title: &'static str,
    pub request: ArtifactTemplate,
    pub handler: ArtifactTemplate,
    pub handler_with_result: ArtifactTemplate,
}

/// Project, namespace, folder and using templates of one artifact kind.
#[derive(Debug)]
pub struct ArtifactTemplate {
    pub project: &'static str,
    pub namespace: &'static str,
    pub folders: &'static [&'static str],
    pub usings: &'static [&'static str],
}

pub static COMMAND: RequestConventions = RequestConventions {
    kind: RequestKind::Command,
    suffix: "Command",
    handler_suffix: "CommandHandler",
    verb: "SendCommand",
    interface: "ICommand",
    handler_base: "CommandHandler",
    parameter: "command",
    title: "Aurora: Create Command and Handler",
    request: ArtifactTemplate {
        project: "Aurora.{0}.Domain",
        namespace: "Aurora.{0}.Domain.Commands",
        folders: &["Commands"],
        usings: &["Aurora.{0}.Domain.Dtos", "Travel2Pay.Cqrs.Commands"],
    },
    handler: ArtifactTemplate {
        project: "Aurora.{0}.ApplicationService",
        namespace: "Aurora.{0}.ApplicationService.Commands",
        folders: &["Commands"],
        usings: &["Aurora.{0}.Domain.Commands", "Travel2Pay.Cqrs.Commands"],
    },
    handler_with_result: ArtifactTemplate {
        project: "Aurora.{0}.ApplicationService",
        namespace: "Aurora.{0}.ApplicationService.Commands",
        folders: &["Commands"],
        usings: &[
            "Aurora.{0}.Domain.Commands",
            "Aurora.{0}.Domain.Dtos",
            "Travel2Pay.Cqrs.Commands",
        ],
    },
};

pub static QUERY: RequestConventions = RequestConventions {
    kind: RequestKind::Query,
    suffix: "Query",
    handler_suffix: "QueryHandler",
    verb: "SendQuery",
    interface: "IQuery",
    handler_base: "QueryHandler",
    parameter: "query",
    title: "Aurora: Create Query and Handler",
    request: ArtifactTemplate {
        project: "Aurora.{0}.Domain",
        namespace: "Aurora.{0}.Domain.Queries",
        folders: &["Queries"],
        usings: &["Aurora.{0}.Domain.Dtos", "Travel2Pay.Cqrs.Queries"],
    },
    handler: ArtifactTemplate {
        project: "Aurora.{0}.ApplicationService",
        namespace: "Aurora.{0}.ApplicationService.Queries",
        folders: &["Queries"],
        usings: &[
            "Aurora.{0}.Domain.Queries",
            "Aurora.{0}.Domain.Dtos",
            "Travel2Pay.Cqrs.Queries",
        ],
    },
    handler_with_result: ArtifactTemplate {
        project: "Aurora.{0}.ApplicationService",
        namespace: "Aurora.{0}.ApplicationService.Queries",
        folders: &["Queries"],
        usings: &[
            "Aurora.{0}.Domain.Queries",
            "Aurora.{0}.Domain.Dtos",
            "Travel2Pay.Cqrs.Queries",
        ],
    },
};

pub static DTO: ArtifactTemplate = ArtifactTemplate {
    project: "Aurora.{0}.Domain",
    namespace: "Aurora.{0}.Domain.Dtos",
    folders: &["Dtos"],
    usings: &[],
};

impl RequestKind {
    pub fn conventions(self) -> &'static RequestConventions {
        match self {
            RequestKind::Command => &COMMAND,
            RequestKind::Query => &QUERY,
        }
    }

    /// Kind whose suffix `name` ends with.
    pub fn from_request_name(name: &str) -> Option<Self> {
        [RequestKind::Command, RequestKind::Query]
            .into_iter()
            .find(|kind| name.ends_with(kind.conventions().suffix))
    }

    /// Kind dispatched by a generic verb (`SendCommand`, `SendQuery`).
    pub fn from_verb(verb: &str) -> Option<Self> {
        [RequestKind::Command, RequestKind::Query]
            .into_iter()
            .find(|kind| kind.conventions().verb == verb)
    }

    /// Whether `name` carries this kind's suffix.
    pub fn matches(self, name: &str) -> bool {
        name.ends_with(self.conventions().suffix)
    }

    /// `CreateInvoiceCommand` → `CreateInvoiceCommandHandler`.
    ///
    /// Only the trailing suffix is replaced.
    pub fn handler_name(self, request: &str) -> Option<String> {
        let row = self.conventions();
        replace_suffix(request, row.suffix, row.handler_suffix)
    }
}

/// Generated artifact shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Request(RequestKind),
    Handler(RequestKind),
    HandlerWithResult(RequestKind),
    Dto,
}

impl ArtifactKind {
    pub fn template(self) -> &'static ArtifactTemplate {
        match self {
            ArtifactKind::Request(kind) => &kind.conventions().request,
            ArtifactKind::Handler(kind) => &kind.conventions().handler,
            ArtifactKind::HandlerWithResult(kind) => &kind.conventions().handler_with_result,
            ArtifactKind::Dto => &DTO,
        }
    }
}

/// An [`ArtifactTemplate`] with the service substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub project: SmolStr,
    pub namespace: String,
    pub folders: Vec<SmolStr>,
    pub usings: Vec<String>,
}

impl ArtifactTemplate {
    /// Substitute `service` into every template of this row.
    pub fn resolve(&self, service: &str) -> Result<ResolvedTemplate, TemplateError> {
        let args = [service];
        Ok(ResolvedTemplate {
            project: format_positional(self.project, &args)?.into(),
            namespace: format_positional(self.namespace, &args)?,
            folders: self.folders.iter().map(|f| SmolStr::new(f)).collect(),
            usings: self
                .usings
                .iter()
                .map(|u| format_positional(u, &args))
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Service name captured from a namespace, `Billing` for
/// `Aurora.Billing.Domain`. Matching ignores case.
pub fn resolve_service(namespace: &str) -> Option<SmolStr> {
    SERVICE_PATTERN
        .captures(namespace)
        .and_then(|captures| captures.name("service"))
        .map(|m| SmolStr::new(m.as_str()))
        .filter(|service| !service.is_empty())
}
