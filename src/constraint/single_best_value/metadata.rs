//! Property metadata: the URL formatter and the recognized separators.

use crate::config::CheckerConfig;
use crate::constraint::ConstraintKind;
use crate::error::QueryResult;
use crate::property::PropertyId;
use crate::query::results::column;
use crate::query::{QueryService, ResultFormat, Solution, parse_solutions};

/// Placeholder replaced by the identifier value in formatter URLs.
pub const FORMATTER_PLACEHOLDER: &str = "$1";

/// "formatter URL"
const FORMATTER_URL: &str = "P1630";
/// "property constraint"
const PROPERTY_CONSTRAINT: &str = "P2302";
/// "separator" qualifier on a constraint statement
const SEPARATOR: &str = "P4155";

/// Template turning an identifier value into an external link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    template: String,
}

impl Formatter {
    /// Formatter that renders values unchanged.
    pub fn identity() -> Self {
        Self::new(FORMATTER_PLACEHOLDER)
    }

    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn is_identity(&self) -> bool {
        self.template == FORMATTER_PLACEHOLDER
    }

    /// Substitute `value` for every placeholder in the template.
    pub fn render(&self, value: &str) -> String {
        self.template.replace(FORMATTER_PLACEHOLDER, value)
    }

    /// Wikitext external link with the raw value as link text.
    pub fn link(&self, value: &str) -> String {
        format!("[{} {value}]", self.render(value))
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::identity()
    }
}

/// Metadata resolved once at the start of a check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
    pub formatter: Formatter,
    pub separators: Vec<PropertyId>,
}

/// Lookup of every formatter URL declared on `property`.
pub fn formatter_query(property: &PropertyId) -> String {
    format!(
        "SELECT DISTINCT ?formatter WHERE {{\n  wd:{property} wdt:{FORMATTER_URL} ?formatter\n}}"
    )
}

/// Lookup of the separators declared on the `kind` constraint of `property`.
pub fn separator_query(property: &PropertyId, kind: ConstraintKind) -> String {
    format!(
        "SELECT DISTINCT ?separator WHERE {{\n  wd:{property} p:{PROPERTY_CONSTRAINT} \
         [ ps:{PROPERTY_CONSTRAINT} wd:{item}; pq:{SEPARATOR} ?separator ] .\n}}",
        item = kind.item()
    )
}

/// Resolve formatter and separators for `property`.
///
/// Two queries are issued. Unusable response bodies degrade to the identity
/// formatter and an empty separator list; transport failures propagate.
pub fn resolve(
    config: &CheckerConfig,
    service: &dyn QueryService,
    property: &PropertyId,
) -> QueryResult<Metadata> {
    let formatter = resolve_formatter(service, property)?;
    let separators = resolve_separators(config, service, property)?;
    tracing::debug!(
        %property,
        formatter = formatter.template(),
        separators = separators.len(),
        "resolved property metadata"
    );
    Ok(Metadata {
        formatter,
        separators,
    })
}

fn resolve_formatter(
    service: &dyn QueryService,
    property: &PropertyId,
) -> QueryResult<Formatter> {
    let body = service.query(&formatter_query(property), ResultFormat::Json)?;
    let mut formatters = column(&lenient_solutions(&body, property, "formatter"), "formatter");

    if formatters.len() > 1 {
        tracing::warn!(
            %property,
            count = formatters.len(),
            using = %formatters[0],
            "property declares several formatter URLs, using the first"
        );
    }

    if formatters.is_empty() {
        Ok(Formatter::identity())
    } else {
        Ok(Formatter::new(formatters.swap_remove(0)))
    }
}

fn resolve_separators(
    config: &CheckerConfig,
    service: &dyn QueryService,
    property: &PropertyId,
) -> QueryResult<Vec<PropertyId>> {
    let query = separator_query(property, ConstraintKind::SingleBestValue);
    let body = service.query(&query, ResultFormat::Json)?;

    let separators = column(&lenient_solutions(&body, property, "separator"), "separator")
        .into_iter()
        .filter_map(|iri| {
            let local = iri
                .strip_prefix(config.entity_namespace.as_str())
                .unwrap_or(&iri);
            match local.parse::<PropertyId>() {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::warn!(%property, value = %iri, "ignoring separator that is not a property");
                    None
                }
            }
        })
        .collect();
    Ok(separators)
}

fn lenient_solutions(body: &str, property: &PropertyId, lookup: &str) -> Vec<Solution> {
    match parse_solutions(body) {
        Ok(solutions) => solutions,
        Err(e) => {
            tracing::warn!(%property, lookup, error = %e, "unusable metadata response, using defaults");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;

    /// Answers formatter and separator lookups from fixed bodies.
    struct Canned {
        formatter: Result<String, u16>,
        separator: String,
    }

    impl QueryService for Canned {
        fn query(&self, sparql: &str, format: ResultFormat) -> QueryResult<String> {
            assert_eq!(format, ResultFormat::Json);
            if sparql.contains("?formatter") {
                self.formatter
                    .clone()
                    .map_err(|status| QueryError::Status {
                        status,
                        preview: String::new(),
                    })
            } else {
                Ok(self.separator.clone())
            }
        }
    }

    fn prop() -> PropertyId {
        "P227".parse().unwrap()
    }

    fn bindings(var: &str, values: &[&str]) -> String {
        let rows: Vec<String> = values
            .iter()
            .map(|v| format!(r#"{{"{var}": {{"type": "uri", "value": "{v}"}}}}"#))
            .collect();
        format!(r#"{{"results": {{"bindings": [{}]}}}}"#, rows.join(","))
    }

    #[test]
    fn formatter_renders_placeholder() {
        let f = Formatter::new("https://d-nb.info/gnd/$1");
        assert_eq!(f.render("118540238"), "https://d-nb.info/gnd/118540238");
        assert_eq!(
            f.link("118540238"),
            "[https://d-nb.info/gnd/118540238 118540238]"
        );
    }

    #[test]
    fn identity_formatter_is_noop() {
        let f = Formatter::identity();
        assert!(f.is_identity());
        assert_eq!(f.render("abc"), "abc");
        assert_eq!(f.link("abc"), "[abc abc]");
    }

    #[test]
    fn queries_name_property_and_constraint_item() {
        let q = separator_query(&prop(), ConstraintKind::SingleBestValue);
        assert!(q.contains("wd:P227 p:P2302"));
        assert!(q.contains("wd:Q52060874"));
        assert!(q.contains("pq:P4155 ?separator"));
        assert!(formatter_query(&prop()).contains("wd:P227 wdt:P1630 ?formatter"));
    }

    #[test]
    fn first_formatter_wins() {
        let service = Canned {
            formatter: Ok(bindings(
                "formatter",
                &["https://a.example/$1", "https://b.example/$1"],
            )),
            separator: bindings("separator", &[]),
        };
        let meta = resolve(&CheckerConfig::default(), &service, &prop()).unwrap();
        assert_eq!(meta.formatter.template(), "https://a.example/$1");
    }

    #[test]
    fn no_formatter_defaults_to_identity() {
        let service = Canned {
            formatter: Ok(bindings("formatter", &[])),
            separator: bindings("separator", &[]),
        };
        let meta = resolve(&CheckerConfig::default(), &service, &prop()).unwrap();
        assert_eq!(meta, Metadata::default());
    }

    #[test]
    fn separators_are_stripped_in_upstream_order() {
        let service = Canned {
            formatter: Ok(bindings("formatter", &[])),
            separator: bindings(
                "separator",
                &[
                    "http://www.wikidata.org/entity/P518",
                    "http://www.wikidata.org/entity/P1545",
                    "http://www.wikidata.org/entity/Q5",
                ],
            ),
        };
        let meta = resolve(&CheckerConfig::default(), &service, &prop()).unwrap();
        let ids: Vec<&str> = meta.separators.iter().map(PropertyId::as_str).collect();
        assert_eq!(ids, vec!["P518", "P1545"]);
    }

    #[test]
    fn malformed_bodies_degrade_to_defaults() {
        let service = Canned {
            formatter: Ok(String::new()),
            separator: "<html>oops</html>".into(),
        };
        let meta = resolve(&CheckerConfig::default(), &service, &prop()).unwrap();
        assert!(meta.formatter.is_identity());
        assert!(meta.separators.is_empty());
    }

    #[test]
    fn status_failure_propagates() {
        let service = Canned {
            formatter: Err(502),
            separator: String::new(),
        };
        let err = resolve(&CheckerConfig::default(), &service, &prop()).unwrap_err();
        assert!(matches!(err, QueryError::Status { status: 502, .. }));
    }
}
