//! Route labels for spans and metrics.
//!
//! Product ids and cart ids are caller-controlled, so raw paths would give
//! every cart its own metric series. Labels replace them with placeholders.

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RouteLabel {
    pub(super) route: String,
    pub(super) span_name: String,
}

pub(super) fn route_label(method: &str, path: &str) -> RouteLabel {
    let route = route_pattern(path);
    let span_name = format!("{method} {route}");

    RouteLabel { route, span_name }
}

fn route_pattern(path: &str) -> String {
    let segments: Vec<&str> = path
        .trim_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    if segments.is_empty() {
        return "/".to_owned();
    }

    let mut route = String::new();
    let mut previous = "";

    for segment in segments {
        route.push('/');

        if previous == "items" {
            route.push_str("{product_id}");
        } else if Uuid::parse_str(segment).is_ok() {
            route.push_str("{uuid}");
        } else {
            route.push_str(segment);
        }

        previous = segment;
    }

    route
}
