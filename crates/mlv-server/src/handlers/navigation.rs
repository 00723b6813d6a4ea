//! Navigation API endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use mlv_site::NavGroup;
use serde::Serialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Response for GET /api/navigation.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    groups: Vec<NavGroup>,
}

/// Handle GET /api/navigation.
pub(crate) async fn get_navigation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NavigationResponse>, ServerError> {
    let groups = state.site.navigation()?;
    Ok(Json(NavigationResponse { groups }))
}

#[cfg(test)]
mod tests {
    use mlv_site::{NavItem, NavSection};

    use super::*;

    #[test]
    fn test_navigation_response_serialization() {
        let response = NavigationResponse {
            groups: vec![NavGroup {
                group: "MACHINE LEARNING".to_owned(),
                sections: vec![NavSection {
                    section: "Algorithms".to_owned(),
                    items: vec![NavItem {
                        label: "Perceptron".to_owned(),
                        href: "/modules/machine-learning/algorithms/perceptron".to_owned(),
                        icon_key: Some("perceptron".to_owned()),
                        badge: None,
                        disabled: false,
                        exact: false,
                        order: 1,
                    }],
                }],
            }],
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["groups"][0]["group"], "MACHINE LEARNING");
        let item = &json["groups"][0]["sections"][0]["items"][0];
        assert_eq!(item["label"], "Perceptron");
        assert_eq!(item["iconKey"], "perceptron");
        assert!(item.get("badge").is_none());
    }
}
